//! Schema inference engine for exported JSON collections
//!
//! This module infers a content-type schema from a dataset of heterogeneous
//! records, one entity at a time.
//!
//! ## Features
//!
//! - **Type classification** - Map each value to a [`FieldType`](crate::models::FieldType)
//!   (date, rich text, string, media, component, number, boolean)
//! - **Shape validation** - Recognize media assets and components by their keys
//! - **Type merging** - One-way promotions applied while folding records
//! - **Required/unique tracking** - Monotone flags per field
//! - **Component discovery** - Union of sub-fields across records, one level deep
//!
//! ## Example
//!
//! ```rust,ignore
//! use strapi_migrate::inference::SchemaBuilder;
//!
//! let dataset = serde_json::json!({
//!     "posts": [{"title": "Hello", "body": "<p>x</p>"}]
//! });
//!
//! let schema = SchemaBuilder::new().build_value(&dataset)?;
//! println!("{}", serde_json::to_string_pretty(&schema)?);
//! ```

mod analyzer;
mod builder;
mod classify;
mod config;
mod error;
mod formats;
mod merge;
mod shapes;

pub use analyzer::EntityAnalyzer;
pub use builder::SchemaBuilder;
pub use classify::{classify, classify_with_hint};
pub use config::{InferenceConfig, InferenceConfigBuilder};
pub use error::InferenceError;
pub use formats::{contains_markup, is_date_like};
pub use merge::{merge_required, merge_type, merge_unique};
pub use shapes::{MediaAsset, MediaFormat, ShapeRejection, validate_component, validate_media};

#[cfg(test)]
pub(crate) use shapes::fixtures;
