//! Migration payload compilation and submission
//!
//! This module turns the records of a dataset into payloads accepted by the
//! target system's content API.
//!
//! ## Features
//!
//! - **Field partitioning** - Plain, boolean, media, component and relation fields
//! - **Concurrent media download** - Assets fetched through an [`AssetFetcher`]
//! - **Per-record failures** - A failed record never hides a missing attachment
//! - **Multipart submission** - `POST <base>/api/<entity>` (requires `api-backend`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use strapi_migrate::migration::{HttpAssetFetcher, MigrationClient, PayloadCompiler};
//!
//! let compiled = PayloadCompiler::new(HttpAssetFetcher::new())
//!     .compile(&schema, &dataset)
//!     .await;
//!
//! for (entity, index, error) in compiled.failures() {
//!     eprintln!("{entity}[{index}]: {error}");
//! }
//!
//! let outcomes = MigrationClient::new("http://localhost:1337")
//!     .submit_all(&compiled)
//!     .await;
//! ```

#[cfg(feature = "api-backend")]
mod client;
mod compiler;
mod error;
mod fetcher;
mod payload;

#[cfg(feature = "api-backend")]
pub use client::{MigrationClient, SubmitOutcome};
pub use compiler::{CompileConfig, CompileConfigBuilder, PayloadCompiler};
pub use error::{CompileError, CompileResult, FetchError, SubmitError};
#[cfg(feature = "api-backend")]
pub use fetcher::HttpAssetFetcher;
pub use fetcher::{AssetFetcher, FetchedAsset, resolve_asset_url};
pub use payload::{
    Attachment, CompiledPayloads, CompiledRecord, EntityPayloads, FieldPartition, Payload,
    relation_placeholder,
};
