//! Models module
//!
//! Core data structures shared by inference, editing, export and migration.

pub mod dataset;
pub mod field;
pub mod reserved;
pub mod schema;

pub use dataset::{Dataset, EntityRecords, Record};
pub use field::{Field, FieldType};
pub use reserved::ReservedFields;
pub use schema::{EntitySchema, Schema};
