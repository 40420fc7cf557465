//! Strapi migrate - schema inference and migration for exported JSON collections
//!
//! Provides:
//! - Schema inference from heterogeneous records (types, required, unique, components)
//! - Schema editing (remove, toggle flags, reorder, promote to relation)
//! - Export of content-type and component schema documents
//! - Compilation of records into multipart migration payloads
//! - Dumping of a source system and submission to a target system

pub mod config;
pub mod editor;
pub mod export;
pub mod inference;
pub mod migration;
pub mod models;
#[cfg(feature = "api-backend")]
pub mod source;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use config::{ConfigError, MigratorConfig};
pub use editor::{EditError, TypeChange};
pub use export::{DocumentKind, ExportConfig, ExportDocument, ExportError, StrapiExporter};
pub use inference::{InferenceConfig, InferenceError, SchemaBuilder};
pub use migration::{
    AssetFetcher, CompileConfig, CompileError, CompiledPayloads, Payload, PayloadCompiler,
};
#[cfg(feature = "api-backend")]
pub use migration::{HttpAssetFetcher, MigrationClient};
#[cfg(feature = "api-backend")]
pub use source::{DumpError, SourceClient};

// Re-export models
pub use models::{Dataset, EntitySchema, Field, FieldType, ReservedFields, Schema};
