//! Export functionality
//!
//! Converts an inferred schema into Strapi schema-definition documents:
//! one collection type per entity and one component per component field.

pub mod naming;
pub mod strapi;

/// Error during export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Invalid document name '{0}': not a single path segment")]
    InvalidName(String),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::IoError(err.to_string())
    }
}

// Re-export for convenience
pub use naming::singularize;
pub use strapi::{DocumentKind, ExportConfig, ExportConfigBuilder, ExportDocument, StrapiExporter};
