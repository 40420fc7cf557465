//! Error types for schema inference

use thiserror::Error;

/// Errors that can occur while reading a dataset for schema inference
///
/// Classification itself never fails; only structurally malformed input does.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Dataset root is not an object keyed by entity name
    #[error("Invalid dataset: expected object of entities at root, found {0}")]
    MalformedDataset(String),

    /// An entity's data is not a list
    #[error("Invalid data for entity '{entity}': expected array of records, found {found}")]
    MalformedEntity { entity: String, found: String },

    /// A record of an entity is not an object
    #[error("Invalid record {index} of entity '{entity}': expected object, found {found}")]
    MalformedRecord {
        entity: String,
        index: usize,
        found: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for InferenceError {
    fn from(e: serde_json::Error) -> Self {
        InferenceError::JsonParse(e.to_string())
    }
}

impl From<std::io::Error> for InferenceError {
    fn from(e: std::io::Error) -> Self {
        InferenceError::Io(e.to_string())
    }
}
