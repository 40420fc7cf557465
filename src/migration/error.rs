//! Error types for migration payload compilation and submission

use thiserror::Error;

use crate::inference::ShapeRejection;

/// Errors raised while downloading a media asset
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Failed to reach the asset host
    #[error("Failed to connect: {0}")]
    ConnectionError(String),

    /// Request timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Non-success HTTP status
    #[error("HTTP {status} while fetching {url}")]
    Status { url: String, status: u16 },
}

/// Errors that fail the compilation of a single record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// A media asset of the record could not be downloaded
    #[error("Failed to fetch media for field '{field}' from {url}: {source}")]
    MediaFetch {
        field: String,
        url: String,
        #[source]
        source: FetchError,
    },

    /// A media field holds a value that is not a media asset
    #[error("Field '{field}' does not hold a media asset: {reason}")]
    InvalidMedia {
        field: String,
        #[source]
        reason: ShapeRejection,
    },

    /// One or more records failed; raised when a complete result is required
    #[error("{failed} record(s) failed to compile, first failure: {first}")]
    Incomplete { failed: usize, first: String },
}

/// Errors raised while submitting compiled payloads to the target system
#[derive(Error, Debug)]
pub enum SubmitError {
    /// Failed to reach the target system
    #[error("Failed to connect to {url}: {reason}")]
    ConnectionError { url: String, reason: String },

    /// The target system rejected the payload
    #[error("Target rejected payload for '{entity}' (HTTP {status}): {body}")]
    Rejected {
        entity: String,
        status: u16,
        body: String,
    },

    /// An attachment could not be encoded into the multipart form
    #[error("Invalid attachment '{file_name}': {reason}")]
    InvalidAttachment { file_name: String, reason: String },

    /// Payload serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Record failed to compile and cannot be submitted
    #[error("Record {index} of '{entity}' did not compile: {source}")]
    NotCompiled {
        entity: String,
        index: usize,
        #[source]
        source: CompileError,
    },
}

impl From<serde_json::Error> for SubmitError {
    fn from(e: serde_json::Error) -> Self {
        SubmitError::Serialization(e.to_string())
    }
}

/// Result type for compilation of one record
pub type CompileResult<T> = Result<T, CompileError>;
