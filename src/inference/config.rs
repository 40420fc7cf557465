//! Configuration for schema inference

use serde::{Deserialize, Serialize};

use crate::models::ReservedFields;

/// Configuration for schema inference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceConfig {
    /// Maximum number of records to analyze per entity (0 = all)
    pub sample_size: usize,

    /// Reserved names; component identifier keys are skipped during
    /// sub-field discovery
    pub reserved: ReservedFields,
}

impl InferenceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }
}

/// Builder for InferenceConfig
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Set the sample size (0 = all records)
    pub fn sample_size(mut self, size: usize) -> Self {
        self.config.sample_size = size;
        self
    }

    /// Replace the reserved field names
    pub fn reserved(mut self, reserved: ReservedFields) -> Self {
        self.config.reserved = reserved;
        self
    }

    /// Replace only the reserved component keys
    pub fn reserved_sub_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.reserved.sub_fields = names.into_iter().map(Into::into).collect();
        self
    }

    /// Build the configuration
    pub fn build(self) -> InferenceConfig {
        self.config
    }
}
