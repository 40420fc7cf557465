//! Migrator configuration file
//!
//! The configuration names the source system to dump from, the routes to
//! dump, the target system to migrate into and the reserved field names
//! shared by inference, export and compilation.
//!
//! ```toml
//! endpoint = "http://old-cms:1337"
//! routes = ["posts", "categories"]
//! migrationEndpoint = "http://localhost:1337"
//!
//! [reserved]
//! fields = ["id", "_id", "createdAt", "updatedAt"]
//! subFields = ["id", "_id"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::ExportConfig;
use crate::inference::InferenceConfig;
use crate::migration::CompileConfig;
use crate::models::ReservedFields;

/// Default address of a local target system
pub const DEFAULT_ENDPOINT: &str = "http://localhost:1337";

/// Errors raised while loading the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Invalid config file {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// Persisted migrator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MigratorConfig {
    /// Source system base URL; also resolves relative media URLs
    pub endpoint: String,
    /// Source routes to dump, one entity per route
    pub routes: Vec<String>,
    /// Target system base URL
    pub migration_endpoint: String,
    /// Reserved field names
    pub reserved: ReservedFields,
}

impl Default for MigratorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            routes: Vec::new(),
            migration_endpoint: DEFAULT_ENDPOINT.to_string(),
            reserved: ReservedFields::default(),
        }
    }
}

impl MigratorConfig {
    /// Load the configuration from a TOML file
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_toml(&content).map_err(|reason| ConfigError::Parse {
            path: path.display().to_string(),
            reason,
        })
    }

    /// Parse the configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Write the configuration as TOML
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn inference_config(&self) -> InferenceConfig {
        InferenceConfig::builder()
            .reserved(self.reserved.clone())
            .build()
    }

    pub fn export_config(&self) -> ExportConfig {
        ExportConfig::builder()
            .reserved(self.reserved.clone())
            .build()
    }

    pub fn compile_config(&self) -> CompileConfig {
        CompileConfig::builder()
            .reserved(self.reserved.clone())
            .asset_base_url(self.endpoint.clone())
            .build()
    }
}
