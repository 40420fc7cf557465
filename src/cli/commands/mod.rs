//! CLI command implementations

pub mod compile;
pub mod dump;
pub mod export;
pub mod infer;

use std::path::{Path, PathBuf};

use crate::cli::error::CliError;
use crate::models::{Dataset, Schema};

/// Load a dataset from a JSON file
pub fn load_dataset(path: &Path) -> Result<Dataset, CliError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?;
    Ok(Dataset::from_json(&content)?)
}

/// Load a previously written schema (JSON, or YAML by extension)
pub fn load_schema(path: &Path) -> Result<Schema, CliError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let schema = if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| CliError::InferenceError(e.to_string()))?
    } else {
        serde_json::from_str(&content).map_err(|e| CliError::InferenceError(e.to_string()))?
    };
    Ok(schema)
}

/// Write command output to a file, or stdout when no file is given
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<(), CliError> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .map_err(|e| CliError::FileWriteError(path.clone(), e.to_string()))?;
            eprintln!("Written to: {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
