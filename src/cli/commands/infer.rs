//! Infer command implementation

use std::path::PathBuf;

use crate::cli::commands::{load_dataset, write_output};
use crate::cli::error::CliError;
use crate::cli::output::format_schema_summary;
use crate::config::MigratorConfig;
use crate::inference::{InferenceConfig, SchemaBuilder};

/// Arguments for the `infer` command
pub struct InferArgs {
    /// Dataset file
    pub dataset: PathBuf,
    /// Records sampled per entity (0 = all)
    pub sample_size: usize,
    /// Output format (json, yaml)
    pub format: String,
    /// Output file path (stdout if not provided)
    pub output: Option<PathBuf>,
}

/// Handle the `infer` command
pub fn handle_infer(args: &InferArgs, config: &MigratorConfig) -> Result<(), CliError> {
    let dataset = load_dataset(&args.dataset)?;

    let inference_config = InferenceConfig {
        sample_size: args.sample_size,
        ..config.inference_config()
    };
    let schema = SchemaBuilder::with_config(inference_config).build(&dataset);

    eprint!("{}", format_schema_summary(&schema));

    let output = match args.format.as_str() {
        "yaml" => {
            serde_yaml::to_string(&schema).map_err(|e| CliError::InferenceError(e.to_string()))?
        }
        "json" => serde_json::to_string_pretty(&schema)
            .map_err(|e| CliError::InferenceError(e.to_string()))?,
        other => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown format: {}",
                other
            )));
        }
    };

    write_output(args.output.as_ref(), &output)
}
