//! Dump command implementation

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::cli::commands::write_output;
use crate::cli::error::CliError;
use crate::config::MigratorConfig;
use crate::source::SourceClient;

/// Arguments for the `dump` command
pub struct DumpArgs {
    /// Routes to dump (the configured routes if empty)
    pub routes: Vec<String>,
    /// Output file path (stdout if not provided)
    pub output: Option<PathBuf>,
}

/// Handle the `dump` command
pub async fn handle_dump(args: &DumpArgs, config: &MigratorConfig) -> Result<(), CliError> {
    let routes = if args.routes.is_empty() {
        &config.routes
    } else {
        &args.routes
    };
    if routes.is_empty() {
        return Err(CliError::InvalidArgument(
            "No routes given and none configured".to_string(),
        ));
    }

    eprintln!("Dumping {} route(s) from {}...", routes.len(), config.endpoint);
    let dataset = SourceClient::new(config.endpoint.clone())
        .dump(routes)
        .await
        .map_err(|e| CliError::MigrationError(e.to_string()))?;

    let raw: Map<String, Value> = dataset
        .entities()
        .map(|e| {
            let records = e.records.iter().cloned().map(Value::Object).collect();
            (e.name.clone(), Value::Array(records))
        })
        .collect();
    let output = serde_json::to_string_pretty(&raw)
        .map_err(|e| CliError::MigrationError(e.to_string()))?;

    write_output(args.output.as_ref(), &output)
}
