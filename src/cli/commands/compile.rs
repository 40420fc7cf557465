//! Compile command implementation

use std::path::PathBuf;

use crate::cli::commands::{load_dataset, load_schema};
use crate::cli::error::CliError;
use crate::cli::output::{format_compile_summary, format_submit_summary};
use crate::config::MigratorConfig;
use crate::inference::SchemaBuilder;
use crate::migration::{HttpAssetFetcher, MigrationClient, PayloadCompiler};

/// Arguments for the `compile` command
pub struct CompileArgs {
    /// Dataset to compile
    pub dataset: PathBuf,
    /// Schema to compile against (inferred from the dataset if not provided)
    pub schema: Option<PathBuf>,
    /// Submit the payloads to the migration endpoint
    pub submit: bool,
    /// Fail before submitting if any record failed to compile
    pub strict: bool,
}

/// Handle the `compile` command
pub async fn handle_compile(args: &CompileArgs, config: &MigratorConfig) -> Result<(), CliError> {
    let dataset = load_dataset(&args.dataset)?;
    let schema = match &args.schema {
        Some(path) => load_schema(path)?,
        None => SchemaBuilder::with_config(config.inference_config()).build(&dataset),
    };

    let compiler =
        PayloadCompiler::new(HttpAssetFetcher::new()).with_config(config.compile_config());
    let compiled = compiler.compile(&schema, &dataset).await;

    eprint!("{}", format_compile_summary(&compiled));

    if args.strict && !compiled.failures().is_empty() {
        let failed = compiled.failures().len();
        return Err(CliError::MigrationError(format!(
            "{} record(s) failed to compile",
            failed
        )));
    }

    if args.submit {
        let client = MigrationClient::new(config.migration_endpoint.clone());
        eprintln!("Submitting to {}...", client.base_url());
        let outcomes = client.submit_all(&compiled).await;
        eprint!("{}", format_submit_summary(&outcomes));

        if outcomes.iter().any(|o| o.result.is_err()) {
            return Err(CliError::MigrationError(
                "Some records were not migrated".to_string(),
            ));
        }
    }

    Ok(())
}
