//! Export command implementation

use std::path::PathBuf;

use crate::cli::commands::{load_dataset, load_schema};
use crate::cli::error::CliError;
use crate::cli::output::format_export_summary;
use crate::config::MigratorConfig;
use crate::export::StrapiExporter;
use crate::inference::SchemaBuilder;

/// Arguments for the `export` command
pub struct ExportArgs {
    /// Dataset to infer the schema from
    pub dataset: Option<PathBuf>,
    /// Previously inferred (and possibly edited) schema
    pub schema: Option<PathBuf>,
    /// Root directory of the target project
    pub out_dir: PathBuf,
}

/// Handle the `export` command
pub fn handle_export(args: &ExportArgs, config: &MigratorConfig) -> Result<(), CliError> {
    let schema = match (&args.schema, &args.dataset) {
        (Some(path), _) => load_schema(path)?,
        (None, Some(path)) => {
            let dataset = load_dataset(path)?;
            SchemaBuilder::with_config(config.inference_config()).build(&dataset)
        }
        (None, None) => {
            return Err(CliError::InvalidArgument(
                "Either a dataset or --schema is required".to_string(),
            ));
        }
    };

    let documents = StrapiExporter::with_config(config.export_config()).export(&schema);
    // Nothing is written unless every document has a valid path
    for document in &documents {
        document.relative_path()?;
    }
    for document in &documents {
        document.write_to(&args.out_dir)?;
    }

    eprint!("{}", format_export_summary(&documents));
    Ok(())
}
