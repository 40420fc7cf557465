//! strapi-migrate: infer, export and migrate Strapi content types from JSON dumps

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use strapi_migrate::cli::commands::compile::{CompileArgs, handle_compile};
use strapi_migrate::cli::commands::dump::{DumpArgs, handle_dump};
use strapi_migrate::cli::commands::export::{ExportArgs, handle_export};
use strapi_migrate::cli::commands::infer::{InferArgs, handle_infer};
use strapi_migrate::config::MigratorConfig;

#[derive(Parser)]
#[command(name = "strapi-migrate")]
#[command(about = "Infer content-type schemas from JSON dumps and migrate them into Strapi")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "strapi-migrate.toml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump the configured routes of the source system into a dataset file
    Dump {
        /// Routes to dump (overrides the configured routes)
        routes: Vec<String>,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Infer a schema from a dataset file
    Infer {
        /// Dataset JSON file
        dataset: PathBuf,
        /// Records sampled per entity (0 = all)
        #[arg(long, default_value_t = 0)]
        sample_size: usize,
        /// Output format
        #[arg(short, long, default_value = "json", value_parser = ["json", "yaml"])]
        format: String,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write content-type and component schema documents
    Export {
        /// Dataset JSON file to infer the schema from
        #[arg(required_unless_present = "schema")]
        dataset: Option<PathBuf>,
        /// Use a previously written schema instead of inferring one
        #[arg(long)]
        schema: Option<PathBuf>,
        /// Root directory of the target project
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Compile records into migration payloads
    Compile {
        /// Dataset JSON file
        dataset: PathBuf,
        /// Schema to compile against (inferred if omitted)
        #[arg(long)]
        schema: Option<PathBuf>,
        /// Submit the payloads to the migration endpoint
        #[arg(long)]
        submit: bool,
        /// Refuse to submit when any record failed to compile
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("strapi_migrate={}", default_level))),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = MigratorConfig::load(&cli.config)?;

    match cli.command {
        Commands::Dump { routes, output } => {
            handle_dump(&DumpArgs { routes, output }, &config).await?;
        }
        Commands::Infer {
            dataset,
            sample_size,
            format,
            output,
        } => {
            let args = InferArgs {
                dataset,
                sample_size,
                format,
                output,
            };
            handle_infer(&args, &config)?;
        }
        Commands::Export {
            dataset,
            schema,
            out_dir,
        } => {
            let args = ExportArgs {
                dataset,
                schema,
                out_dir,
            };
            handle_export(&args, &config)?;
        }
        Commands::Compile {
            dataset,
            schema,
            submit,
            strict,
        } => {
            let args = CompileArgs {
                dataset,
                schema,
                submit,
                strict,
            };
            handle_compile(&args, &config).await?;
        }
    }

    Ok(())
}
