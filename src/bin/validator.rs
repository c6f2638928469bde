//! Pod Validator CLI
//!
//! Validates Pod descriptor files and prints every violation found.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pod_validator::source::{collect_targets, validate_file};
use pod_validator::{Diagnostic, OutputFormat, Result, Validator, ValidatorConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pod-validator")]
#[command(about = "Validate Pod descriptor YAML files")]
struct Cli {
    /// Configuration file (layered over podvalid.toml and PODVALID__* variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate files or directories of YAML files
    Check {
        /// Files or directories to validate
        #[arg(required = true)]
        targets: Vec<PathBuf>,

        /// Report only the first violation of each file
        #[arg(long)]
        fail_fast: bool,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Write the default configuration as TOML
    InitConfig {
        /// Destination file
        #[arg(default_value = "podvalid.toml")]
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether every document was valid
fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Check {
            targets,
            fail_fast,
            format,
        } => {
            let mut config = ValidatorConfig::load_from(cli.config.as_deref())?;
            if fail_fast {
                config.validation.stop_on_first_error = true;
            }
            if let Some(format) = format {
                config.output.format = format;
            }

            let validator = Validator::from_config(&config.validation);
            let files = collect_targets(&targets, &config.output.yaml_extensions)?;

            let mut diagnostics: Vec<Diagnostic> = Vec::new();
            for file in &files {
                diagnostics.extend(validate_file(&validator, file)?);
            }

            match config.output.format {
                OutputFormat::Text => {
                    for diagnostic in &diagnostics {
                        println!("{}", diagnostic);
                    }
                    if diagnostics.is_empty() {
                        println!("{}", config.output.success_message);
                    }
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&diagnostics)?);
                }
            }

            Ok(diagnostics.is_empty())
        }

        Commands::InitConfig { path } => {
            let config = ValidatorConfig::load_from(cli.config.as_deref())?;
            config.save(&path)?;
            println!("✅ Configuration written to {}", path.display());
            Ok(true)
        }
    }
}
