//! enumtab CLI - Generate lookups for Rust integer newtypes.
//!
//! Reads a declaration manifest and writes `name()`, `description()`,
//! `code()` and `Display` implementations for the requested types.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

mod commands;
mod config;

use commands::config as config_cmd;
use config::{Config, Overrides};

/// enumtab CLI - Generate name and description lookups from constants.
#[derive(Parser, Debug)]
#[command(
    name = "enumtab",
    author,
    version,
    about = "enumtab: compact lookup tables for integer error codes",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate lookup code for one or more types.
    Generate {
        /// Declaration manifest (JSON).
        manifest: PathBuf,

        /// Comma-separated list of type names.
        #[arg(short = 't', long = "type", value_delimiter = ',', required = true)]
        types: Vec<String>,

        /// Output file path (defaults to <manifest dir>/<type>_errors.rs).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the `oh_no` structured-error hook.
        #[arg(long)]
        extended_error: bool,

        /// Format the output with rustfmt.
        #[arg(long)]
        rustfmt: bool,

        #[command(flatten)]
        options: GenerationArgs,
    },

    /// Show the lookup plan for a type without writing code.
    Inspect {
        /// Declaration manifest (JSON).
        manifest: PathBuf,

        /// Type name.
        #[arg(short = 't', long = "type")]
        type_name: String,

        /// Evaluate the generated accessors for this value.
        #[arg(short, long, allow_hyphen_values = true)]
        lookup: Option<String>,

        /// Print the plan as JSON.
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        options: GenerationArgs,
    },

    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Options overriding the configured generation defaults.
#[derive(Args, Debug)]
struct GenerationArgs {
    /// Prefix stripped from constant names.
    #[arg(long)]
    trim_prefix: Option<String>,

    /// Base of the error code: 2, 8, 10 or 16.
    #[arg(long)]
    format_base: Option<u32>,

    /// Crate the `oh_no` hook forwards to.
    #[arg(long)]
    ohno_crate: Option<String>,

    /// Run count above which lookups use a map.
    #[arg(long)]
    sparse_threshold: Option<usize>,
}

impl GenerationArgs {
    fn into_overrides(self, extended_error: bool) -> Overrides {
        Overrides {
            format_base: self.format_base,
            trim_prefix: self.trim_prefix,
            ohno_crate: self.ohno_crate,
            sparse_threshold: self.sparse_threshold,
            extended_error,
        }
    }
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Get a configuration value.
    Get {
        /// Configuration key.
        key: String,
    },

    /// Reset configuration to defaults.
    Reset,

    /// Show path to config file.
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN // Default to less noise
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = Config::load()?;

    match cli.command {
        Commands::Generate {
            manifest,
            types,
            output,
            extended_error,
            rustfmt,
            options,
        } => {
            let invocation = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
            commands::generate::execute(
                &config,
                &manifest,
                &types,
                output,
                &options.into_overrides(extended_error),
                rustfmt,
                &invocation,
            )?;
        }

        Commands::Inspect {
            manifest,
            type_name,
            lookup,
            json,
            options,
        } => {
            commands::inspect::execute(
                &config,
                &manifest,
                &type_name,
                &options.into_overrides(false),
                lookup.as_deref(),
                json,
            )?;
        }

        Commands::Config(config_cmd_inner) => match config_cmd_inner {
            ConfigCommands::Show => {
                config_cmd::show(&config)?;
            }
            ConfigCommands::Set { key, value } => {
                // Persist file values only, not environment overrides.
                let mut file_config = Config::load_file()?;
                config_cmd::set(&mut file_config, &key, &value)?;
            }
            ConfigCommands::Get { key } => {
                config_cmd::get(&config, &key)?;
            }
            ConfigCommands::Reset => {
                config_cmd::reset()?;
            }
            ConfigCommands::Path => {
                if let Some(path) = Config::config_file_path() {
                    println!("{}", path.display());
                }
            }
        },
    }

    Ok(())
}
