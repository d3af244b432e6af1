//! Command-line interface for metaflat.
//!
//! # Commands
//!
//! - `convert` - flatten a JSON/YAML document into template-rendered text
//! - `lookup` - show which template a path and event resolve to
//! - `validate` - check a template file before deploying it
//! - `document` - build a search-index document from a file-metadata record
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` - log level (`debug` / `error`, default `warn`)
//! - `--config <FILE>` - settings file (default `./metaflat.toml`)
//! - `--templates <FILE>` - template file, overriding the settings file
//! - `--max-depth <N>` - nesting limit, overriding the settings file
//!
//! `RUST_LOG` overrides the log level derived from the flags. Logs go to
//! stderr so they never mix with rendered output.
//!
//! # Examples
//!
//! ```bash
//! metaflat convert record.json
//! metaflat --templates raster.yaml convert --lines record.yaml
//! metaflat lookup raster_properties.width in_int
//! metaflat validate templates/raster.json
//! cat record.json | metaflat document -
//! ```

mod common;
pub mod convert;
pub mod document;
pub mod lookup;
pub mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

pub use common::InputFormat;

/// Runtime configuration derived from the global flags.
///
/// Separated from [`Cli`] so commands can be driven from tests without
/// parsing arguments.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Explicit settings file (`--config`).
    pub config_path: Option<PathBuf>,

    /// Template file override (`--templates`).
    pub templates: Option<PathBuf>,

    /// Depth limit override (`--max-depth`).
    pub max_depth: Option<usize>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            log_level: "warn".to_string(),
            ..Self::default()
        }
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// Later calls are no-ops, so tests may call this freely.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Load the settings file and apply the flag overrides.
    pub fn settings(&self) -> Result<Settings> {
        let settings = Settings::load(self.config_path.as_deref())?;
        Ok(settings.with_overrides(self.templates.clone(), self.max_depth))
    }
}

/// Flatten JSON/YAML value trees into text with path-sensitive templates.
#[derive(Parser, Debug)]
#[command(
    name = "metaflat",
    about = "Flatten structured metadata into template-rendered text",
    version,
    author,
    long_about = "metaflat walks a JSON or YAML document depth-first and renders one line per \
                  container entry, container exit, scalar and sibling transition, using templates \
                  selected by path and value type."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Settings file (default: ./metaflat.toml, or $METAFLAT_CONFIG)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Template file (.json, .yaml, .yml or .toml) replacing the built-in set
    #[arg(short, long, global = true, value_name = "FILE")]
    templates: Option<PathBuf>,

    /// Maximum container nesting depth
    #[arg(long, global = true, value_name = "N")]
    max_depth: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Flatten a document into rendered text
    Convert(convert::ConvertCommand),

    /// Show the template resolved for a path and lookup key
    Lookup(lookup::LookupCommand),

    /// Validate a template file
    Validate(validate::ValidateCommand),

    /// Build a search-index document from a file-metadata record
    Document(document::DocumentCommand),
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(&config)
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
            config_path: self.config.clone(),
            templates: self.templates.clone(),
            max_depth: self.max_depth,
        }
    }

    pub fn execute_with_config(self, config: &CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Convert(cmd) => cmd.execute(&config.settings()?),
            Commands::Lookup(cmd) => cmd.execute(&config.settings()?),
            Commands::Validate(cmd) => cmd.execute(),
            Commands::Document(cmd) => cmd.execute(&config.settings()?),
        }
    }
}
