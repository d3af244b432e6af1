//! Flatten a document into rendered text.
//!
//! ```bash
//! # Print the rendered blob
//! metaflat convert record.json
//!
//! # One JSON array of rendered lines
//! metaflat convert --lines record.yaml
//!
//! # Render a subtree as if it sat at raster_properties
//! metaflat convert --at raster_properties props.json
//! ```

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::common::{InputFormat, load_value};
use crate::config::Settings;
use crate::walker::Path;

/// Command to flatten a JSON or YAML document.
#[derive(Args, Debug)]
pub struct ConvertCommand {
    /// Input document, or `-` for stdin
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Input format
    #[arg(long, value_enum, default_value = "auto")]
    pub format: InputFormat,

    /// Print the rendered lines as a JSON array instead of the joined text
    #[arg(long)]
    pub lines: bool,

    /// Dot-joined path the input is rendered at
    #[arg(long, value_name = "PATH")]
    pub at: Option<String>,
}

impl ConvertCommand {
    pub fn execute(self, settings: &Settings) -> Result<()> {
        print!("{}", self.render(settings)?);
        Ok(())
    }

    /// Produce the command's output without printing it.
    pub fn render(&self, settings: &Settings) -> Result<String> {
        let value = load_value(&self.input, self.format)?;
        let converter = settings.converter()?;
        let prefix = self.at.as_deref().map(parse_path).unwrap_or_default();

        let lines = converter
            .convert_at(&value, prefix)
            .with_context(|| format!("Failed to convert {}", self.input.display()))?;

        if self.lines {
            let mut json = serde_json::to_string_pretty(&lines)?;
            json.push('\n');
            Ok(json)
        } else {
            Ok(lines.concat())
        }
    }
}

/// Parse a dot-joined path; empty or `.` is the root.
pub(crate) fn parse_path(text: &str) -> Path {
    if text.is_empty() || text == "." {
        return Path::new();
    }
    Path::from_segments(text.split('.'))
}
