//! Input handling shared by the commands.

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::io::Read;
use std::path::Path;

use crate::value::Value;

/// Path argument meaning "read standard input".
pub const STDIN: &str = "-";

/// Format of an input document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// `.yaml`/`.yml` files are YAML, everything else JSON
    #[default]
    Auto,
    Json,
    Yaml,
}

impl InputFormat {
    /// Settle `Auto` using the input path.
    #[must_use]
    pub fn resolve(self, input: &Path) -> Self {
        match self {
            Self::Auto => match input.extension().and_then(|ext| ext.to_str()) {
                Some("yaml" | "yml") => Self::Yaml,
                _ => Self::Json,
            },
            other => other,
        }
    }
}

/// Read a file, or stdin for `-`.
pub fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == STDIN {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read standard input")?;
        return Ok(content);
    }

    std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))
}

/// Read and parse an input document into a value tree.
pub fn load_value(input: &Path, format: InputFormat) -> Result<Value> {
    let content = read_input(input)?;
    let value = match format.resolve(input) {
        InputFormat::Yaml => Value::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse YAML input: {}", input.display()))?,
        InputFormat::Json | InputFormat::Auto => Value::from_json_str(&content)
            .with_context(|| format!("Failed to parse JSON input: {}", input.display()))?,
    };
    tracing::debug!("Loaded {} input from {}", value.type_name(), input.display());
    Ok(value)
}
