//! TOML file parsing with file-path error context.
//!
//! Used for `metaflat.toml` settings files. Template files have their own
//! loader in [`crate::templates::loader`] since they accept several formats.
//!
//! Example error output:
//! ```text
//! Failed to parse config file: /path/to/metaflat.toml
//! Caused by:
//!     invalid type: string "deep", expected usize
//! ```

use anyhow::{Context, Result};
use std::path::Path;

/// Parse a TOML file into `T`.
///
/// # Examples
///
/// ```rust,no_run
/// use metaflat_cli::config::{Settings, parse_config};
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let settings: Settings = parse_config(Path::new("metaflat.toml"))?;
/// println!("max depth: {}", settings.max_depth());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Fails when the file cannot be read ("Failed to read config file: ...")
/// or does not deserialize into `T` ("Failed to parse config file: ...").
/// The underlying I/O or TOML error is kept as the cause.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}
