//! Show which template a lookup resolves to.
//!
//! Useful when writing template files: it answers "what will be rendered for
//! an `int` entered at `raster_properties.width`?" without preparing input.
//!
//! ```bash
//! metaflat lookup raster_properties.width in_int
//! metaflat lookup bands.0 '*next_in_dict' --optional
//! ```
//!
//! The template is printed as a JSON string literal so that newlines and
//! trailing whitespace stay visible. With `--optional`, a miss exits with
//! an error instead of falling back.

use anyhow::{Result, anyhow};
use clap::Args;

use super::convert::parse_path;
use crate::config::Settings;
use crate::templates::LookupKey;

/// Command to resolve a single template.
#[derive(Args, Debug)]
pub struct LookupCommand {
    /// Dot-joined node path; empty or `.` for the root
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Lookup key, e.g. `in_dict`, `out_list`, `inout_str`, `*next_in_int`
    #[arg(value_name = "KEY", value_parser = parse_key)]
    pub key: LookupKey,

    /// Do not fall back to the default bucket or the fixed fallback template
    #[arg(long)]
    pub optional: bool,
}

fn parse_key(text: &str) -> Result<LookupKey, String> {
    text.parse()
}

impl LookupCommand {
    pub fn execute(self, settings: &Settings) -> Result<()> {
        println!("{}", serde_json::to_string(&self.resolve(settings)?)?);
        Ok(())
    }

    /// Resolve the template without printing it.
    pub fn resolve(&self, settings: &Settings) -> Result<String> {
        let tree = settings.template_tree()?;
        let path = parse_path(&self.path);

        tree.lookup(path.segments(), &self.key, self.optional)
            .ok_or_else(|| anyhow!("No template for '{}' at '{}'", self.key, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FALLBACK_TEMPLATE;

    fn command(path: &str, key: &str, optional: bool) -> LookupCommand {
        LookupCommand {
            path: path.to_string(),
            key: parse_key(key).unwrap(),
            optional,
        }
    }

    #[test]
    fn test_resolve_builtin() {
        let settings = Settings::default();
        assert_eq!(command("", "in_dict", false).resolve(&settings).unwrap(), "{\n");
        assert_eq!(command("a.b", "out_list", false).resolve(&settings).unwrap(), "]\n");
        assert_eq!(
            command("a", "inout_int", false).resolve(&settings).unwrap(),
            "{name} = {value}\n"
        );
    }

    #[test]
    fn test_optional_miss() {
        let settings = Settings::default();
        let err = command("a", "*next_in_int", true).resolve(&settings).unwrap_err();
        assert_eq!(err.to_string(), "No template for '*next_in_int' at 'a'");

        assert_eq!(
            command("a", "*next_in_int", false).resolve(&settings).unwrap(),
            FALLBACK_TEMPLATE
        );
    }

    #[test]
    fn test_parse_key_rejects_unknown() {
        assert!(parse_key("in_integer").is_err());
        assert!(parse_key("sideways_int").is_err());
    }
}
