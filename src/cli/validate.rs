//! Validate a template file.
//!
//! Checks, in order:
//!
//! 1. The file parses and builds into a template tree (empty segments and
//!    template/subtree conflicts are errors)
//! 2. Every placeholder is known (`name`, `host`, `type`, `value[.field]`)
//! 3. Every template key is a reserved key (`in_<type>`, `*next_in_<type>`,
//!    `*`, ...). Unknown keys are warnings, since they are never looked up
//!
//! ```bash
//! metaflat validate templates/raster.json
//! metaflat validate templates/raster.yaml --format json --strict
//! ```

use anyhow::{Result, bail};
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use crate::constants::{KEY_SEPARATOR, WILDCARD};
use crate::templates::{LookupKey, TemplateTree, check_placeholder, load_template_file, placeholders};

/// Command to validate a template file.
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Template file to validate
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Output format for validation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Text,
    /// Structured JSON output
    Json,
}

/// Outcome of validating one file.
#[derive(Debug, Default, Serialize)]
pub struct ValidationResults {
    pub valid: bool,
    pub entries: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidateCommand {
    pub fn execute(self) -> Result<()> {
        let results = self.validate();

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
            OutputFormat::Text => print_text(&self, &results),
        }

        if !results.valid {
            bail!("Template validation failed: {}", self.file.display());
        }
        Ok(())
    }

    /// Run all checks without printing.
    #[must_use]
    pub fn validate(&self) -> ValidationResults {
        let tree = match load_template_file(&self.file) {
            Ok(tree) => tree,
            Err(e) => {
                return ValidationResults {
                    errors: vec![e.to_string()],
                    ..ValidationResults::default()
                };
            }
        };

        let mut results = check_tree(&tree);
        results.valid = results.errors.is_empty() && !(self.strict && !results.warnings.is_empty());
        tracing::debug!(
            "Validated {}: {} errors, {} warnings",
            self.file.display(),
            results.errors.len(),
            results.warnings.len()
        );
        results
    }
}

fn check_tree(tree: &TemplateTree) -> ValidationResults {
    let mut results = ValidationResults {
        entries: tree.len(),
        ..ValidationResults::default()
    };

    for (key, template) in tree.entries() {
        for placeholder in placeholders(template) {
            if let Err(e) = check_placeholder(placeholder) {
                let hint = e.suggestion().map(|s| format!(" (did you mean '{{{s}}}'?)")).unwrap_or_default();
                results.errors.push(format!("'{key}': {e}{hint}"));
            }
        }

        let leaf = key.rsplit(KEY_SEPARATOR).next().unwrap_or(&key);
        if !is_reserved_key(leaf) {
            results
                .warnings
                .push(format!("'{key}': '{leaf}' is not a template key and will never be used"));
        }
    }

    results
}

/// Template keys the lookup can ask for.
fn is_reserved_key(leaf: &str) -> bool {
    matches!(leaf, WILDCARD | "in" | "out" | "inout")
        || leaf.parse::<LookupKey>().is_ok_and(|key| key.event().is_some())
}

fn print_text(cmd: &ValidateCommand, results: &ValidationResults) {
    for error in &results.errors {
        println!("{} {}", "✗".red(), error);
    }
    for warning in &results.warnings {
        println!("{} {}", "⚠".yellow(), warning);
    }
    if results.valid {
        println!(
            "{} Valid templates: {} ({} entries)",
            "✓".green(),
            cmd.file.display(),
            results.entries
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn validate(content: &str, ext: &str, strict: bool) -> ValidationResults {
        let temp = tempdir().unwrap();
        let file = temp.path().join(format!("templates.{ext}"));
        std::fs::write(&file, content).unwrap();
        ValidateCommand {
            file,
            format: OutputFormat::Text,
            strict,
        }
        .validate()
    }

    #[test]
    fn test_valid_templates() {
        let results = validate(
            r#"{"*.in_dict": "{\n", "*.*next_in_*": ",", "a.*": ";", "*.in_int": "{host}.{name}={value.x}"}"#,
            "json",
            true,
        );
        assert!(results.valid, "{results:?}");
        assert_eq!(results.entries, 4);
        assert!(results.warnings.is_empty());
    }

    #[test]
    fn test_unknown_placeholder_is_error() {
        let results = validate("'*.in_int': '{nmae}={value}'\n", "yaml", false);
        assert!(!results.valid);
        assert_eq!(results.errors.len(), 1);
        assert!(results.errors[0].contains("did you mean '{name}'"));
    }

    #[test]
    fn test_unknown_key_is_warning() {
        let results = validate(r#"{"*.in_integer": "x"}"#, "json", false);
        assert!(results.valid);
        assert_eq!(results.warnings.len(), 1);

        let results = validate(r#"{"*.in_integer": "x"}"#, "json", true);
        assert!(!results.valid);
    }

    #[test]
    fn test_build_failure_is_error() {
        let results = validate(r#"{"a.b": "x", "a.b.c": "y"}"#, "json", false);
        assert!(!results.valid);
        assert_eq!(results.entries, 0);
        assert!(results.errors[0].contains("Invalid template configuration"));
    }

    #[test]
    fn test_reserved_keys() {
        for key in ["in_dict", "out_list", "inout_str", "*next_in_*", "in_*", "in", "out", "inout", "*"] {
            assert!(is_reserved_key(key), "{key}");
        }
        for key in ["dict", "in_integer", "next_in_int", "value"] {
            assert!(!is_reserved_key(key), "{key}");
        }
    }
}
