//! Loading template sources from files.
//!
//! Template files are flat mappings of dot-joined patterns to template
//! strings. The format is chosen by file extension:
//!
//! | Extension | Format |
//! |-----------|--------|
//! | `.json` | JSON object |
//! | `.yaml`, `.yml` | YAML mapping |
//! | `.toml` | TOML table with quoted keys (`"*.in_dict" = "{\n"`) |
//!
//! Any read or parse failure, and any non-string value, is reported as
//! [`FlattenError::InvalidTemplateConfig`] naming the file.

use indexmap::IndexMap;
use std::path::Path;

use super::tree::TemplateTree;
use crate::constants::BUILTIN_TEMPLATES;
use crate::core::FlattenError;

/// Supported template file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    Json,
    Yaml,
    Toml,
}

impl TemplateFormat {
    /// Detect the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Some(Self::Json),
            Some("yaml" | "yml") => Some(Self::Yaml),
            Some("toml") => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Parse template source text into flat entries, in source order.
///
/// # Errors
///
/// Returns a human-readable reason when the text is not a mapping of
/// strings to strings.
pub fn parse_templates(
    content: &str,
    format: TemplateFormat,
) -> Result<IndexMap<String, String>, String> {
    match format {
        TemplateFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        TemplateFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        TemplateFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
    }
}

/// Read and build a template tree from a file.
///
/// # Errors
///
/// Returns [`FlattenError::InvalidTemplateConfig`] if the file cannot be
/// read, has an unsupported extension, fails to parse, or does not expand
/// into a valid tree.
pub fn load_template_file(path: &Path) -> Result<TemplateTree, FlattenError> {
    let source_name = path.display().to_string();

    let format = TemplateFormat::from_path(path).ok_or_else(|| {
        FlattenError::invalid_config(
            &source_name,
            "unsupported file extension (expected .json, .yaml, .yml or .toml)",
        )
    })?;

    let content = std::fs::read_to_string(path)
        .map_err(|e| FlattenError::invalid_config(&source_name, format!("cannot read file: {e}")))?;

    let entries = parse_templates(&content, format)
        .map_err(|reason| FlattenError::invalid_config(&source_name, reason))?;

    let tree = TemplateTree::build_named(&source_name, entries)?;
    tracing::info!("Loaded {} templates from {}", tree.len(), source_name);
    Ok(tree)
}

/// The template set bundled with the binary.
///
/// # Errors
///
/// Only fails if the bundled file itself is malformed.
pub fn builtin_templates() -> Result<TemplateTree, FlattenError> {
    let entries = parse_templates(BUILTIN_TEMPLATES, TemplateFormat::Json)
        .map_err(|reason| FlattenError::invalid_config("<builtin>", reason))?;
    TemplateTree::build_named("<builtin>", entries)
}
