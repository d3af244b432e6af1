//! `metaflat.toml` settings.
//!
//! ```toml
//! # Template file (.json, .yaml, .yml or .toml), relative to this file
//! templates = "templates/raster.json"
//!
//! # Maximum container nesting depth
//! max_depth = 64
//! ```
//!
//! The settings file is located in this order:
//!
//! 1. `--config <path>` (must exist)
//! 2. `METAFLAT_CONFIG` environment variable (must exist)
//! 3. `metaflat.toml` in the working directory (optional)
//!
//! Command-line flags override values from the file; unset values fall back
//! to the built-in templates and [`DEFAULT_MAX_DEPTH`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::parse_config;
use crate::constants::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE, DEFAULT_MAX_DEPTH};
use crate::templates::{TemplateTree, builtin_templates, load_template_file};
use crate::walker::Converter;

/// Effective settings for a conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Template file to load instead of the built-in set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<PathBuf>,

    /// Maximum container nesting depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

/// Where a settings file was found, and whether it had to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Located {
    path: PathBuf,
    required: bool,
}

impl Settings {
    /// Locate and load settings, see the module docs for the search order.
    ///
    /// Returns the defaults when no file is configured and none exists in the
    /// working directory.
    ///
    /// # Errors
    ///
    /// Fails when an explicitly configured file is missing, or any located
    /// file does not parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let cwd = std::env::current_dir().context("Failed to determine working directory")?;

        let Located { path, required } = locate(explicit, env, &cwd);
        if !required && !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load settings from `path`.
    ///
    /// A relative `templates` path is resolved against the directory that
    /// holds the settings file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings: Self = parse_config(path)?;

        if let Some(templates) = settings.templates.take() {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            settings.templates = Some(if templates.is_relative() {
                base.join(templates)
            } else {
                templates
            });
        }

        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Apply command-line overrides; `Some` values win.
    #[must_use]
    pub fn with_overrides(mut self, templates: Option<PathBuf>, max_depth: Option<usize>) -> Self {
        if templates.is_some() {
            self.templates = templates;
        }
        if max_depth.is_some() {
            self.max_depth = max_depth;
        }
        self
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    /// Load the configured template file, or the built-in set.
    pub fn template_tree(&self) -> Result<TemplateTree> {
        match &self.templates {
            Some(path) => load_template_file(path)
                .with_context(|| format!("Failed to load templates from {}", path.display())),
            None => {
                tracing::debug!("Using built-in templates");
                Ok(builtin_templates()?)
            }
        }
    }

    /// A converter using these settings.
    pub fn converter(&self) -> Result<Converter> {
        let templates = self.template_tree()?;
        Ok(Converter::new(Arc::new(templates)).with_max_depth(self.max_depth()))
    }
}

fn locate(explicit: Option<&Path>, env: Option<PathBuf>, cwd: &Path) -> Located {
    if let Some(path) = explicit {
        return Located {
            path: path.to_path_buf(),
            required: true,
        };
    }
    if let Some(path) = env.filter(|p| !p.as_os_str().is_empty()) {
        return Located {
            path,
            required: true,
        };
    }
    Located {
        path: cwd.join(DEFAULT_CONFIG_FILE),
        required: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_locate_precedence() {
        let cwd = Path::new("/work");

        let found = locate(Some(Path::new("a.toml")), Some(PathBuf::from("b.toml")), cwd);
        assert_eq!(found.path, PathBuf::from("a.toml"));
        assert!(found.required);

        let found = locate(None, Some(PathBuf::from("b.toml")), cwd);
        assert_eq!(found.path, PathBuf::from("b.toml"));
        assert!(found.required);

        let found = locate(None, Some(PathBuf::new()), cwd);
        assert_eq!(found.path, cwd.join(DEFAULT_CONFIG_FILE));
        assert!(!found.required);
    }

    #[test]
    fn test_load_from_resolves_relative_templates() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("metaflat.toml");
        std::fs::write(&path, "templates = \"t/raster.json\"\nmax_depth = 8\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.templates, Some(temp.path().join("t/raster.json")));
        assert_eq!(settings.max_depth(), 8);
    }

    #[test]
    fn test_load_from_rejects_unknown_keys() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("metaflat.toml");
        std::fs::write(&path, "max_dept = 8\n").unwrap();
        assert!(Settings::load_from(&path).is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp = tempdir().unwrap();
        let err = Settings::load(Some(&temp.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_overrides_win() {
        let settings = Settings {
            templates: Some(PathBuf::from("file.json")),
            max_depth: Some(10),
        };

        let merged = settings.clone().with_overrides(None, Some(3));
        assert_eq!(merged.templates, Some(PathBuf::from("file.json")));
        assert_eq!(merged.max_depth(), 3);

        let merged = settings.with_overrides(Some(PathBuf::from("flag.yaml")), None);
        assert_eq!(merged.templates, Some(PathBuf::from("flag.yaml")));
        assert_eq!(merged.max_depth(), 10);

        assert_eq!(Settings::default().max_depth(), DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_template_tree_sources() {
        assert!(!Settings::default().template_tree().unwrap().is_empty());

        let temp = tempdir().unwrap();
        let path = temp.path().join("t.yaml");
        std::fs::write(&path, "'*.in_int': '{name}={value}'\n").unwrap();

        let settings = Settings::default().with_overrides(Some(path), Some(4));
        assert_eq!(settings.template_tree().unwrap().len(), 1);
        assert_eq!(settings.converter().unwrap().max_depth(), 4);

        let missing = Settings::default().with_overrides(Some(temp.path().join("missing.json")), None);
        let err = missing.template_tree().unwrap_err();
        assert!(err.to_string().contains("Failed to load templates"));
    }
}
