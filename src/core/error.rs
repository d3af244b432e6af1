//! Error handling for metaflat
//!
//! This module provides the error types and user-friendly error reporting for
//! the flattening engine and the CLI around it. The error system follows two
//! principles:
//! 1. **Strongly-typed errors** for precise handling in library code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`FlattenError`] - Enumerated failure cases of template loading and conversion
//! - [`ErrorContext`] - Wrapper that adds a suggestion and details for display
//!
//! Library functions return `Result<_, FlattenError>`. Application code (CLI,
//! settings loading) works in [`anyhow::Result`] and adds file context with
//! `.with_context()`. [`user_friendly_error`] recovers the typed error from an
//! [`anyhow::Error`] chain for display.
//!
//! # Examples
//!
//! ```rust,no_run
//! use metaflat_cli::core::{FlattenError, user_friendly_error};
//! use metaflat_cli::value::TypeName;
//!
//! let error = FlattenError::UnsupportedRootKind { kind: TypeName::Int };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestion
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::templates::RenderError;
use crate::value::TypeName;

/// The main error type for flattening operations.
///
/// # Propagation
///
/// - [`InvalidTemplateConfig`](Self::InvalidTemplateConfig) fails fast while
///   building a template tree and is fatal to startup.
/// - [`UnsupportedRootKind`](Self::UnsupportedRootKind),
///   [`TemplateRender`](Self::TemplateRender) and
///   [`DepthLimitExceeded`](Self::DepthLimitExceeded) abort the conversion
///   call that raised them. No partial output is returned.
///
/// A template lookup miss is never an error; it resolves through the
/// fallback chain in [`crate::templates::TemplateTree::lookup`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlattenError {
    /// The template source could not be read, parsed, or expanded into a tree.
    #[error("Invalid template configuration in {source_name}: {reason}")]
    InvalidTemplateConfig {
        /// File path or `<inline>` for in-memory sources
        source_name: String,
        /// What was wrong with the source
        reason: String,
    },

    /// Conversion was started on a scalar instead of a list or map.
    #[error("Cannot convert a root value of type '{kind}': expected a list or a map")]
    UnsupportedRootKind {
        /// Type of the offending root value
        kind: TypeName,
    },

    /// A placeholder in a resolved template could not be substituted.
    #[error("Failed to render template at '{path}': {source}")]
    TemplateRender {
        /// Dot-joined path of the node being rendered
        path: String,
        /// The resolved template text
        template: String,
        /// The underlying substitution failure
        #[source]
        source: RenderError,
    },

    /// Input nesting exceeded the configured depth limit.
    #[error("Nesting depth limit of {limit} exceeded at '{path}'")]
    DepthLimitExceeded {
        /// Configured maximum depth
        limit: usize,
        /// Dot-joined path of the first container past the limit
        path: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl FlattenError {
    /// Shorthand for an [`InvalidTemplateConfig`](Self::InvalidTemplateConfig) error.
    pub fn invalid_config(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTemplateConfig {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// Terminal display colors the error red, details yellow and the suggestion
/// green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: FlattenError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: FlattenError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`FlattenError`] anywhere in the `anyhow` chain, JSON/YAML/TOML
/// parse failures of input files, and I/O errors. Everything else is shown
/// with its full context chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(flatten_error) = error.downcast_ref::<FlattenError>() {
        let context = create_error_context(flatten_error.clone());
        // Keep the outer context ("Failed to convert input.json") visible
        return if error.chain().count() > 1 && context.details.is_none() {
            context.with_details(format!("{error:#}"))
        } else {
            context
        };
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        let context = ErrorContext::new(FlattenError::Other {
            message: format!("{error:#}"),
        });
        return match io_error.kind() {
            std::io::ErrorKind::NotFound => context
                .with_suggestion("Check that the file exists and the path is correct"),
            std::io::ErrorKind::PermissionDenied => {
                context.with_suggestion("Check the file permissions and ownership")
            }
            _ => context,
        };
    }

    if error.downcast_ref::<serde_json::Error>().is_some()
        || error.downcast_ref::<serde_yaml::Error>().is_some()
    {
        return ErrorContext::new(FlattenError::Other {
            message: format!("{error:#}"),
        })
        .with_suggestion("Check the input syntax; records must be valid JSON or YAML")
        .with_details("Use --format to override detection by file extension");
    }

    if error.downcast_ref::<toml::de::Error>().is_some() {
        return ErrorContext::new(FlattenError::Other {
            message: format!("{error:#}"),
        })
        .with_suggestion("Check the TOML syntax of the settings file");
    }

    ErrorContext::new(FlattenError::Other {
        message: format!("{error:#}"),
    })
}

/// Attach a suggestion and details matching the error variant.
fn create_error_context(error: FlattenError) -> ErrorContext {
    let (suggestion, details) = match &error {
        FlattenError::InvalidTemplateConfig { .. } => (
            Some(
                "Template files must be a flat mapping of dot-joined patterns to strings, e.g. {\"*.in_dict\": \"{\\n\"}"
                    .to_string(),
            ),
            Some(
                "A key may not be used both as a template and as a prefix of longer keys"
                    .to_string(),
            ),
        ),
        FlattenError::UnsupportedRootKind { .. } => {
            (Some("Wrap the value in a list or map before converting it".to_string()), None)
        }
        FlattenError::TemplateRender { source, template, .. } => {
            let suggestion = match source.suggestion() {
                Some(name) => format!("Did you mean '{{{name}}}'?"),
                None => "Available placeholders are {host}, {name}, {type}, {value} and {value.<field>}"
                    .to_string(),
            };
            (Some(suggestion), Some(format!("Template: {template:?}")))
        }
        FlattenError::DepthLimitExceeded { .. } => (
            Some("Raise the limit with --max-depth or max_depth in metaflat.toml".to_string()),
            None,
        ),
        FlattenError::Other { .. } => (None, None),
    };

    ErrorContext {
        error,
        suggestion,
        details,
    }
}
