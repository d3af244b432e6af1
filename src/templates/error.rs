//! Placeholder substitution errors.

use thiserror::Error;

/// A placeholder in a template that could not be substituted.
///
/// Wrapped in [`crate::core::FlattenError::TemplateRender`] together with the
/// template and the path being rendered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The placeholder name is not one of `host`, `name`, `type`, `value`.
    #[error("unknown placeholder '{{{placeholder}}}'")]
    UnknownPlaceholder {
        placeholder: String,
        /// Closest known placeholder, if any is similar enough
        suggestion: Option<String>,
    },

    /// A `{value.<field>}` reference does not resolve in the rendered value.
    #[error("placeholder '{{{placeholder}}}' references missing field '{field}'")]
    MissingField { placeholder: String, field: String },
}

impl RenderError {
    /// Suggested replacement for the failing placeholder.
    #[must_use]
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::UnknownPlaceholder { suggestion, .. } => suggestion.as_deref(),
            Self::MissingField { .. } => None,
        }
    }

    /// The placeholder text without braces.
    #[must_use]
    pub fn placeholder(&self) -> &str {
        match self {
            Self::UnknownPlaceholder { placeholder, .. } | Self::MissingField { placeholder, .. } => {
                placeholder
            }
        }
    }
}
