//! Core types for metaflat
//!
//! Error handling shared by the template tree, the walker, and the CLI:
//! - [`FlattenError`] - strongly-typed failures of the flattening engine
//! - [`ErrorContext`] - user-friendly wrapper with suggestions and details
//! - [`user_friendly_error`] - convert any [`anyhow::Error`] for CLI display
//!
//! # Example
//!
//! ```rust,no_run
//! use metaflat_cli::core::{FlattenError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn example_operation() -> Result<String> {
//!     Err(FlattenError::invalid_config("templates.json", "expected a map").into())
//! }
//!
//! if let Err(e) = example_operation() {
//!     user_friendly_error(e).display();
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, FlattenError, user_friendly_error};
