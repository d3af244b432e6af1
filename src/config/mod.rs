//! Configuration for metaflat runs.
//!
//! - `parser` - generic TOML parsing with file-path error context
//! - `settings` - the `metaflat.toml` settings file and flag overrides
//!
//! Template files are not configuration in this sense; they are loaded by
//! [`crate::templates::load_template_file`].

mod parser;
mod settings;

pub use parser::parse_config;
pub use settings::Settings;
