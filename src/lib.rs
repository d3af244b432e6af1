//! metaflat - template-driven flattening of structured metadata into text
//!
//! metaflat walks a JSON/YAML value tree depth-first and renders one text
//! line per traversal event, using templates chosen by the node's path and
//! value type. Its main use is turning extracted raster-file metadata into a
//! text blob for full-text search indexing.
//!
//! # Architecture Overview
//!
//! - A [`templates::TemplateTree`] is built once from a flat
//!   `pattern -> template` mapping and shared immutably
//! - A [`walker::Converter`] walks a [`value::Value`] and renders a line for
//!   every container entry/exit, scalar and sibling transition
//! - The [`document`] module wraps the rendered text into index documents
//!
//! # Core Modules
//!
//! - [`value`] - the value tree and its semantic type names
//! - [`templates`] - template tree, lookup keys, rendering, template files
//! - [`walker`] - depth-first traversal producing rendered lines
//! - [`document`] - index documents for stored raster files
//! - [`config`] - `metaflat.toml` settings
//! - [`core`] - error types and user-facing error display
//! - [`cli`] - the `metaflat` command-line interface
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use metaflat_cli::templates::TemplateTree;
//! use metaflat_cli::value::Value;
//! use metaflat_cli::walker::Converter;
//!
//! let templates = TemplateTree::build([
//!     ("*.in_dict", "{\n"),
//!     ("*.out_dict", "}\n"),
//!     ("*.in_list", "[\n"),
//!     ("*.out_list", "]\n"),
//!     ("*.in_int", "{name}={value};\n"),
//! ])?;
//! let converter = Converter::new(Arc::new(templates));
//!
//! let value = Value::from_json_str(r#"{"a": 1, "b": [2, 3]}"#).unwrap();
//! let lines = converter.convert(&value)?;
//! assert_eq!(lines, ["{\n", "a=1;\n", "[\n", "0=2;\n", "1=3;\n", "]\n", "}\n"]);
//! # Ok::<(), metaflat_cli::core::FlattenError>(())
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod document;
pub mod templates;
pub mod value;
pub mod walker;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
