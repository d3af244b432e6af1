//! Path-sensitive templates for flattening value trees.
//!
//! This module holds everything the walker needs to turn a node into text:
//!
//! - [`TemplateTree`] - immutable, path-indexed template set with wildcard
//!   lookup and a default bucket
//! - [`LookupKey`] / [`Event`] - which template family applies to a node
//! - [`render`] - placeholder substitution for a resolved template
//! - [`load_template_file`] / [`builtin_templates`] - template sources
//!
//! # Reserved template keys
//!
//! | Key | Used for |
//! |-----|----------|
//! | `in_<type>` | entering a container, or rendering a scalar leaf |
//! | `out_<type>` | leaving a container |
//! | `inout_<type>` | scalar leaf override, tried before `in_<type>` |
//! | `in_*`, `out_*` | any type |
//! | `in`, `out` | bare event, last resort at a node |
//! | `*next_in_<type>` | between siblings, keyed by the next sibling's type |
//! | `*` (leaf) | tail fragment appended to every template resolved at that node |
//!
//! Types are `null`, `bool`, `int`, `float`, `str`, `list`, `dict`.
//!
//! # Example
//!
//! ```rust
//! use metaflat_cli::templates::{Event, LookupKey, TemplateTree};
//! use metaflat_cli::value::TypeName;
//!
//! let tree = TemplateTree::build([
//!     ("*.in_int", "{name}={value}\n"),
//!     ("bands.*.in_int", "band {name}: {value}\n"),
//! ])?;
//!
//! let key = LookupKey::new(Event::In, TypeName::Int);
//! assert_eq!(tree.resolve(&["bands", "0"], &key), "band {name}: {value}\n");
//! assert_eq!(tree.resolve(&["width"], &key), "{name}={value}\n");
//! # Ok::<(), metaflat_cli::core::FlattenError>(())
//! ```

pub mod error;
pub mod event;
pub mod loader;
pub mod renderer;
pub mod tree;

pub use error::RenderError;
pub use event::{Event, LookupKey};
pub use loader::{TemplateFormat, builtin_templates, load_template_file, parse_templates};
pub use renderer::{RenderContext, check_placeholder, placeholders, render};
pub use tree::{TemplateNode, TemplateTree};
