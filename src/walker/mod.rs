//! Tree walker: flattens a [`Value`] tree into template-rendered lines.
//!
//! The walk is strict pre-order, depth-first, in the input's own iteration
//! order (list index order, map insertion order). For each container:
//!
//! ```text
//! ENTER -> CHILD_0 -> [NEXT] -> CHILD_1 -> [NEXT] -> ... -> CHILD_n -> EXIT
//! ```
//!
//! - `ENTER` / `EXIT` render `in_<type>` / `out_<type>` at the container's path.
//! - A scalar child renders exactly one line (`inout_<type>`, then the
//!   `in_<type>` family) at its own path. Scalars get no exit line.
//! - `NEXT` renders `*next_in_<type of next sibling>` at the current child's
//!   path, with the current child as `{value}`. It is optional: no template,
//!   no line. Nothing is emitted after the last child.
//! - Empty containers produce exactly `ENTER` and `EXIT`.
//!
//! Conversion aborts on the first render error, and when nesting exceeds
//! the configured depth limit.

pub mod path;

pub use path::{Path, PathScope};

use std::sync::Arc;

use crate::constants::DEFAULT_MAX_DEPTH;
use crate::core::FlattenError;
use crate::templates::{Event, LookupKey, RenderContext, TemplateTree, render};
use crate::value::Value;

/// Converts value trees into lines using a shared template tree.
///
/// Cheap to clone; the template tree is shared. Each call to
/// [`convert`](Self::convert) owns its path and output buffer, so one
/// converter can serve concurrent callers.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use metaflat_cli::templates::TemplateTree;
/// use metaflat_cli::value::Value;
/// use metaflat_cli::walker::Converter;
///
/// let templates = TemplateTree::build([
///     ("*.in_dict", "{\n"),
///     ("*.out_dict", "}\n"),
///     ("*.in_int", "{name}={value};\n"),
/// ])?;
/// let converter = Converter::new(Arc::new(templates));
///
/// let record = Value::from_json_str(r#"{"width": 512, "height": 256}"#).unwrap();
/// assert_eq!(converter.convert_to_string(&record)?, "{\nwidth=512;\nheight=256;\n}\n");
/// # Ok::<(), metaflat_cli::core::FlattenError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    templates: Arc<TemplateTree>,
    max_depth: usize,
}

impl Converter {
    #[must_use]
    pub fn new(templates: Arc<TemplateTree>) -> Self {
        Self {
            templates,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the maximum container nesting depth.
    ///
    /// Depth counts from the value being converted (depth 0), so a prefix
    /// passed to [`convert_at`](Self::convert_at) does not use up the limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn templates(&self) -> &TemplateTree {
        &self.templates
    }

    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Flatten `value` into rendered lines.
    ///
    /// # Errors
    ///
    /// - [`FlattenError::UnsupportedRootKind`] if `value` is a scalar
    /// - [`FlattenError::TemplateRender`] on the first failing placeholder
    /// - [`FlattenError::DepthLimitExceeded`] past the depth limit
    pub fn convert(&self, value: &Value) -> Result<Vec<String>, FlattenError> {
        self.convert_at(value, Path::new())
    }

    /// Flatten `value` as if it were located at `path`.
    ///
    /// Template lookup and `{name}`/`{host}` see the full path, so a subtree
    /// renders the same lines it would inside its parent.
    pub fn convert_at(&self, value: &Value, mut path: Path) -> Result<Vec<String>, FlattenError> {
        if !value.is_container() {
            return Err(FlattenError::UnsupportedRootKind {
                kind: value.type_name(),
            });
        }

        let mut walk = Walk {
            templates: &self.templates,
            max_depth: self.max_depth,
            base_depth: path.depth(),
            lines: Vec::new(),
        };
        walk.container(&mut path, value)?;

        tracing::debug!("Converted value at '{}' into {} lines", path, walk.lines.len());
        Ok(walk.lines)
    }

    /// Flatten `value` and concatenate the lines into one text blob.
    pub fn convert_to_string(&self, value: &Value) -> Result<String, FlattenError> {
        Ok(self.convert(value)?.concat())
    }
}

/// State of one conversion: the output buffer. The path travels separately
/// so scopes can borrow it while `self` is borrowed for recursion.
struct Walk<'t> {
    templates: &'t TemplateTree,
    max_depth: usize,
    /// Depth of the prefix the conversion started at.
    base_depth: usize,
    lines: Vec<String>,
}

impl Walk<'_> {
    fn container(&mut self, path: &mut Path, value: &Value) -> Result<(), FlattenError> {
        if path.depth() - self.base_depth > self.max_depth {
            return Err(FlattenError::DepthLimitExceeded {
                limit: self.max_depth,
                path: path.to_string(),
            });
        }

        self.emit(path, Event::In, value)?;

        match value {
            Value::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.child(path, index.to_string(), item, items.get(index + 1))?;
                }
            }
            Value::Map(map) => {
                for (index, (key, item)) in map.iter().enumerate() {
                    let next = map.get_index(index + 1).map(|(_, v)| v);
                    self.child(path, key.clone(), item, next)?;
                }
            }
            Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_) => {}
        }

        self.emit(path, Event::Out, value)
    }

    fn child(
        &mut self,
        path: &mut Path,
        segment: String,
        value: &Value,
        next: Option<&Value>,
    ) -> Result<(), FlattenError> {
        let mut scope = path.enter(segment);

        if value.is_container() {
            self.container(&mut scope, value)?;
        } else {
            self.emit(&scope, Event::Inout, value)?;
        }

        if let Some(next) = next {
            self.transition(&scope, value, next)?;
        }
        Ok(())
    }

    /// Render a required template for `event` at `path`.
    fn emit(&mut self, path: &Path, event: Event, value: &Value) -> Result<(), FlattenError> {
        let key = LookupKey::new(event, value.type_name());
        let template = self.templates.resolve(path.segments(), &key);
        self.push_rendered(path, template, value)
    }

    /// Render the optional sibling transition, keyed by the next sibling's type.
    fn transition(&mut self, path: &Path, value: &Value, next: &Value) -> Result<(), FlattenError> {
        let key = LookupKey::new(Event::Next, next.type_name());
        match self.templates.lookup(path.segments(), &key, Event::Next.may_be_missing()) {
            Some(template) => self.push_rendered(path, template, value),
            None => Ok(()),
        }
    }

    fn push_rendered(&mut self, path: &Path, template: String, value: &Value) -> Result<(), FlattenError> {
        let line = render(&template, &RenderContext::new(path.segments(), value)).map_err(
            |source| FlattenError::TemplateRender {
                path: path.to_string(),
                template,
                source,
            },
        )?;
        tracing::trace!("{} -> {:?}", path, line);
        self.lines.push(line);
        Ok(())
    }
}
