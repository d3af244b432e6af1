//! Path-indexed template tree.
//!
//! Template sources are flat mappings from dot-joined patterns to template
//! strings:
//!
//! ```json
//! {
//!   "*.in_dict": "{\n",
//!   "*.out_dict": "}\n",
//!   "raster_properties.*.in_int": "{host}.{name} = {value}\n"
//! }
//! ```
//!
//! [`TemplateTree::build`] splits every key on `.` and nests the segments.
//! The last segment is the template key (`in_dict`, `*next_in_str`, ...);
//! the others are path patterns where `*` matches any segment. The top-level
//! `*` subtree is the default bucket consulted when nothing more specific
//! matches.
//!
//! A built tree is immutable. Share it behind an [`std::sync::Arc`]; reload
//! by building a new one.

use indexmap::IndexMap;

use super::event::LookupKey;
use crate::constants::{FALLBACK_TEMPLATE, KEY_SEPARATOR, WILDCARD};
use crate::core::FlattenError;

/// Source name used in errors for trees built from in-memory mappings.
const INLINE_SOURCE: &str = "<inline>";

type Branch = IndexMap<String, TemplateNode>;

/// A node of the template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateNode {
    /// Internal node keyed by path segment or template key.
    Branch(Branch),
    /// A template string.
    Leaf(String),
}

/// Immutable template tree with wildcard lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TemplateTree {
    root: Branch,
    entries: usize,
}

impl TemplateTree {
    /// Build a tree from flat `pattern -> template` entries.
    ///
    /// # Errors
    ///
    /// Returns [`FlattenError::InvalidTemplateConfig`] if a key is empty,
    /// contains an empty segment, or would make one node both a template and
    /// a subtree (`"a.b"` together with `"a.b.c"`).
    pub fn build<I, K, V>(entries: I) -> Result<Self, FlattenError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self::build_named(INLINE_SOURCE, entries)
    }

    /// Like [`build`](Self::build), naming the source in error messages.
    pub fn build_named<I, K, V>(source_name: &str, entries: I) -> Result<Self, FlattenError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut root = Branch::new();

        for (key, template) in entries {
            let key = key.as_ref();
            let segments: Vec<&str> = key.split(KEY_SEPARATOR).collect();
            if segments.iter().any(|s| s.is_empty()) {
                return Err(FlattenError::invalid_config(
                    source_name,
                    format!("template key '{key}' has an empty segment"),
                ));
            }
            let Some((leaf, parents)) = segments.split_last() else {
                continue;
            };

            let mut node = &mut root;
            for (depth, segment) in parents.iter().enumerate() {
                let child = node
                    .entry((*segment).to_string())
                    .or_insert_with(|| TemplateNode::Branch(Branch::new()));
                node = match child {
                    TemplateNode::Branch(branch) => branch,
                    TemplateNode::Leaf(_) => {
                        return Err(FlattenError::invalid_config(
                            source_name,
                            format!(
                                "template key '{key}' extends '{}', which is already a template",
                                parents[..=depth].join(".")
                            ),
                        ));
                    }
                };
            }

            if let Some(TemplateNode::Branch(_)) = node.get(*leaf) {
                return Err(FlattenError::invalid_config(
                    source_name,
                    format!("template key '{key}' is also a prefix of longer keys"),
                ));
            }
            node.insert((*leaf).to_string(), TemplateNode::Leaf(template.into()));
        }

        let tree = Self {
            entries: count_leaves(&root),
            root,
        };
        tracing::debug!("Built template tree from {} with {} entries", source_name, tree.entries);
        Ok(tree)
    }

    /// Number of templates in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Root-level nodes, in insertion order.
    #[must_use]
    pub const fn root(&self) -> &IndexMap<String, TemplateNode> {
        &self.root
    }

    /// The top-level `*` subtree, if the tree has one.
    fn default_bucket(&self) -> Option<&Branch> {
        match self.root.get(WILDCARD) {
            Some(TemplateNode::Branch(branch)) => Some(branch),
            _ => None,
        }
    }

    /// Walk `path` through the tree.
    ///
    /// Each segment descends into its literal key, or the `*` key when the
    /// literal is absent. A miss or a leaf reached along the way switches to
    /// the default bucket (`None` when the tree has none).
    fn walk<S: AsRef<str>>(&self, path: &[S]) -> Option<&Branch> {
        let mut node = &self.root;
        for segment in path {
            match node.get(segment.as_ref()).or_else(|| node.get(WILDCARD)) {
                Some(TemplateNode::Branch(branch)) => node = branch,
                Some(TemplateNode::Leaf(_)) | None => return self.default_bucket(),
            }
        }
        Some(node)
    }

    /// Resolve the template for `key` at `path`.
    ///
    /// Resolution order:
    /// 1. The node reached by walking `path` (literal segments before `*`)
    /// 2. If nothing matches there and `may_be_missing` is set: `None`
    /// 3. Otherwise the default bucket, then [`FALLBACK_TEMPLATE`]
    ///
    /// At each node the key's [candidates](LookupKey::candidates) are tried
    /// in order. When the walked node also holds a `*` template, it is
    /// appended to the result.
    ///
    /// With `may_be_missing == false` this always returns `Some`.
    #[must_use]
    pub fn lookup<S: AsRef<str>>(
        &self,
        path: &[S],
        key: &LookupKey,
        may_be_missing: bool,
    ) -> Option<String> {
        let candidates = key.candidates();
        let node = self.walk(path);

        let mut template = match node.and_then(|n| find_template(n, &candidates)) {
            Some(found) => found.to_string(),
            None if may_be_missing => return None,
            None => {
                let fallback = self.default_bucket().and_then(|d| find_template(d, &candidates));
                if fallback.is_none() {
                    tracing::debug!(
                        "No template for '{}' at '{}', using fallback",
                        key,
                        join_path(path)
                    );
                }
                fallback.unwrap_or(FALLBACK_TEMPLATE).to_string()
            }
        };

        if let Some(TemplateNode::Leaf(tail)) = node.and_then(|n| n.get(WILDCARD)) {
            template.push_str(tail);
        }

        Some(template)
    }

    /// Resolve a required template; never misses.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, path: &[S], key: &LookupKey) -> String {
        self.lookup(path, key, false).unwrap_or_else(|| FALLBACK_TEMPLATE.to_string())
    }

    /// All templates with their flat keys, in tree order.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, &str)> {
        let mut out = Vec::with_capacity(self.entries);
        collect_entries(&self.root, &mut Vec::new(), &mut out);
        out
    }
}

fn find_template<'a>(node: &'a Branch, candidates: &[String]) -> Option<&'a str> {
    candidates.iter().find_map(|key| match node.get(key) {
        Some(TemplateNode::Leaf(template)) => Some(template.as_str()),
        _ => None,
    })
}

fn count_leaves(branch: &Branch) -> usize {
    branch
        .values()
        .map(|node| match node {
            TemplateNode::Leaf(_) => 1,
            TemplateNode::Branch(child) => count_leaves(child),
        })
        .sum()
}

fn collect_entries<'a>(branch: &'a Branch, prefix: &mut Vec<&'a str>, out: &mut Vec<(String, &'a str)>) {
    for (key, node) in branch {
        prefix.push(key);
        match node {
            TemplateNode::Leaf(template) => out.push((prefix.join("."), template.as_str())),
            TemplateNode::Branch(child) => collect_entries(child, prefix, out),
        }
        prefix.pop();
    }
}

fn join_path<S: AsRef<str>>(path: &[S]) -> String {
    path.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(".")
}
