//! Global constants used throughout the metaflat codebase.
//!
//! Reserved template keys, fallback templates, and numeric limits that are
//! shared between the template tree, the walker, and the CLI. Defining them
//! centrally keeps the reserved vocabulary discoverable.

/// Reserved wildcard key.
///
/// Used both as a path segment that matches any name in the template tree and
/// as the type name that matches any value type in lookup keys. A top-level
/// `*` subtree is the default bucket.
pub const WILDCARD: &str = "*";

/// Separator between path segments in flat template keys (`"*.in_dict"`).
pub const KEY_SEPARATOR: char = '.';

/// Template returned when neither the matched node nor the default bucket
/// provides a required template.
pub const FALLBACK_TEMPLATE: &str = "{host}.{name} = ?";

/// Default maximum container nesting depth accepted by the walker.
///
/// Input records come from metadata extraction and are rarely deeper than a
/// handful of levels; anything past this is treated as malformed input.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// File name of the optional settings file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "metaflat.toml";

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV_VAR: &str = "METAFLAT_CONFIG";

/// Built-in template set used when no template file is configured.
pub const BUILTIN_TEMPLATES: &str = include_str!("../templates/default.json");

/// Maximum Levenshtein distance, as a percentage of the placeholder length,
/// for "did you mean" suggestions on unknown placeholders.
pub const SIMILARITY_THRESHOLD_PERCENT: usize = 50;
