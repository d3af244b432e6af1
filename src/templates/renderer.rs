//! Placeholder substitution for resolved templates.
//!
//! A template is plain text with `{placeholder}` references:
//!
//! | Placeholder | Substituted with |
//! |-------------|------------------|
//! | `{name}` | last path segment (empty at the root) |
//! | `{host}` | second-to-last path segment (empty above depth 2) |
//! | `{type}` | semantic type name of the value (`int`, `dict`, ...) |
//! | `{value}` | natural string form of the value |
//! | `{value.a.0}` | a nested field of the value, by map key or list index |
//!
//! `{{` and `}}` produce literal braces. A brace that does not open a
//! well-formed placeholder is copied through unchanged, so structural
//! templates such as `"{\n"` need no escaping.

use regex::Regex;
use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

use strsim::levenshtein;

use super::error::RenderError;
use crate::constants::SIMILARITY_THRESHOLD_PERCENT;
use crate::value::Value;

const PLACEHOLDERS: [&str; 4] = ["host", "name", "type", "value"];

/// `{{`, `}}`, or `{ident(.segment)*}` with the placeholder in group 1.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z0-9_-]+)*)\}")
        .expect("placeholder pattern is valid")
});

/// Everything a template can reference while rendering one line.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    path: &'a [String],
    value: &'a Value,
}

impl<'a> RenderContext<'a> {
    #[must_use]
    pub const fn new(path: &'a [String], value: &'a Value) -> Self {
        Self { path, value }
    }

    /// Last path segment, or empty at the root.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.path.last().map_or("", String::as_str)
    }

    /// Second-to-last path segment, or empty when the path has one segment or none.
    #[must_use]
    pub fn host(&self) -> &'a str {
        match self.path.len() {
            0 | 1 => "",
            n => &self.path[n - 2],
        }
    }

    #[must_use]
    pub const fn value(&self) -> &'a Value {
        self.value
    }
}

/// Render `template` against `ctx`.
///
/// Fails on the first placeholder that cannot be substituted; no partial
/// output is returned.
///
/// # Examples
///
/// ```rust
/// use metaflat_cli::templates::{RenderContext, render};
/// use metaflat_cli::value::Value;
///
/// let path = vec!["raster".to_string(), "width".to_string()];
/// let value = Value::Int(512);
/// let line = render("{host}.{name} = {value}\n", &RenderContext::new(&path, &value)).unwrap();
/// assert_eq!(line, "raster.width = 512\n");
/// ```
pub fn render(template: &str, ctx: &RenderContext<'_>) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut last = 0;

    for (range, token) in tokens(template) {
        out.push_str(&template[last..range.start]);
        match token {
            Token::OpenBrace => out.push('{'),
            Token::CloseBrace => out.push('}'),
            Token::Placeholder(placeholder) => out.push_str(&substitute(placeholder, ctx)?),
        }
        last = range.end;
    }

    // Lone braces never match and are copied with the surrounding text
    out.push_str(&template[last..]);
    Ok(out)
}

/// Names of the placeholders referenced by `template`, in order.
///
/// Used to validate template files before any value is rendered.
#[must_use]
pub fn placeholders(template: &str) -> Vec<&str> {
    tokens(template)
        .filter_map(|(_, token)| match token {
            Token::Placeholder(placeholder) => Some(placeholder),
            Token::OpenBrace | Token::CloseBrace => None,
        })
        .collect()
}

/// Check a placeholder without rendering it: the head must be a known name
/// and only `value` may carry field segments.
pub fn check_placeholder(placeholder: &str) -> Result<(), RenderError> {
    let (head, fields) = split_placeholder(placeholder);
    if !PLACEHOLDERS.contains(&head) {
        return Err(unknown_placeholder(placeholder, head));
    }
    match fields.first() {
        Some(field) if head != "value" => Err(RenderError::MissingField {
            placeholder: placeholder.to_string(),
            field: (*field).to_string(),
        }),
        _ => Ok(()),
    }
}

enum Token<'t> {
    OpenBrace,
    CloseBrace,
    Placeholder(&'t str),
}

/// Escapes and well-formed placeholders of `template`, with their byte ranges.
fn tokens(template: &str) -> impl Iterator<Item = (Range<usize>, Token<'_>)> {
    PLACEHOLDER.captures_iter(template).filter_map(|caps| {
        let whole = caps.get(0)?;
        let token = match caps.get(1) {
            Some(inner) => Token::Placeholder(inner.as_str()),
            None if whole.as_str() == "{{" => Token::OpenBrace,
            None => Token::CloseBrace,
        };
        Some((whole.range(), token))
    })
}

fn split_placeholder(placeholder: &str) -> (&str, Vec<&str>) {
    let mut segments = placeholder.split('.');
    let head = segments.next().unwrap_or_default();
    (head, segments.collect())
}

fn substitute<'a>(placeholder: &str, ctx: &RenderContext<'a>) -> Result<Cow<'a, str>, RenderError> {
    check_placeholder(placeholder)?;
    let (head, fields) = split_placeholder(placeholder);

    match head {
        "name" => Ok(Cow::Borrowed(ctx.name())),
        "host" => Ok(Cow::Borrowed(ctx.host())),
        "type" => Ok(Cow::Borrowed(ctx.value().type_name().as_str())),
        _ => {
            let mut current = ctx.value();
            for field in fields {
                current = current.get_field(field).ok_or_else(|| RenderError::MissingField {
                    placeholder: placeholder.to_string(),
                    field: field.to_string(),
                })?;
            }
            Ok(match current {
                Value::String(s) => Cow::Borrowed(s.as_str()),
                other => Cow::Owned(other.to_string()),
            })
        }
    }
}

fn unknown_placeholder(placeholder: &str, head: &str) -> RenderError {
    let max_distance = (head.len() * SIMILARITY_THRESHOLD_PERCENT / 100).max(1);
    let suggestion = PLACEHOLDERS
        .iter()
        .map(|known| (known, levenshtein(head, known)))
        .filter(|(_, distance)| *distance <= max_distance)
        .min_by_key(|(_, distance)| *distance)
        .map(|(known, _)| (*known).to_string());

    RenderError::UnknownPlaceholder {
        placeholder: placeholder.to_string(),
        suggestion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_name_and_host() {
        let value = Value::Int(3);

        let root = path(&[]);
        let ctx = RenderContext::new(&root, &value);
        assert_eq!((ctx.host(), ctx.name()), ("", ""));

        let one = path(&["a"]);
        let ctx = RenderContext::new(&one, &value);
        assert_eq!((ctx.host(), ctx.name()), ("", "a"));

        let three = path(&["a", "b", "c"]);
        let ctx = RenderContext::new(&three, &value);
        assert_eq!((ctx.host(), ctx.name()), ("b", "c"));
    }

    #[test]
    fn test_render_all_placeholders() {
        let p = path(&["gdal_metadata", "AREA_OR_POINT"]);
        let value = Value::from("Area");
        let line = render("{host}.{name}: {type} = \"{value}\"\n", &RenderContext::new(&p, &value))
            .unwrap();
        assert_eq!(line, "gdal_metadata.AREA_OR_POINT: str = \"Area\"\n");
    }

    #[test]
    fn test_structural_braces_are_literal() {
        let p = path(&[]);
        let value = Value::Map(Default::default());
        let ctx = RenderContext::new(&p, &value);
        assert_eq!(render("{\n", &ctx).unwrap(), "{\n");
        assert_eq!(render("}\n", &ctx).unwrap(), "}\n");
        assert_eq!(render("{ }", &ctx).unwrap(), "{ }");
        assert_eq!(render("{{name}}", &ctx).unwrap(), "{name}");
    }

    #[test]
    fn test_value_fields() {
        let p = path(&["pixel_size"]);
        let value = Value::from_json_str(r#"{"x": 0.5, "y": 0.5, "bands": [1, 2]}"#).unwrap();
        let ctx = RenderContext::new(&p, &value);
        assert_eq!(render("{value.x}x{value.y}", &ctx).unwrap(), "0.5x0.5");
        assert_eq!(render("{value.bands.1}", &ctx).unwrap(), "2");
        assert_eq!(render("{value}", &ctx).unwrap(), r#"{"x":0.5,"y":0.5,"bands":[1,2]}"#);
    }

    #[test]
    fn test_missing_field_is_error() {
        let p = path(&["a"]);
        let value = Value::from_json_str(r#"{"x": 1}"#).unwrap();
        let err = render("{value.z}", &RenderContext::new(&p, &value)).unwrap_err();
        assert_eq!(
            err,
            RenderError::MissingField {
                placeholder: "value.z".to_string(),
                field: "z".to_string(),
            }
        );

        let err = render("{name.first}", &RenderContext::new(&p, &value)).unwrap_err();
        assert!(matches!(err, RenderError::MissingField { .. }));
    }

    #[test]
    fn test_unknown_placeholder_suggests_closest() {
        let p = path(&["a"]);
        let value = Value::Int(1);
        let err = render("{nmae} = {value}", &RenderContext::new(&p, &value)).unwrap_err();
        assert_eq!(err.placeholder(), "nmae");
        assert_eq!(err.suggestion(), Some("name"));

        let err = render("{completely_different}", &RenderContext::new(&p, &value)).unwrap_err();
        assert_eq!(err.suggestion(), None);
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders("{host}.{name} = {value.x}\n"), vec!["host", "name", "value.x"]);
        assert!(placeholders("{\n").is_empty());
        assert!(placeholders("{{name}}").is_empty());
    }

    #[test]
    fn test_render_and_placeholders_see_same_tokens() {
        let p = path(&["bands", "0"]);
        let value = Value::from_json_str(r#"{"min": 1}"#).unwrap();
        let ctx = RenderContext::new(&p, &value);

        let template = "{{{host}}} {{name}} { name } {value.min}}} {}{-x}";
        assert_eq!(placeholders(template), vec!["host", "value.min"]);
        assert_eq!(render(template, &ctx).unwrap(), "{bands} {name} { name } 1} {}{-x}");
    }

    #[test]
    fn test_check_placeholder() {
        assert!(check_placeholder("value.a.0").is_ok());
        assert!(check_placeholder("type").is_ok());
        assert!(check_placeholder("index").is_err());
        assert!(check_placeholder("host.x").is_err());
    }
}
