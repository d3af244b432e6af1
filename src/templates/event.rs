//! Traversal events and the template keys derived from them.

use std::fmt;
use std::str::FromStr;

use crate::constants::WILDCARD;
use crate::value::TypeName;

/// Traversal phase selecting a template family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Entering a container.
    In,
    /// Leaving a container.
    Out,
    /// A scalar child: entered and left in a single line.
    ///
    /// Resolves `inout_<type>` first and shares the `in_<type>` family
    /// otherwise, so a plain `in_int` template covers integer leaves.
    Inout,
    /// Transition between two siblings, keyed by the next sibling's type.
    Next,
}

impl Event {
    /// Key prefixes tried for this event, most specific first.
    #[must_use]
    pub const fn prefixes(self) -> &'static [&'static str] {
        match self {
            Self::In => &["in"],
            Self::Out => &["out"],
            Self::Inout => &["inout", "in"],
            Self::Next => &["*next_in"],
        }
    }

    /// Whether a missing template is acceptable (no line is emitted).
    #[must_use]
    pub const fn may_be_missing(self) -> bool {
        matches!(self, Self::Next)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefixes()[0])
    }
}

/// Template key derived at lookup time: `<event>_<type>`, or a bare type
/// name when no event applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LookupKey {
    event: Option<Event>,
    type_name: TypeName,
}

impl LookupKey {
    #[must_use]
    pub const fn new(event: Event, type_name: TypeName) -> Self {
        Self {
            event: Some(event),
            type_name,
        }
    }

    /// A key consisting of the type name alone.
    #[must_use]
    pub const fn bare(type_name: TypeName) -> Self {
        Self {
            event: None,
            type_name,
        }
    }

    #[must_use]
    pub const fn event(&self) -> Option<Event> {
        self.event
    }

    #[must_use]
    pub const fn type_name(&self) -> TypeName {
        self.type_name
    }

    /// Keys to try at a single tree node, in order.
    ///
    /// For `in_int` this is `in_int`, `in_*`, `in`. `Inout` interleaves its
    /// own prefix before `in` at each level. Transitions stop at the
    /// any-type key (`*next_in_int`, `*next_in_*`).
    #[must_use]
    pub fn candidates(&self) -> Vec<String> {
        let Some(event) = self.event else {
            return vec![self.type_name.as_str().to_string()];
        };

        let prefixes = event.prefixes();
        let mut keys = Vec::with_capacity(prefixes.len() * 3);
        for prefix in prefixes {
            keys.push(format!("{prefix}_{}", self.type_name));
        }
        if self.type_name != TypeName::Any {
            for prefix in prefixes {
                keys.push(format!("{prefix}_{WILDCARD}"));
            }
        }
        if event != Event::Next {
            keys.extend(prefixes.iter().map(|p| (*p).to_string()));
        }
        keys
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.event {
            Some(event) => write!(f, "{event}_{}", self.type_name),
            None => write!(f, "{}", self.type_name),
        }
    }
}

impl FromStr for LookupKey {
    type Err = String;

    /// Parse `in_int`, `out_dict`, `inout_str`, `*next_in_*` or a bare type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Longest prefixes first: "inout" would otherwise parse as "in"
        const EVENTS: [(&str, Event); 4] = [
            ("*next_in_", Event::Next),
            ("inout_", Event::Inout),
            ("out_", Event::Out),
            ("in_", Event::In),
        ];

        for (prefix, event) in EVENTS {
            if let Some(type_name) = s.strip_prefix(prefix) {
                return Ok(Self::new(event, type_name.parse()?));
            }
        }
        s.parse::<TypeName>().map(Self::bare).map_err(|_| {
            format!("invalid lookup key '{s}' (expected e.g. in_dict, out_list, *next_in_int)")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(LookupKey::new(Event::In, TypeName::Dict).to_string(), "in_dict");
        assert_eq!(LookupKey::new(Event::Out, TypeName::List).to_string(), "out_list");
        assert_eq!(LookupKey::new(Event::Next, TypeName::Int).to_string(), "*next_in_int");
        assert_eq!(LookupKey::bare(TypeName::Str).to_string(), "str");
    }

    #[test]
    fn test_candidates() {
        assert_eq!(
            LookupKey::new(Event::In, TypeName::Int).candidates(),
            vec!["in_int", "in_*", "in"]
        );
        assert_eq!(
            LookupKey::new(Event::Inout, TypeName::Str).candidates(),
            vec!["inout_str", "in_str", "inout_*", "in_*", "inout", "in"]
        );
        assert_eq!(
            LookupKey::new(Event::Next, TypeName::Float).candidates(),
            vec!["*next_in_float", "*next_in_*"]
        );
        assert_eq!(LookupKey::new(Event::Next, TypeName::Any).candidates(), vec!["*next_in_*"]);
        assert_eq!(LookupKey::bare(TypeName::Null).candidates(), vec!["null"]);
    }

    #[test]
    fn test_parse() {
        assert_eq!("in_dict".parse::<LookupKey>(), Ok(LookupKey::new(Event::In, TypeName::Dict)));
        assert_eq!("inout_bool".parse::<LookupKey>(), Ok(LookupKey::new(Event::Inout, TypeName::Bool)));
        assert_eq!("*next_in_*".parse::<LookupKey>(), Ok(LookupKey::new(Event::Next, TypeName::Any)));
        assert_eq!("float".parse::<LookupKey>(), Ok(LookupKey::bare(TypeName::Float)));
        assert!("in_object".parse::<LookupKey>().is_err());
        assert!("sideways_int".parse::<LookupKey>().is_err());
    }

    #[test]
    fn test_may_be_missing() {
        assert!(Event::Next.may_be_missing());
        assert!(!Event::In.may_be_missing());
        assert!(!Event::Out.may_be_missing());
        assert!(!Event::Inout.may_be_missing());
    }
}
