//! Dotted key-paths and the selector that resolves them.
//!
//! A [`KeyPath`] like `ratings.*.value` is a sequence of literal keys and
//! `*` wildcards. Resolution never fails: a missing intermediate key just
//! yields `None`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// One step of a [`KeyPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Wildcard,
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if raw == "*" {
            Self::Wildcard
        } else {
            Self::Key(raw.to_string())
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Wildcard => f.write_str("*"),
        }
    }
}

/// An ordered, wildcard-capable field locator.
///
/// Parsing splits on `.` with no special-casing: `"a..b"` has an empty
/// middle key and `""` is the single empty key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    pub fn parse(raw: &str) -> Self {
        Self {
            segments: raw.split('.').map(Segment::parse).collect(),
        }
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// First segment and the remainder.
    pub fn split_first(&self) -> Option<(&Segment, &[Segment])> {
        self.segments.split_first()
    }

    /// A path with exactly one segment.
    pub fn is_direct(&self) -> bool {
        self.segments.len() == 1
    }

    pub fn has_wildcard(&self) -> bool {
        self.segments.iter().any(Segment::is_wildcard)
    }
}

impl FromStr for KeyPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for KeyPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl Serialize for KeyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KeyPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Resolve `path` against `value`.
///
/// - a literal segment indexes into a mapping; anything else is absent
/// - `*` on a mapping keeps every key whose value resolves the rest of the
///   path (the whole mapping when `*` is last)
/// - `*` on a sequence resolves the rest of the path per element,
///   dropping elements where it is absent
pub fn select(value: &Value, path: &KeyPath) -> Option<Value> {
    select_segments(value, path.segments())
}

fn select_segments(value: &Value, segments: &[Segment]) -> Option<Value> {
    let Some((head, rest)) = segments.split_first() else {
        return Some(value.clone());
    };

    match head {
        Segment::Key(key) => value
            .as_object()?
            .get(key)
            .and_then(|child| select_segments(child, rest)),
        Segment::Wildcard => match value {
            Value::Object(map) => {
                let selected: Map<String, Value> = map
                    .iter()
                    .filter_map(|(k, child)| select_segments(child, rest).map(|v| (k.clone(), v)))
                    .collect();
                Some(Value::Object(selected))
            }
            Value::Array(items) => Some(Value::Array(
                items
                    .iter()
                    .filter_map(|item| select_segments(item, rest))
                    .collect(),
            )),
            _ => None,
        },
    }
}

/// Borrowing lookup for literal-only paths. Returns `None` if the path
/// contains a wildcard or any key is missing.
pub fn lookup<'a>(value: &'a Value, path: &KeyPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(value, |current, segment| match segment {
            Segment::Key(key) => current.as_object()?.get(key),
            Segment::Wildcard => None,
        })
}
