//! Projection of records onto a [`FieldSet`].
//!
//! Paths are grouped by their first segment. A one-segment path copies
//! the value verbatim; longer paths recurse into nested mappings (or every
//! mapping of a nested sequence) with the remaining segments.

use serde_json::{Map, Value};

use crate::path::{KeyPath, Segment};

/// An ordered, duplicate-free collection of [`KeyPath`]s.
///
/// Declaration order is the key order of projected records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    paths: Vec<KeyPath>,
}

impl FieldSet {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<KeyPath>,
    {
        let mut set = Self::default();
        for path in paths {
            set.insert(path.into());
        }
        set
    }

    /// Add a path. Returns false if it was already present.
    pub fn insert(&mut self, path: KeyPath) -> bool {
        if self.paths.contains(&path) {
            return false;
        }
        self.paths.push(path);
        true
    }

    /// A copy of this set with `extra` paths appended (duplicates skipped).
    pub fn extended<I, P>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<KeyPath>,
    {
        let mut set = self.clone();
        for path in extra {
            set.insert(path.into());
        }
        set
    }

    pub fn paths(&self) -> &[KeyPath] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FromIterator<KeyPath> for FieldSet {
    fn from_iter<T: IntoIterator<Item = KeyPath>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// Paths sharing a first segment.
struct Group {
    head: Segment,
    direct: bool,
    nested: Option<FieldSet>,
}

fn plan(fields: &FieldSet) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    for path in fields.paths() {
        let Some((head, rest)) = path.split_first() else {
            continue;
        };
        let index = match groups.iter().position(|g| &g.head == head) {
            Some(i) => i,
            None => {
                groups.push(Group {
                    head: head.clone(),
                    direct: false,
                    nested: None,
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[index];
        if rest.is_empty() {
            group.direct = true;
        } else {
            group
                .nested
                .get_or_insert_with(FieldSet::default)
                .insert(KeyPath::from_segments(rest.to_vec()));
        }
    }
    groups
}

/// Project a record or a sequence of records.
///
/// Sequences are projected element-wise and non-mapping elements are
/// dropped. Scalars have nothing to project and yield `Value::Null`.
pub fn project(value: &Value, fields: &FieldSet) -> Value {
    match value {
        Value::Object(record) => Value::Object(project_record(record, fields)),
        Value::Array(items) => Value::Array(project_sequence(items, fields)),
        _ => Value::Null,
    }
}

/// Project a single record.
///
/// When a key is selected both directly and through a nested path
/// (`movieFile` and `movieFile.size`), the nested projection wins.
pub fn project_record(record: &Map<String, Value>, fields: &FieldSet) -> Map<String, Value> {
    let mut out = Map::new();

    for group in plan(fields) {
        match &group.head {
            Segment::Wildcard => {
                if group.direct {
                    for (key, value) in record {
                        out.insert(key.clone(), value.clone());
                    }
                }
                if let Some(nested) = &group.nested {
                    for (key, value) in record {
                        if let Some(projected) = project_nested(value, nested, true) {
                            out.insert(key.clone(), projected);
                        }
                    }
                }
            }
            Segment::Key(key) => {
                let Some(value) = record.get(key) else {
                    continue;
                };
                if group.direct {
                    out.insert(key.clone(), value.clone());
                }
                if let Some(nested) = &group.nested {
                    if let Some(projected) = project_nested(value, nested, false) {
                        out.insert(key.clone(), projected);
                    }
                }
            }
        }
    }

    out
}

fn project_sequence(items: &[Value], fields: &FieldSet) -> Vec<Value> {
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|record| Value::Object(project_record(record, fields)))
        .collect()
}

/// Under a wildcard only mappings and sequences made entirely of mappings
/// are descended into, so scalar lists such as `genres` survive a
/// `*` + `*.x` combination untouched.
fn project_nested(value: &Value, fields: &FieldSet, under_wildcard: bool) -> Option<Value> {
    match value {
        Value::Object(record) => Some(Value::Object(project_record(record, fields))),
        Value::Array(items) => {
            if under_wildcard && !items.iter().all(Value::is_object) {
                return None;
            }
            Some(Value::Array(project_sequence(items, fields)))
        }
        _ => None,
    }
}
