//! Declared record shapes and validation against them.
//!
//! A [`Schema`] lists typed, optional-or-required fields plus an
//! [`Extensibility`] mode for undeclared keys. Validation collects every
//! field problem in one pass and returns them together in a
//! [`SchemaError`]; nothing fails fast.
//!
//! Coercion is lax in the same places Radarr payloads are sloppy:
//! integral floats and numeric strings are accepted for integers, numeric
//! strings for numbers, and `null` in an optional field means absent.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// What happens to keys a schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Extensibility {
    /// Unknown keys are errors.
    Closed,
    /// Unknown keys are dropped.
    IgnoreExtra,
    /// Unknown keys are kept verbatim.
    Open,
}

#[derive(Debug, Clone)]
pub enum FieldType {
    Bool,
    Integer,
    Number,
    String,
    Any,
    List(Box<FieldType>),
    /// String-keyed mapping with uniformly typed values.
    Map(Box<FieldType>),
    Shape(Arc<Schema>),
}

impl FieldType {
    pub fn list(inner: FieldType) -> Self {
        Self::List(Box::new(inner))
    }

    pub fn map(inner: FieldType) -> Self {
        Self::Map(Box::new(inner))
    }

    pub fn shape(schema: &Arc<Schema>) -> Self {
        Self::Shape(Arc::clone(schema))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("boolean"),
            Self::Integer => f.write_str("integer"),
            Self::Number => f.write_str("number"),
            Self::String => f.write_str("string"),
            Self::Any => f.write_str("any"),
            Self::List(inner) => write!(f, "list<{inner}>"),
            Self::Map(inner) => write!(f, "map<string, {inner}>"),
            Self::Shape(schema) => f.write_str(schema.name()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub ty: FieldType,
    pub required: bool,
}

#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    mode: Extensibility,
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(name: impl Into<String>, mode: Extensibility) -> Self {
        Self {
            name: name.into(),
            mode,
            fields: Vec::new(),
        }
    }

    pub fn optional(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldSpec { name: name.into(), ty, required: false });
        self
    }

    pub fn required(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldSpec { name: name.into(), ty, required: true });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> Extensibility {
        self.mode
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate `value` against this schema, reporting every problem.
    pub fn validate(&self, value: &Value) -> Result<ValidatedShape, SchemaError> {
        let mut errors = Vec::new();
        let shape = self.validate_at(value, "", &mut errors);
        match shape {
            Some(shape) if errors.is_empty() => Ok(shape),
            _ => Err(SchemaError {
                schema: self.name.clone(),
                errors,
            }),
        }
    }

    fn validate_at(&self, value: &Value, path: &str, errors: &mut Vec<FieldError>) -> Option<ValidatedShape> {
        let Some(record) = value.as_object() else {
            errors.push(FieldError::type_mismatch(path, self.name.clone(), value));
            return None;
        };

        let mut fields = IndexMap::with_capacity(self.fields.len());
        for spec in &self.fields {
            let field_path = join_key(path, &spec.name);
            match record.get(&spec.name) {
                None | Some(Value::Null) if !spec.required => {
                    fields.insert(spec.name.clone(), Validated::Absent);
                }
                None => errors.push(FieldError {
                    path: field_path,
                    kind: FieldErrorKind::Missing,
                }),
                Some(raw) => {
                    if let Some(validated) = check(&spec.ty, raw, &field_path, errors) {
                        fields.insert(spec.name.clone(), validated);
                    }
                }
            }
        }

        for (key, raw) in record {
            if self.field(key).is_some() {
                continue;
            }
            match self.mode {
                Extensibility::Open => {
                    fields.insert(key.clone(), Validated::Value(raw.clone()));
                }
                Extensibility::IgnoreExtra => {}
                Extensibility::Closed => errors.push(FieldError {
                    path: join_key(path, key),
                    kind: FieldErrorKind::Unknown,
                }),
            }
        }

        Some(ValidatedShape {
            schema: self.name.clone(),
            fields,
        })
    }
}

fn check(ty: &FieldType, raw: &Value, path: &str, errors: &mut Vec<FieldError>) -> Option<Validated> {
    let scalar = match ty {
        FieldType::Any => Some(raw.clone()),
        FieldType::Bool => raw.is_boolean().then(|| raw.clone()),
        FieldType::String => raw.is_string().then(|| raw.clone()),
        FieldType::Integer => coerce_integer(raw),
        FieldType::Number => coerce_number(raw),
        FieldType::List(inner) => {
            let Some(items) = raw.as_array() else {
                errors.push(FieldError::type_mismatch(path, ty.to_string(), raw));
                return None;
            };
            let before = errors.len();
            let checked: Vec<Validated> = items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| check(inner, item, &format!("{path}[{i}]"), errors))
                .collect();
            return (errors.len() == before).then_some(Validated::List(checked));
        }
        FieldType::Map(inner) => {
            let Some(entries) = raw.as_object() else {
                errors.push(FieldError::type_mismatch(path, ty.to_string(), raw));
                return None;
            };
            let before = errors.len();
            let checked: IndexMap<String, Validated> = entries
                .iter()
                .filter_map(|(key, item)| {
                    check(inner, item, &join_key(path, key), errors).map(|v| (key.clone(), v))
                })
                .collect();
            return (errors.len() == before).then_some(Validated::Map(checked));
        }
        FieldType::Shape(schema) => {
            let before = errors.len();
            let shape = schema.validate_at(raw, path, errors)?;
            return (errors.len() == before).then_some(Validated::Shape(shape));
        }
    };

    match scalar {
        Some(value) => Some(Validated::Value(value)),
        None => {
            errors.push(FieldError::type_mismatch(path, ty.to_string(), raw));
            None
        }
    }
}

fn coerce_integer(raw: &Value) -> Option<Value> {
    match raw {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(raw.clone()),
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| Value::from(f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
        _ => None,
    }
}

fn coerce_number(raw: &Value) -> Option<Value> {
    match raw {
        Value::Number(_) => Some(raw.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(Value::from(i));
            }
            s.parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
        }
        _ => None,
    }
}

fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

/// One problem at one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted location, with `[i]` for list positions. Empty for the root.
    pub path: String,
    pub kind: FieldErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    Missing,
    Type { expected: String, found: &'static str },
    Unknown,
}

impl FieldError {
    fn type_mismatch(path: &str, expected: String, found: &Value) -> Self {
        Self {
            path: path.to_string(),
            kind: FieldErrorKind::Type {
                expected,
                found: json_kind(found),
            },
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "(root)" } else { &self.path };
        match &self.kind {
            FieldErrorKind::Missing => write!(f, "{path}: field required"),
            FieldErrorKind::Type { expected, found } => {
                write!(f, "{path}: expected {expected}, found {found}")
            }
            FieldErrorKind::Unknown => write!(f, "{path}: unknown field"),
        }
    }
}

/// Every field error found while validating one value.
#[derive(Debug, Clone, Error)]
#[error("{schema} failed validation: {}", join_errors(.errors))]
pub struct SchemaError {
    pub schema: String,
    pub errors: Vec<FieldError>,
}

impl SchemaError {
    /// Paths of all errors, in discovery order.
    pub fn paths(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.path.as_str()).collect()
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A validated field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Validated {
    /// A declared optional field with no value.
    Absent,
    Value(Value),
    List(Vec<Validated>),
    Map(IndexMap<String, Validated>),
    Shape(ValidatedShape),
}

impl Validated {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ValidatedShape> {
        match self {
            Self::Shape(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Validated]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Validated>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// JSON form; `Absent` becomes `null`.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Absent => Value::Null,
            Self::Value(v) => v.clone(),
            Self::List(items) => Value::Array(items.iter().map(Validated::to_value).collect()),
            Self::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect(),
            ),
            Self::Shape(shape) => shape.to_value(),
        }
    }
}

impl Serialize for Validated {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Value(v) => v.serialize(serializer),
            Self::List(items) => serializer.collect_seq(items),
            Self::Map(entries) => serializer.collect_map(entries),
            Self::Shape(shape) => shape.serialize(serializer),
        }
    }
}

/// A record that passed validation.
///
/// Declared fields come first in declaration order (absent ones included
/// as [`Validated::Absent`]), followed by passed-through extras.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedShape {
    schema: String,
    fields: IndexMap<String, Validated>,
}

impl ValidatedShape {
    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn get(&self, name: &str) -> Option<&Validated> {
        self.fields.get(name)
    }

    /// The plain JSON value of a present scalar-like field.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(Validated::as_value)
    }

    pub fn is_absent(&self, name: &str) -> bool {
        self.get(name).is_none_or(Validated::is_absent)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Validated)> {
        self.fields.iter()
    }

    /// JSON form with absent fields omitted.
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .filter(|(_, v)| !v.is_absent())
            .map(|(k, v)| (k.clone(), v.to_value()))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for ValidatedShape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present: Vec<(&String, &Validated)> =
            self.fields.iter().filter(|(_, v)| !v.is_absent()).collect();
        let mut map = serializer.serialize_map(Some(present.len()))?;
        for (key, value) in present {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
