//! Structured search over movie records.
//!
//! Criteria arrive as a loose JSON object from the caller and are parsed
//! into typed [`Criterion`] values up front, so a typo in a key or a
//! malformed range is rejected before any record is looked at. A record
//! matches when every criterion holds.

use serde_json::Value;
use thiserror::Error;

use crate::path::{KeyPath, lookup};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CriteriaError {
    #[error("search criteria must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("unknown search criterion '{0}' (supported: {supported})", supported = SearchCriteria::KEYS.join(", "))]
    UnknownCriterion(String),

    #[error("invalid value for '{key}': {reason}")]
    Malformed { key: String, reason: String },
}

impl CriteriaError {
    fn malformed(key: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Numeric test: exact equality, or strict `gt`/`lt` bounds with an
/// optional `eq`. A missing record value fails every bound.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericPredicate {
    Exact(f64),
    Range {
        gt: Option<f64>,
        lt: Option<f64>,
        eq: Option<f64>,
    },
}

impl NumericPredicate {
    fn parse(key: &str, raw: &Value, allow_exact: bool) -> Result<Self, CriteriaError> {
        match raw {
            Value::Number(n) if allow_exact => n
                .as_f64()
                .map(Self::Exact)
                .ok_or_else(|| CriteriaError::malformed(key, "number out of range")),
            Value::Object(bounds) => {
                let (mut gt, mut lt, mut eq) = (None, None, None);
                for (op, bound) in bounds {
                    let slot = match op.as_str() {
                        "gt" => &mut gt,
                        "lt" => &mut lt,
                        "eq" => &mut eq,
                        other => {
                            return Err(CriteriaError::malformed(
                                key,
                                format!("unsupported range operator '{other}' (use gt, lt, eq)"),
                            ));
                        }
                    };
                    *slot = Some(bound.as_f64().ok_or_else(|| {
                        CriteriaError::malformed(key, format!("'{op}' bound must be a number"))
                    })?);
                }
                Ok(Self::Range { gt, lt, eq })
            }
            _ if allow_exact => Err(CriteriaError::malformed(
                key,
                "expected a number or a range object like {\"gt\": 2000, \"lt\": 2010}",
            )),
            _ => Err(CriteriaError::malformed(
                key,
                "expected a range object like {\"gt\": 1000000000}",
            )),
        }
    }

    pub fn test(&self, actual: Option<f64>) -> bool {
        match *self {
            Self::Exact(expected) => actual == Some(expected),
            Self::Range { gt, lt, eq } => {
                if eq.is_some_and(|eq| actual != Some(eq)) {
                    return false;
                }
                if gt.is_some_and(|gt| !actual.is_some_and(|a| a > gt)) {
                    return false;
                }
                if lt.is_some_and(|lt| !actual.is_some_and(|a| a < lt)) {
                    return false;
                }
                true
            }
        }
    }
}

/// One parsed search predicate. String payloads are stored lowercased.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Case-insensitive substring of `title`.
    Name(String),
    QualityProfileId(i64),
    /// Any shared genre, case-insensitive.
    Genres(Vec<String>),
    Certification(String),
    Year(NumericPredicate),
    Monitored(bool),
    Status(String),
    /// Range over `movieFile.size`.
    FileSize(NumericPredicate),
}

impl Criterion {
    fn parse(key: &str, raw: &Value) -> Result<Self, CriteriaError> {
        match key {
            "name" => expect_str(key, raw).map(|s| Self::Name(s.to_lowercase())),
            "qualityProfileId" => integer(raw)
                .map(Self::QualityProfileId)
                .ok_or_else(|| CriteriaError::malformed(key, "expected an integer profile id")),
            "genres" => {
                let items = raw
                    .as_array()
                    .ok_or_else(|| CriteriaError::malformed(key, "expected a list of genre names"))?;
                items
                    .iter()
                    .map(|g| expect_str(key, g).map(str::to_lowercase))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Self::Genres)
            }
            "certification" => expect_str(key, raw).map(|s| Self::Certification(s.to_lowercase())),
            "year" => NumericPredicate::parse(key, raw, true).map(Self::Year),
            "monitored" => raw
                .as_bool()
                .map(Self::Monitored)
                .ok_or_else(|| CriteriaError::malformed(key, "expected true or false")),
            "status" => expect_str(key, raw).map(|s| Self::Status(s.to_lowercase())),
            "movieFile.size" => NumericPredicate::parse(key, raw, false).map(Self::FileSize),
            other => Err(CriteriaError::UnknownCriterion(other.to_string())),
        }
    }

    /// The criteria key this predicate was parsed from.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::QualityProfileId(_) => "qualityProfileId",
            Self::Genres(_) => "genres",
            Self::Certification(_) => "certification",
            Self::Year(_) => "year",
            Self::Monitored(_) => "monitored",
            Self::Status(_) => "status",
            Self::FileSize(_) => "movieFile.size",
        }
    }

    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Self::Name(needle) => text(record, "title").to_lowercase().contains(needle.as_str()),
            Self::QualityProfileId(id) => record.get("qualityProfileId").and_then(integer) == Some(*id),
            Self::Genres(wanted) => record
                .get("genres")
                .and_then(Value::as_array)
                .is_some_and(|genres| {
                    genres
                        .iter()
                        .filter_map(Value::as_str)
                        .any(|g| wanted.contains(&g.to_lowercase()))
                }),
            Self::Certification(cert) => text(record, "certification").to_lowercase() == *cert,
            Self::Year(predicate) => predicate.test(record.get("year").and_then(Value::as_f64)),
            Self::Monitored(flag) => record.get("monitored").and_then(Value::as_bool) == Some(*flag),
            Self::Status(status) => text(record, "status").to_lowercase() == *status,
            Self::FileSize(predicate) => predicate.test(
                lookup(record, &KeyPath::parse("movieFile.size")).and_then(Value::as_f64),
            ),
        }
    }
}

fn expect_str<'a>(key: &str, raw: &'a Value) -> Result<&'a str, CriteriaError> {
    raw.as_str()
        .ok_or_else(|| CriteriaError::malformed(key, "expected a string"))
}

fn text<'a>(record: &'a Value, key: &str) -> &'a str {
    record.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Integers, integral floats and integral numeric strings.
fn integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A conjunction of [`Criterion`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    criteria: Vec<Criterion>,
}

impl SearchCriteria {
    pub const KEYS: [&'static str; 8] = [
        "name",
        "qualityProfileId",
        "genres",
        "certification",
        "year",
        "monitored",
        "status",
        "movieFile.size",
    ];

    /// Parse caller-supplied criteria. Unknown keys are rejected.
    pub fn parse(raw: &Value) -> Result<Self, CriteriaError> {
        let Some(object) = raw.as_object() else {
            return Err(CriteriaError::NotAnObject(match raw {
                Value::Null => "null",
                Value::Array(_) => "list",
                Value::String(_) => "string",
                Value::Number(_) => "number",
                Value::Bool(_) => "boolean",
                Value::Object(_) => "mapping",
            }));
        };
        let criteria = object
            .iter()
            .map(|(key, value)| Criterion::parse(key, value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { criteria })
    }

    pub fn from_criteria(criteria: Vec<Criterion>) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// True when every criterion holds. Stops at the first failure.
    pub fn matches(&self, record: &Value) -> bool {
        self.criteria.iter().all(|c| c.matches(record))
    }
}
