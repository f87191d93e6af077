//! The record pipeline every movie-returning tool runs.
//!
//! project → rewrite locators → attach derived status → validate.

use std::sync::Arc;

use radarr_mcp_core::error::{RemoteError, ToolError};
use radarr_mcp_filters::fieldsets::{self, locator_paths};
use radarr_mcp_filters::{DerivedStatus, FieldSet, KeyPath, Schema, SchemaError, project, rewrite_locators, shapes};
use serde_json::Value;

/// Key under which the derived status is attached.
pub const STATUS_KEY: &str = "radarr_status";

/// A field set paired with the schema its output must satisfy.
#[derive(Debug, Clone)]
pub struct Pipeline {
    fields: FieldSet,
    schema: Arc<Schema>,
    with_status: bool,
}

impl Pipeline {
    pub fn new(fields: FieldSet, schema: Arc<Schema>, with_status: bool) -> Self {
        Self { fields, schema, with_status }
    }

    pub fn movie_minimal() -> Self {
        Self::new(fieldsets::movie_minimal(), shapes::movie_minimal(), false)
    }

    pub fn movie_details() -> Self {
        Self::new(fieldsets::movie_details(), shapes::movie_details(), true)
    }

    pub fn movie_details_full() -> Self {
        Self::new(fieldsets::movie_details_full(), shapes::movie_details_full(), true)
    }

    /// Append caller-requested paths to the field set.
    pub fn with_fields<I, P>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<KeyPath>,
    {
        self.fields = self.fields.extended(extra);
        self
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Run one raw Radarr record through the pipeline.
    pub fn apply(&self, raw: &Value, origin: &str) -> Result<Value, SchemaError> {
        let mut projected = project(raw, &self.fields);
        rewrite_locators(&mut projected, locator_paths(), origin);
        if self.with_status {
            if let Value::Object(record) = &mut projected {
                record.insert(STATUS_KEY.to_string(), DerivedStatus::derive(raw).to_value());
            }
        }
        Ok(self.schema.validate(&projected)?.to_value())
    }

    /// Run every mapping in `records`; anything else is skipped.
    pub fn apply_all<'a, I>(&self, records: I, origin: &str) -> Result<Vec<Value>, ToolError>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        records
            .into_iter()
            .filter(|record| record.is_object())
            .enumerate()
            .map(|(i, record)| {
                self.apply(record, origin)
                    .map_err(|e| ToolError::Validation(format!("record {i}: {e}")))
            })
            .collect()
    }
}

/// The elements of a list response. `null` counts as an empty list.
pub(crate) fn records<'a>(response: &'a Value, endpoint: &str) -> Result<&'a [Value], ToolError> {
    match response {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(&[]),
        other => Err(ToolError::Remote(RemoteError::Decode(format!(
            "expected a list from {endpoint}, got {}",
            kind(other)
        )))),
    }
}

pub(crate) fn validation(err: SchemaError) -> ToolError {
    ToolError::Validation(err.to_string())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
