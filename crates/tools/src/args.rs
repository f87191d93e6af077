//! Argument extraction shared by the tools.

use radarr_mcp_core::error::ToolError;
use serde_json::Value;

/// Integers, integral floats and integral numeric strings.
pub(crate) fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    match args.get(key) {
        Some(Value::String(s)) => Ok(s),
        None | Some(Value::Null) => Err(ToolError::InvalidArguments(format!(
            "Missing '{key}' argument"
        ))),
        Some(_) => Err(ToolError::InvalidArguments(format!("'{key}' must be a string"))),
    }
}

/// Missing, null and empty strings are all `None`.
pub(crate) fn optional_str<'a>(args: &'a Value, key: &str) -> Result<Option<&'a str>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(ToolError::InvalidArguments(format!("'{key}' must be a string"))),
    }
}

pub(crate) fn required_int(args: &Value, key: &str) -> Result<i64, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Err(ToolError::InvalidArguments(format!(
            "Missing '{key}' argument"
        ))),
        Some(value) => as_int(value)
            .ok_or_else(|| ToolError::InvalidArguments(format!("'{key}' must be an integer"))),
    }
}

/// A list of strings; missing or null is an empty list.
pub(crate) fn optional_str_list(args: &Value, key: &str) -> Result<Vec<String>, ToolError> {
    let invalid = || ToolError::InvalidArguments(format!("'{key}' must be a list of strings"));
    match args.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
            .collect(),
        Some(_) => Err(invalid()),
    }
}
