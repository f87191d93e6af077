//! Error types for the Radarr MCP domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

/// A failed call to the remote Radarr API.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The remote answered with a status >= 400. `body` is the structured
    /// error payload (or the raw text wrapped as a JSON string).
    #[error("Radarr API error {status}: {}", remote_message(.body))]
    Status {
        status: u16,
        body: serde_json::Value,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode Radarr response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// HTTP status code, when the remote answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for a 404 from the remote.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The most useful human-readable message in the error.
    ///
    /// Radarr validation failures come back as a list of
    /// `{propertyName, errorMessage}` objects; other failures carry a
    /// `message` field.
    pub fn message(&self) -> String {
        match self {
            Self::Status { body, .. } => remote_message(body),
            other => other.to_string(),
        }
    }
}

fn remote_message(body: &serde_json::Value) -> String {
    let from_list = body
        .as_array()
        .and_then(|errors| errors.first())
        .and_then(|first| first.get("errorMessage"))
        .and_then(|m| m.as_str());
    let from_object = body.get("message").and_then(|m| m.as_str());

    match (from_list, from_object, body) {
        (Some(m), _, _) | (None, Some(m), _) => m.to_string(),
        (None, None, serde_json::Value::String(s)) => s.clone(),
        (None, None, serde_json::Value::Null) => "no error details".to_string(),
        (None, None, other) => other.to_string(),
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },
}
