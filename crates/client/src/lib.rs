//! Radarr v3 API client.
//!
//! A thin `reqwest` wrapper implementing [`RadarrApi`]: every request goes
//! to `{base_url}/api/v3/{path}` with the `X-Api-Key` header. Error
//! statuses are turned into [`RemoteError::Status`] carrying whatever
//! structured payload Radarr sent back.

use std::time::Duration;

use async_trait::async_trait;
use radarr_mcp_core::api::{Method, Query, RadarrApi};
use radarr_mcp_core::error::RemoteError;
use serde_json::Value;
use tracing::{debug, warn};

/// Radarr API over HTTP.
pub struct HttpRadarrClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpRadarrClient {
    /// Build a client for the instance at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v3/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl std::fmt::Debug for HttpRadarrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRadarrClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl RadarrApi for HttpRadarrClient {
    fn origin(&self) -> &str {
        &self.base_url
    }

    async fn request(
        &self,
        path: &str,
        method: Method,
        query: Query,
        body: Option<Value>,
    ) -> Result<Value, RemoteError> {
        let url = self.endpoint(path);
        debug!(%method, path, "Sending Radarr request");

        let mut builder = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
        }
        .header("X-Api-Key", &self.api_key)
        .header("Accept", "application/json");

        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        if status >= 400 {
            let body = error_body(&text);
            warn!(status, path, "Radarr returned error");
            return Err(RemoteError::Status { status, body });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

/// Structured error payload, or the raw text when Radarr sent something
/// that is not JSON (proxies, HTML error pages).
fn error_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
