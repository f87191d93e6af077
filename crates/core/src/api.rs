//! RadarrApi trait: the capability interface over the remote Radarr service.
//!
//! Every tool talks to Radarr exclusively through this trait, so the
//! filtering pipeline never sees transport details and tests can swap in
//! a scripted implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RemoteError;

/// HTTP methods the tools issue against Radarr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query-string parameters, in insertion order.
pub type Query = Vec<(String, String)>;

/// The remote Radarr API.
///
/// `path` is relative to the API root (e.g. `"movie/lookup"`), never an
/// absolute URL. Implementations fail with [`RemoteError::Status`] when
/// the remote responds with a status >= 400.
#[async_trait]
pub trait RadarrApi: Send + Sync {
    /// Base origin of the Radarr instance (e.g. `http://radarr.local:7878`),
    /// without a trailing slash. Used to absolutize relative locators.
    fn origin(&self) -> &str;

    /// Issue one request and return the decoded JSON body
    /// (`Value::Null` for an empty body).
    async fn request(
        &self,
        path: &str,
        method: Method,
        query: Query,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, RemoteError>;

    /// Convenience wrapper for a GET.
    async fn get(&self, path: &str, query: Query) -> Result<serde_json::Value, RemoteError> {
        self.request(path, Method::Get, query, None).await
    }
}
