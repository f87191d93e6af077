//! Add a movie to Radarr and start searching for it.
//!
//! Remote failures are reported as an error result, not a tool error, so
//! the agent sees Radarr's own explanation (e.g. "already been added").

use std::sync::Arc;

use async_trait::async_trait;
use radarr_mcp_core::api::{Method, RadarrApi};
use radarr_mcp_core::error::{RemoteError, ToolError};
use radarr_mcp_core::tool::{Tool, ToolResult};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::args::{optional_str, required_int};

pub struct AddMovieTool {
    api: Arc<dyn RadarrApi>,
}

impl AddMovieTool {
    pub fn new(api: Arc<dyn RadarrApi>) -> Self {
        Self { api }
    }

    async fn default_root_folder(&self) -> Result<Option<String>, RemoteError> {
        let folders = self.api.get("rootfolder", Vec::new()).await?;
        Ok(folders
            .as_array()
            .and_then(|f| f.first())
            .and_then(|f| f.get("path"))
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    async fn lookup(&self, tmdb_id: i64) -> Result<Option<Value>, RemoteError> {
        let found = self
            .api
            .get("movie/lookup/tmdb", vec![("tmdbId".into(), tmdb_id.to_string())])
            .await?;
        let movie = match found {
            Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
            other => other,
        };
        Ok(match movie {
            Value::Object(record) if !record.is_empty() => Some(Value::Object(record)),
            _ => None,
        })
    }
}

fn failure(tmdb_id: i64, error: impl Into<String>, movie: Option<&Value>) -> ToolResult {
    let mut content = json!({"tmdbId": tmdb_id, "error": error.into()});
    if let Some(movie) = movie {
        content["title"] = movie.get("title").cloned().unwrap_or(Value::Null);
        content["year"] = movie.get("year").cloned().unwrap_or(Value::Null);
    }
    ToolResult::json(false, content)
}

#[async_trait]
impl Tool for AddMovieTool {
    fn name(&self) -> &str {
        "add_movie"
    }

    fn description(&self) -> &str {
        "Add a movie to Radarr's wanted list and immediately search for it. Needs the \
         tmdbId (from lookup_movie) and a qualityProfileId (from get_quality_profiles). \
         rootFolderPath defaults to the first root folder configured in Radarr. On \
         success returns the settings used; on failure returns Radarr's error message."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "tmdbId": {
                    "type": "integer",
                    "description": "TMDb id of the movie to add"
                },
                "qualityProfileId": {
                    "type": "integer",
                    "description": "Quality profile id to download with"
                },
                "rootFolderPath": {
                    "type": "string",
                    "description": "Library folder for the movie (optional)"
                }
            },
            "required": ["tmdbId", "qualityProfileId"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        let tmdb_id = required_int(&arguments, "tmdbId")?;
        let quality_profile_id = required_int(&arguments, "qualityProfileId")?;

        let root_folder = match optional_str(&arguments, "rootFolderPath")? {
            Some(path) => path.to_string(),
            None => match self.default_root_folder().await {
                Ok(Some(path)) => path,
                Ok(None) => return Ok(failure(tmdb_id, "No root folders are configured in Radarr", None)),
                Err(e) => return Ok(failure(tmdb_id, e.message(), None)),
            },
        };

        let movie = match self.lookup(tmdb_id).await {
            Ok(Some(movie)) => movie,
            Ok(None) => return Ok(failure(tmdb_id, format!("Movie with tmdbId {tmdb_id} not found."), None)),
            Err(e) => return Ok(failure(tmdb_id, e.message(), None)),
        };

        let payload = json!({
            "tmdbId": tmdb_id,
            "title": movie.get("title").cloned().unwrap_or(Value::Null),
            "year": movie.get("year").cloned().unwrap_or(Value::Null),
            "qualityProfileId": quality_profile_id,
            "rootFolderPath": root_folder,
            "minimumAvailability": "released",
            "monitored": true,
            "addOptions": {"searchForMovie": true},
        });

        match self
            .api
            .request("movie", Method::Post, Vec::new(), Some(payload.clone()))
            .await
        {
            Ok(_) => {
                info!(tmdb_id, title = %payload["title"], "Movie added");
                Ok(ToolResult::json(true, payload))
            }
            Err(e) => {
                warn!(tmdb_id, error = %e, "Adding movie failed");
                Ok(failure(tmdb_id, e.message(), Some(&movie)))
            }
        }
    }
}
