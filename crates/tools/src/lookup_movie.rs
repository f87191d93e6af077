//! Search external movie databases through Radarr.

use std::sync::Arc;

use async_trait::async_trait;
use radarr_mcp_core::api::RadarrApi;
use radarr_mcp_core::error::ToolError;
use radarr_mcp_core::tool::{Tool, ToolResult};
use serde_json::Value;
use tracing::debug;

use crate::args::required_str;
use crate::pipeline::{Pipeline, records};

pub struct LookupMovieTool {
    api: Arc<dyn RadarrApi>,
}

impl LookupMovieTool {
    pub fn new(api: Arc<dyn RadarrApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for LookupMovieTool {
    fn name(&self) -> &str {
        "lookup_movie"
    }

    fn description(&self) -> &str {
        "Search for movies by name or title, including movies not yet in the Radarr library. \
         Returns title, year, tmdbId (needed to add a movie), overview, ratings, artwork URLs \
         and radarr_status (tracked / monitored / downloaded). Include the year for precision, \
         e.g. \"The Matrix (1999)\"."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Movie name or title to search for"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        let query = required_str(&arguments, "query")?.trim();
        if query.is_empty() {
            return Err(ToolError::InvalidArguments("'query' must not be empty".into()));
        }

        let response = self
            .api
            .get("movie/lookup", vec![("term".into(), query.to_string())])
            .await?;
        let found = records(&response, "movie/lookup")?;
        debug!(query, results = found.len(), "Movie lookup");

        let movies = Pipeline::movie_details().apply_all(found, self.api.origin())?;
        Ok(ToolResult::json(true, Value::Array(movies)))
    }
}
