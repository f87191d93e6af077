//! Detailed information about one library movie, by exact title.

use std::sync::Arc;

use async_trait::async_trait;
use radarr_mcp_core::api::RadarrApi;
use radarr_mcp_core::error::ToolError;
use radarr_mcp_core::tool::{Tool, ToolResult};
use serde_json::Value;
use tracing::debug;

use crate::args::required_str;
use crate::pipeline::{Pipeline, records, validation};

pub struct MovieInfoTool {
    api: Arc<dyn RadarrApi>,
}

impl MovieInfoTool {
    pub fn new(api: Arc<dyn RadarrApi>) -> Self {
        Self { api }
    }
}

/// A successful call that found nothing.
pub(crate) fn not_found(message: String) -> ToolResult {
    ToolResult {
        call_id: String::new(),
        success: true,
        output: message,
        data: Some(Value::Null),
    }
}

#[async_trait]
impl Tool for MovieInfoTool {
    fn name(&self) -> &str {
        "movie_info"
    }

    fn description(&self) -> &str {
        "Get detailed information about a movie in the Radarr library by its exact title \
         (case-insensitive, must match completely): metadata, release dates, ratings, \
         file and media details when downloaded, and radarr_status. Returns null when no \
         library movie has that title."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Exact movie title"
                }
            },
            "required": ["title"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        let title = required_str(&arguments, "title")?;
        let wanted = title.to_lowercase();

        let response = self.api.get("movie", Vec::new()).await?;
        let found = records(&response, "movie")?.iter().find(|movie| {
            movie
                .get("title")
                .and_then(Value::as_str)
                .is_some_and(|t| t.to_lowercase() == wanted)
        });

        let Some(movie) = found else {
            debug!(title, "No library movie with that title");
            return Ok(not_found(format!("No movie titled '{title}' in the Radarr library")));
        };

        let details = Pipeline::movie_details_full()
            .apply(movie, self.api.origin())
            .map_err(validation)?;
        Ok(ToolResult::json(true, details))
    }
}
