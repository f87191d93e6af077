//! List every movie in the Radarr library.

use std::sync::Arc;

use async_trait::async_trait;
use radarr_mcp_core::api::RadarrApi;
use radarr_mcp_core::error::ToolError;
use radarr_mcp_core::tool::{Tool, ToolResult};
use serde_json::Value;

use crate::pipeline::{Pipeline, records};

pub struct MovieListTool {
    api: Arc<dyn RadarrApi>,
}

impl MovieListTool {
    pub fn new(api: Arc<dyn RadarrApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for MovieListTool {
    fn name(&self) -> &str {
        "movie_list"
    }

    fn description(&self) -> &str {
        "List all movies already tracked in the Radarr library with minimal details \
         (id, title, year, tmdbId). Use it to check whether a movie has been added."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _arguments: Value) -> Result<ToolResult, ToolError> {
        let response = self.api.get("movie", Vec::new()).await?;
        let movies = Pipeline::movie_minimal().apply_all(records(&response, "movie")?, self.api.origin())?;
        Ok(ToolResult::json(true, Value::Array(movies)))
    }
}
