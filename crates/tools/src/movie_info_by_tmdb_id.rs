//! Detailed information about one library movie, by TMDb id.

use std::sync::Arc;

use async_trait::async_trait;
use radarr_mcp_core::api::RadarrApi;
use radarr_mcp_core::error::ToolError;
use radarr_mcp_core::tool::{Tool, ToolResult};
use serde_json::Value;

use crate::args::required_int;
use crate::movie_info::not_found;
use crate::pipeline::{Pipeline, records, validation};

pub struct MovieInfoByTmdbIdTool {
    api: Arc<dyn RadarrApi>,
}

impl MovieInfoByTmdbIdTool {
    pub fn new(api: Arc<dyn RadarrApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for MovieInfoByTmdbIdTool {
    fn name(&self) -> &str {
        "movie_info_by_tmdb_id"
    }

    fn description(&self) -> &str {
        "Get detailed information about a movie in the Radarr library by its TMDb \
         (The Movie Database) id, which is unambiguous unlike a title. Use a tmdbId from \
         lookup_movie. Returns null when the movie is not in the library."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "tmdbId": {
                    "type": "integer",
                    "description": "TMDb id of the movie (not Radarr's internal id)"
                }
            },
            "required": ["tmdbId"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        let tmdb_id = required_int(&arguments, "tmdbId")?;

        let response = self
            .api
            .get("movie", vec![("tmdbId".into(), tmdb_id.to_string())])
            .await?;

        let Some(movie) = records(&response, "movie")?.first() else {
            return Ok(not_found(format!("No movie with tmdbId {tmdb_id} in the Radarr library")));
        };

        let details = Pipeline::movie_details_full()
            .apply(movie, self.api.origin())
            .map_err(validation)?;
        Ok(ToolResult::json(true, details))
    }
}
