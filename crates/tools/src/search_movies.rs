//! Filter the Radarr library by structured criteria.

use std::sync::Arc;

use async_trait::async_trait;
use radarr_mcp_core::api::RadarrApi;
use radarr_mcp_core::error::ToolError;
use radarr_mcp_core::tool::{Tool, ToolResult};
use radarr_mcp_filters::SearchCriteria;
use serde_json::{Value, json};
use tracing::debug;

use crate::args::optional_str_list;
use crate::pipeline::{Pipeline, records};

pub struct SearchMoviesTool {
    api: Arc<dyn RadarrApi>,
}

impl SearchMoviesTool {
    pub fn new(api: Arc<dyn RadarrApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for SearchMoviesTool {
    fn name(&self) -> &str {
        "search_for_movie"
    }

    fn description(&self) -> &str {
        "Search the Radarr library for movies matching every given criterion. Supported \
         criteria: name (title substring), qualityProfileId, genres (any of), \
         certification, year (number or {gt, lt, eq}), monitored, status and \
         movieFile.size ({gt, lt, eq} in bytes). Text comparisons ignore case. Results \
         carry id, title, year and tmdbId plus any dotted paths listed in includeFields."
    }

    fn parameters_schema(&self) -> Value {
        let range = json!({
            "type": "object",
            "properties": {
                "gt": {"type": "number"},
                "lt": {"type": "number"},
                "eq": {"type": "number"}
            },
            "additionalProperties": false
        });
        json!({
            "type": "object",
            "properties": {
                "criteria": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "qualityProfileId": {"type": "integer"},
                        "genres": {"type": "array", "items": {"type": "string"}},
                        "certification": {"type": "string"},
                        "year": {"anyOf": [{"type": "integer"}, range.clone()]},
                        "monitored": {"type": "boolean"},
                        "status": {"type": "string"},
                        "movieFile.size": range
                    },
                    "additionalProperties": false
                },
                "includeFields": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Extra dotted paths to include, e.g. \"movieFile.size\""
                }
            },
            "required": ["criteria"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        let raw = arguments
            .get("criteria")
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'criteria' argument".into()))?;
        let criteria = SearchCriteria::parse(raw).map_err(|e| ToolError::Validation(e.to_string()))?;
        let include = optional_str_list(&arguments, "includeFields")?;

        let response = self.api.get("movie", Vec::new()).await?;
        let library = records(&response, "movie")?;
        let matching: Vec<&Value> = library.iter().filter(|m| criteria.matches(m)).collect();
        debug!(
            criteria = criteria.criteria().len(),
            library = library.len(),
            matched = matching.len(),
            "Library search"
        );

        let movies = Pipeline::movie_minimal()
            .with_fields(include.iter().map(String::as_str))
            .apply_all(matching, self.api.origin())?;
        Ok(ToolResult::json(true, Value::Array(movies)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ScriptedRadarr, inception, matrix};

    fn library() -> Arc<ScriptedRadarr> {
        let mut reloaded = matrix(2, "The Matrix Reloaded", 2003);
        reloaded["monitored"] = json!(false);
        Arc::new(ScriptedRadarr::new().get(
            "movie",
            json!([matrix(1, "The Matrix", 1999), reloaded, inception()]),
        ))
    }

    async fn search(args: Value) -> Result<ToolResult, ToolError> {
        SearchMoviesTool::new(library()).execute(args).await
    }

    #[tokio::test]
    async fn name_and_year_range() {
        let result = search(json!({"criteria": {"name": "matrix", "year": {"gt": 1990, "lt": 2000}}}))
            .await
            .unwrap();
        assert_eq!(
            result.data.unwrap(),
            json!([{"id": 1, "title": "The Matrix", "year": 1999, "tmdbId": 601}])
        );
    }

    #[tokio::test]
    async fn criteria_are_conjunctive() {
        let result = search(json!({"criteria": {"genres": ["science fiction"], "monitored": true}}))
            .await
            .unwrap();
        let titles: Vec<_> = result
            .data
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, ["The Matrix", "Inception"]);
    }

    #[tokio::test]
    async fn include_fields_extend_the_projection() {
        let result = search(json!({
            "criteria": {"movieFile.size": {"gt": 1000000000}},
            "includeFields": ["movieFile.size", "certification"]
        }))
        .await
        .unwrap();
        assert_eq!(
            result.data.unwrap(),
            json!([{
                "id": 12,
                "title": "Inception",
                "year": 2010,
                "tmdbId": 27205,
                "movieFile": {"size": 12884901888i64},
                "certification": "PG-13"
            }])
        );
    }

    #[tokio::test]
    async fn empty_criteria_returns_whole_library() {
        let result = search(json!({"criteria": {}})).await.unwrap();
        assert_eq!(result.data.unwrap().as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn unknown_criterion_fails_before_fetching() {
        let api = library();
        let err = SearchMoviesTool::new(api.clone())
            .execute(json!({"criteria": {"director": "Nolan"}}))
            .await
            .unwrap_err();
        match err {
            ToolError::Validation(msg) => assert!(msg.contains("director")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(api.requests().is_empty());
    }

    #[tokio::test]
    async fn malformed_range_is_rejected() {
        let err = search(json!({"criteria": {"year": {"between": [1990, 2000]}}}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
    }

    #[tokio::test]
    async fn criteria_is_required() {
        let err = search(json!({"includeFields": ["title"]})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
