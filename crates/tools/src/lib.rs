//! Radarr movie-management tools.
//!
//! Every tool wraps one Radarr workflow and returns filtered, validated
//! records: lookups and library reads go through a [`Pipeline`], while
//! the two mutating tools (`add_movie`, `edit_movie`) report Radarr's own
//! failures as error results instead of tool errors.

#![recursion_limit = "256"]
pub mod add_movie;
mod args;
pub mod edit_movies;
pub mod lookup_movie;
pub mod movie_info;
pub mod movie_info_by_tmdb_id;
pub mod movie_list;
pub mod pipeline;
pub mod quality_profiles;
pub mod search_movies;

#[cfg(test)]
pub(crate) mod test_helpers;

use std::sync::Arc;

use radarr_mcp_core::api::RadarrApi;
use radarr_mcp_core::tool::ToolRegistry;

pub use pipeline::{Pipeline, STATUS_KEY};

/// Create a registry holding every Radarr tool, all sharing `api`.
pub fn default_registry(api: Arc<dyn RadarrApi>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(lookup_movie::LookupMovieTool::new(api.clone())));
    registry.register(Box::new(movie_list::MovieListTool::new(api.clone())));
    registry.register(Box::new(movie_info::MovieInfoTool::new(api.clone())));
    registry.register(Box::new(movie_info_by_tmdb_id::MovieInfoByTmdbIdTool::new(api.clone())));
    registry.register(Box::new(quality_profiles::QualityProfilesTool::new(api.clone())));
    registry.register(Box::new(add_movie::AddMovieTool::new(api.clone())));
    registry.register(Box::new(edit_movies::EditMoviesTool::new(api.clone())));
    registry.register(Box::new(search_movies::SearchMoviesTool::new(api)));
    registry
}
