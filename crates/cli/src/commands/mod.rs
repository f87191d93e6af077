//! Subcommand implementations.

pub mod call;
pub mod doctor;
pub mod serve;
pub mod status;
pub mod tools;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use radarr_mcp_client::HttpRadarrClient;
use radarr_mcp_config::AppConfig;
use radarr_mcp_core::api::RadarrApi;

/// Load the layered configuration.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    AppConfig::load(explicit).context("Failed to load config")
}

/// Validate `config` and build the Radarr client it describes.
pub fn connect(config: &AppConfig) -> anyhow::Result<Arc<dyn RadarrApi>> {
    config.validate().context("Invalid configuration")?;
    let client = HttpRadarrClient::new(
        config.radarr_url()?,
        config.radarr_api_key()?,
        Duration::from_secs(config.radarr.timeout_secs),
    )?;
    Ok(Arc::new(client))
}
