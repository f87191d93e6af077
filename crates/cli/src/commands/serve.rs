//! `radarr-mcp serve`: run the MCP server.

use std::path::Path;
use std::sync::Arc;

use radarr_mcp_config::ServerMode;
use radarr_mcp_server::{McpServer, serve_http, serve_stdio};
use tracing::info;

pub async fn run(
    config_path: Option<&Path>,
    mode: Option<ServerMode>,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;
    if let Some(mode) = mode {
        config.server.mode = mode;
    }
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let api = super::connect(&config)?;
    let server = McpServer::new(Arc::new(radarr_mcp_tools::default_registry(api)));
    info!(
        mode = %config.server.mode,
        radarr = config.radarr_url()?,
        "Starting MCP server"
    );

    match config.server.mode {
        ServerMode::Stdio => serve_stdio(server).await?,
        ServerMode::Http => serve_http(server, &config.server.bind_addr()).await?,
    }
    Ok(())
}
