//! `radarr-mcp tools`: print the tool definitions.

use std::sync::Arc;

use async_trait::async_trait;
use radarr_mcp_core::api::{Method, Query, RadarrApi};
use radarr_mcp_core::error::RemoteError;
use serde_json::{Value, json};

/// Stands in for Radarr when only the definitions are needed.
struct Offline;

#[async_trait]
impl RadarrApi for Offline {
    fn origin(&self) -> &str {
        ""
    }

    async fn request(&self, _: &str, _: Method, _: Query, _: Option<Value>) -> Result<Value, RemoteError> {
        Err(RemoteError::Network("Radarr is not configured".into()))
    }
}

/// Definitions do not depend on the Radarr instance, so no config is read.
pub fn run() -> anyhow::Result<()> {
    let tools: Vec<Value> = radarr_mcp_tools::default_registry(Arc::new(Offline))
        .definitions()
        .into_iter()
        .map(|def| {
            json!({
                "name": def.name,
                "description": def.description,
                "inputSchema": def.parameters,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&tools)?);
    Ok(())
}
