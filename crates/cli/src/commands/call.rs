//! `radarr-mcp call`: execute one tool from the command line.

use std::path::Path;

use anyhow::{Context, bail};
use radarr_mcp_core::tool::ToolCall;
use serde_json::Value;

pub async fn run(config_path: Option<&Path>, tool: &str, args: &str) -> anyhow::Result<()> {
    let arguments: Value = serde_json::from_str(args).context("--args must be valid JSON")?;
    if !arguments.is_object() {
        bail!("--args must be a JSON object");
    }

    let config = super::load_config(config_path)?;
    let registry = radarr_mcp_tools::default_registry(super::connect(&config)?);
    let call = ToolCall {
        id: "cli".into(),
        name: tool.to_string(),
        arguments,
    };

    let result = registry.execute(&call).await?;
    println!("{}", result.output);
    if !result.success {
        bail!("{tool} reported an error");
    }
    Ok(())
}
