//! `radarr-mcp doctor`: diagnose configuration and connectivity.

use std::path::Path;

use radarr_mcp_config::AppConfig;
use serde_json::Value;

pub async fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    println!("radarr-mcp doctor");
    println!("=================\n");

    let mut issues = 0;

    let config = match super::load_config(config_path) {
        Ok(config) => {
            println!("  ok    Config loaded");
            config
        }
        Err(e) => {
            println!("  FAIL  {e:#}");
            println!("\n  1 issue found.");
            return Ok(());
        }
    };

    if let Err(e) = config.validate() {
        println!("  FAIL  {e}");
        println!("\n  Example configuration ({}):\n", AppConfig::config_dir().join("config.toml").display());
        for line in AppConfig::default_toml().lines() {
            println!("    {line}");
        }
        println!("\n  1 issue found.");
        return Ok(());
    }
    println!("  ok    Configuration valid");

    let api = super::connect(&config)?;
    match api.get("system/status", Vec::new()).await {
        Ok(status) => {
            let version = status.get("version").and_then(Value::as_str).unwrap_or("unknown");
            println!("  ok    Radarr reachable at {} (version {version})", api.origin());
        }
        Err(e) if e.status() == Some(401) => {
            println!("  FAIL  Radarr rejected the API key");
            issues += 1;
        }
        Err(e) => {
            println!("  FAIL  Radarr unreachable: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
