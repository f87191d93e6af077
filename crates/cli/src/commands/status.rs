//! `radarr-mcp status`: show the effective configuration.

use std::path::Path;

use radarr_mcp_config::AppConfig;

pub fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    println!("radarr-mcp status");
    println!("=================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    if let Some(path) = config_path {
        println!("  Config file:  {}", path.display());
    }
    println!("  Radarr:       {}", config.radarr.url.as_deref().unwrap_or("(not set)"));
    println!("  API key:      {}", if config.has_api_key() { "configured" } else { "missing" });
    println!("  Transport:    {}", config.server.mode);
    println!();
    print!("{}", config.redacted_toml());

    Ok(())
}
