//! radarr-mcp CLI, the main entry point.
//!
//! Commands:
//! - `serve`   Run the MCP server (stdio or HTTP)
//! - `tools`   Print the tool definitions
//! - `call`    Execute one tool against Radarr
//! - `status`  Show the effective configuration
//! - `doctor`  Diagnose configuration and connectivity

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use radarr_mcp_config::ServerMode;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "radarr-mcp",
    about = "MCP server for Radarr movie management",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file layered over the default one
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server
    Serve {
        /// Transport to serve on
        #[arg(long)]
        mode: Option<ServerMode>,

        /// Host to bind in http mode
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind in http mode
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the tool definitions as JSON
    Tools,

    /// Execute a single tool and print its output
    Call {
        /// Tool name, e.g. lookup_movie
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Show the effective configuration
    Status,

    /// Diagnose configuration and Radarr connectivity
    Doctor,
}

/// Logs always go to stderr; stdout carries protocol frames and command output.
fn init_tracing(verbose: bool, format: LogFormat) {
    let filter = if verbose { "debug" } else { "info" };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Serve { mode, host, port } => commands::serve::run(config, mode, host, port).await?,
        Commands::Tools => commands::tools::run()?,
        Commands::Call { tool, args } => commands::call::run(config, &tool, &args).await?,
        Commands::Status => commands::status::run(config)?,
        Commands::Doctor => commands::doctor::run(config).await?,
    }

    Ok(())
}
