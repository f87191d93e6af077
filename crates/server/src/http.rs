//! JSON-RPC over HTTP, built on Axum.
//!
//! `POST /mcp` takes one JSON-RPC frame and answers with one response;
//! notifications are acknowledged with `202 Accepted` and no body.

use std::io;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tracing::info;

use crate::rpc::McpServer;

/// Build the router with all transport routes.
pub fn router(server: McpServer) -> Router {
    Router::new()
        .route("/mcp", post(mcp_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(server)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve_http(server: McpServer, addr: &str) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        addr = %listener.local_addr()?,
        tools = server.registry().len(),
        "MCP HTTP transport listening"
    );
    axum::serve(listener, router(server))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}

async fn mcp_handler(State(server): State<McpServer>, body: String) -> Response {
    match server.handle_frame(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    tools: usize,
}

async fn health_handler(State(server): State<McpServer>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        tools: server.registry().len(),
    })
}
