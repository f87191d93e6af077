//! MCP transports for the Radarr tool registry.
//!
//! [`rpc`] holds the transport-independent JSON-RPC handling. [`stdio`]
//! and [`http`] move frames in and out of it.

pub mod http;
pub mod rpc;
pub mod stdio;

pub use http::{router, serve_http};
pub use rpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpServer};
pub use stdio::serve_stdio;
