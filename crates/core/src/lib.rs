//! # radarr-mcp core
//!
//! Domain traits and error definitions for the Radarr MCP tool server.
//! This crate has **no framework dependencies**: it defines the seams
//! that the other crates implement against.
//!
//! ## Design Philosophy
//!
//! The remote Radarr API is a capability ([`RadarrApi`]) and every
//! caller-facing operation is a [`Tool`]. Implementations live in their
//! respective crates. This enables:
//! - Swapping the HTTP client for a scripted one in tests
//! - Serving the same registry over any transport
//! - Clean dependency graph (all crates depend inward on core)

pub mod api;
pub mod error;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use api::{Method, Query, RadarrApi};
pub use error::{RemoteError, ToolError};
pub use tool::{Tool, ToolCall, ToolDefinition, ToolRegistry, ToolResult};
