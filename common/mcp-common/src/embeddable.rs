//! Embeddable MCP trait for in-process execution
//!
//! [`EmbeddableMcp`] lets a host call a server's tools and read its resources
//! directly, without spawning the server binary or speaking JSON-RPC over
//! stdio.
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//! use setup_mcp::{Config, SetupMcpServer};
//!
//! let server = SetupMcpServer::with_config(Config::default())?;
//!
//! let result = server
//!     .call_tool("terminal_tool", serde_json::json!({ "command": "uname -a" }))
//!     .await?;
//! let doc = server.read_resource("setup://instructions").await?;
//! ```

use async_trait::async_trait;
use rmcp::model::{CallToolResult, ReadResourceResult, Resource, Tool};
use serde_json::Value;

/// Error type for embeddable MCP operations
#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    /// Tool was not found in the server
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Resource URI is not served by this server
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// MCP protocol error
    #[error("mcp error: {0}")]
    McpError(String),
}

impl From<rmcp::ErrorData> for EmbeddableError {
    fn from(err: rmcp::ErrorData) -> Self {
        EmbeddableError::McpError(err.message.to_string())
    }
}

/// Result type for embeddable MCP operations
pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// Trait for MCP servers that can be executed in-process
///
/// Implementations must be `Send + Sync` so a host can issue concurrent
/// calls from multiple tasks.
///
/// Servers built with `#[tool_router]` implement `list_tools` by delegating to
/// `self.tool_router.list_all()` and dispatch `call_tool` by name. Servers with
/// no resources can rely on the default resource methods.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Returns the server name for identification
    fn server_name(&self) -> &str;

    /// Returns a list of all available tools
    fn list_tools(&self) -> Vec<Tool>;

    /// Executes a tool by name with the given JSON parameters
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    /// Returns the resources this server exposes
    fn list_resources(&self) -> Vec<Resource> {
        Vec::new()
    }

    /// Reads a resource by URI
    async fn read_resource(&self, uri: &str) -> EmbeddableResult<ReadResourceResult> {
        Err(EmbeddableError::ResourceNotFound(uri.to_string()))
    }

    /// Returns an optional description of the server
    fn server_description(&self) -> Option<&str> {
        None
    }
}
