//! Error constructors for MCP servers
//!
//! Tool-level failures are usually encoded in the tool result itself; these
//! helpers cover the cases that must surface as protocol errors.

use rmcp::ErrorData as McpError;

/// Type alias for MCP handler results
pub type McpResult<T> = Result<T, McpError>;

/// Create an internal error with a message
///
/// # Example
///
/// ```rust,ignore
/// use mcp_common::internal_error;
///
/// let json = serde_json::to_string(&data).map_err(|e| internal_error(e.to_string()))?;
/// ```
pub fn internal_error(message: impl Into<String>) -> McpError {
    McpError::internal_error(message.into(), None)
}

/// Create a "resource not found" error carrying the requested URI
pub fn resource_not_found(uri: &str) -> McpError {
    McpError::resource_not_found(
        format!("Unknown resource: {}", uri),
        Some(serde_json::json!({ "uri": uri })),
    )
}
