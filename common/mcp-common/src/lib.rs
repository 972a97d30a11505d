//! MCP Common - Shared plumbing for MCP servers
//!
//! - **Initialization**: `serve_stdio!` macro for standardized server startup
//! - **Results**: [`json_success`] for structured `CallToolResult` responses
//! - **Resources**: [`text_resource`] / [`text_contents`] for static documents
//! - **Errors**: constructors for protocol-level errors
//! - **Embeddable**: [`EmbeddableMcp`] trait for in-process execution
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{serve_stdio, json_success};
//!
//! // main.rs
//! serve_stdio!(MyServer, "my_mcp");
//!
//! // tool implementation
//! async fn my_tool(&self) -> Result<CallToolResult, McpError> {
//!     json_success(&compute())
//! }
//! ```

pub mod embeddable;
pub mod error;
pub mod init;
pub mod resource;
pub mod result;

pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use error::{internal_error, resource_not_found, McpResult};
pub use init::init_tracing;
pub use resource::{text_contents, text_resource};
pub use result::json_success;

pub use rmcp::{
    model::{CallToolResult, ReadResourceResult, Resource, Tool},
    ErrorData as McpError,
};

// Re-export async_trait for implementing EmbeddableMcp
pub use async_trait::async_trait;
