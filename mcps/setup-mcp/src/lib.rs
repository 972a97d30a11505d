//! Setup MCP Library
//!
//! Serves a host's `SETUP.md` as the `setup://instructions` resource and
//! runs shell commands through `terminal_tool`, with a bounded timeout and a
//! small denylist of destructive command patterns.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//! use setup_mcp::{Config, SetupMcpServer};
//!
//! let server = SetupMcpServer::with_config(Config::default())?;
//! let result = server
//!     .call_tool("terminal_tool", serde_json::json!({ "command": "echo hi" }))
//!     .await?;
//! ```

pub mod guard;
pub mod handlers;
pub mod instructions;
pub mod params;
pub mod server;
pub mod types;

pub use server::{SetupMcpServer, INSTRUCTIONS_URI};
pub use types::{CommandResult, Config, ExecError, InstructionsError};

pub use params::*;
