//! Parameter types for Setup MCP tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TerminalToolParams {
    #[schemars(description = "The shell command to execute")]
    pub command: String,

    #[schemars(
        description = "Maximum time in seconds to allow the command to run (1-300, default: 30)"
    )]
    #[serde(default)]
    pub timeout: Option<i64>,
}
