//! MCP Server implementation for setup instructions and command execution
//!
//! `SetupMcpServer` is the composition root: it is built once from a
//! [`Config`] and wires the command executor and the instructions provider
//! into the MCP tool and resource surfaces.

use std::path::{Path, PathBuf};

use mcp_common::{
    async_trait, resource_not_found, text_contents, text_resource, CallToolResult,
    EmbeddableError, EmbeddableMcp, EmbeddableResult, McpError,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        ListResourcesResult, PaginatedRequestParam, ReadResourceRequestParam, ReadResourceResult,
        Resource, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, RoleServer,
};
use serde_json::Value;

use crate::guard::CommandGuard;
use crate::handlers;
use crate::instructions::InstructionsProvider;
use crate::params::*;
use crate::types::{Config, ExecError};

/// URI of the setup instructions resource
pub const INSTRUCTIONS_URI: &str = "setup://instructions";

const SERVER_DESCRIPTION: &str = "Setup MCP server. Read setup://instructions for the \
     host's setup guide and run shell commands with terminal_tool. Commands run with the \
     server's own permissions; a small denylist rejects obviously destructive commands.";

/// The Setup MCP Server
#[derive(Clone)]
pub struct SetupMcpServer {
    guard: CommandGuard,
    config: Config,
    instructions: InstructionsProvider,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl SetupMcpServer {
    /// Build the server from configuration found in the standard locations
    ///
    /// Config is searched in order:
    /// 1. `SETUP_MCP_CONFIG_PATH` env var
    /// 2. `./setup-mcp.toml`
    /// 3. `$XDG_CONFIG_HOME/setup-mcp/config.toml`
    /// 4. `~/.setup-mcp.toml`
    /// 5. Default config if none found
    pub fn load() -> Result<Self, ExecError> {
        Self::with_config(Self::load_config())
    }

    /// Create a new server with explicit config
    pub fn with_config(config: Config) -> Result<Self, ExecError> {
        let guard = CommandGuard::new(&config)?;
        let instructions = InstructionsProvider::from_config(&config);

        tracing::info!(
            "Serving instructions from {}",
            instructions.path().display()
        );

        Ok(Self {
            guard,
            config,
            instructions,
            tool_router: Self::tool_router(),
        })
    }

    fn load_config() -> Config {
        if let Ok(env_path) = std::env::var("SETUP_MCP_CONFIG_PATH") {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                if let Some(config) = read_config(&path) {
                    return config;
                }
            } else {
                tracing::warn!("SETUP_MCP_CONFIG_PATH={} does not exist", env_path);
            }
        }

        let mut config_paths = vec![PathBuf::from("setup-mcp.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("setup-mcp").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            config_paths.push(home.join(".setup-mcp.toml"));
        }

        for path in config_paths {
            if path.exists() {
                if let Some(config) = read_config(&path) {
                    return config;
                }
            }
        }

        tracing::info!("Using default configuration");
        Config::default()
    }

    /// The resources this server exposes
    fn resources(&self) -> Vec<Resource> {
        vec![text_resource(
            INSTRUCTIONS_URI,
            "instructions",
            "Setup instructions for this host (contents of SETUP.md)",
            "text/markdown",
        )]
    }

    #[tool(
        description = "Execute a shell command on the server and return its output as \
                       {stdout, stderr, exit_code}. Timeout is in seconds (1-300, default 30); \
                       exit_code 124 means the command timed out."
    )]
    async fn terminal_tool(
        &self,
        Parameters(params): Parameters<TerminalToolParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::terminal_tool(&self.guard, &self.config, params).await
    }
}

fn read_config(path: &Path) -> Option<Config> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to read config {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str::<Config>(&content) {
        Ok(config) => {
            tracing::info!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(e) => {
            tracing::warn!("Failed to parse config {}: {}", path.display(), e);
            None
        }
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for SetupMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_DESCRIPTION.into()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(self.resources()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        if request.uri == INSTRUCTIONS_URI {
            Ok(text_contents(
                INSTRUCTIONS_URI,
                self.instructions.get_instructions(),
            ))
        } else {
            Err(resource_not_found(&request.uri))
        }
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for SetupMcpServer {
    fn server_name(&self) -> &str {
        "setup"
    }

    fn server_description(&self) -> Option<&str> {
        Some(SERVER_DESCRIPTION)
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            "terminal_tool" => {
                let params: TerminalToolParams = serde_json::from_value(params)?;
                self.terminal_tool(Parameters(params)).await.map_err(Into::into)
            }

            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }

    fn list_resources(&self) -> Vec<Resource> {
        self.resources()
    }

    async fn read_resource(&self, uri: &str) -> EmbeddableResult<ReadResourceResult> {
        if uri == INSTRUCTIONS_URI {
            Ok(text_contents(uri, self.instructions.get_instructions()))
        } else {
            Err(EmbeddableError::ResourceNotFound(uri.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::SETUP_FILE_NAME;
    use crate::types::CommandResult;
    use rmcp::model::ResourceContents;
    use tempfile::TempDir;

    fn server_with_setup(contents: Option<&str>) -> (TempDir, SetupMcpServer) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETUP_FILE_NAME);
        if let Some(contents) = contents {
            std::fs::write(&path, contents).unwrap();
        }

        let mut config = Config::default();
        config.instructions.path = Some(path);
        let server = SetupMcpServer::with_config(config).unwrap();
        (dir, server)
    }

    fn resource_text(result: &ReadResourceResult) -> &str {
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => text.as_str(),
            other => panic!("expected text contents, got {:?}", other),
        }
    }

    fn command_result(result: &CallToolResult) -> CommandResult {
        let text = result.content[0].as_text().unwrap();
        serde_json::from_str(&text.text).unwrap()
    }

    #[test]
    fn test_embeddable_server_name() {
        let (_dir, server) = server_with_setup(None);
        assert_eq!(server.server_name(), "setup");
        assert!(server.server_description().is_some());
    }

    #[test]
    fn test_embeddable_list_tools() {
        let (_dir, server) = server_with_setup(None);
        let tools = server.list_tools();

        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name.as_ref(), "terminal_tool");

        let properties = tools[0].input_schema.get("properties").unwrap();
        assert!(properties.get("command").is_some());
        assert!(properties.get("timeout").is_some());
    }

    #[test]
    fn test_embeddable_list_resources() {
        let (_dir, server) = server_with_setup(None);
        let resources = server.list_resources();

        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].uri, INSTRUCTIONS_URI);
        assert_eq!(resources[0].mime_type.as_deref(), Some("text/markdown"));
    }

    #[tokio::test]
    async fn test_embeddable_call_terminal_tool() {
        let (_dir, server) = server_with_setup(None);
        let result = server
            .call_tool("terminal_tool", serde_json::json!({ "command": "echo hello" }))
            .await
            .unwrap();

        assert!(!result.is_error.unwrap_or(false));
        let output = command_result(&result);
        assert_eq!(output.stdout, "hello\n");
        assert_eq!(output.stderr, "");
        assert_eq!(output.exit_code, 0);
    }

    #[tokio::test]
    async fn test_embeddable_blocked_command_is_result_not_error() {
        let (_dir, server) = server_with_setup(None);
        let result = server
            .call_tool(
                "terminal_tool",
                serde_json::json!({ "command": "dd if=/dev/zero of=/dev/sda", "timeout": 5 }),
            )
            .await
            .unwrap();

        let output = command_result(&result);
        assert_eq!(output.exit_code, 1);
        assert_eq!(output.stderr, "Command blocked for security reasons.");
    }

    #[tokio::test]
    async fn test_embeddable_missing_command_param() {
        let (_dir, server) = server_with_setup(None);
        let result = server
            .call_tool("terminal_tool", serde_json::json!({ "timeout": 5 }))
            .await;

        assert!(matches!(result, Err(EmbeddableError::SerdeError(_))));
    }

    #[tokio::test]
    async fn test_embeddable_unknown_tool() {
        let (_dir, server) = server_with_setup(None);
        let result = server
            .call_tool("nonexistent_tool", serde_json::json!({}))
            .await;

        assert!(matches!(result, Err(EmbeddableError::ToolNotFound(_))));
    }

    #[tokio::test]
    async fn test_embeddable_read_instructions() {
        let (_dir, server) = server_with_setup(Some("# Setup\nRun make.\n"));
        let result = server.read_resource(INSTRUCTIONS_URI).await.unwrap();
        assert_eq!(resource_text(&result), "# Setup\nRun make.\n");
    }

    #[tokio::test]
    async fn test_embeddable_read_missing_instructions() {
        let (_dir, server) = server_with_setup(None);
        let result = server.read_resource(INSTRUCTIONS_URI).await.unwrap();
        assert_eq!(resource_text(&result), "SETUP.md file not found.");
    }

    #[tokio::test]
    async fn test_embeddable_unknown_resource() {
        let (_dir, server) = server_with_setup(Some("X"));
        let result = server.read_resource("setup://other").await;
        assert!(matches!(result, Err(EmbeddableError::ResourceNotFound(_))));
    }

    #[test]
    fn test_rejects_zero_default_timeout() {
        let mut config = Config::default();
        config.timeouts.default_secs = 0;
        assert!(matches!(
            SetupMcpServer::with_config(config),
            Err(ExecError::ConfigError(_))
        ));
    }

    #[test]
    fn test_server_info_capabilities() {
        use rmcp::ServerHandler;

        let (_dir, server) = server_with_setup(None);
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
    }
}
