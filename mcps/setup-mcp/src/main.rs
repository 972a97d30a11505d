//! Setup MCP - setup instructions and shell command execution over stdio

use setup_mcp::SetupMcpServer;

mcp_common::serve_stdio!(SetupMcpServer, "setup_mcp");
