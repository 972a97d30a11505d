//! Server initialization utilities
//!
//! Provides standardized tracing setup and the `serve_stdio!` macro used by
//! every server binary in the workspace.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging for an MCP server
///
/// Logs go to stderr because stdout carries the MCP protocol. Filtering comes
/// from `RUST_LOG`, with `info` as the default level for `crate_name`.
///
/// Set `LOG_FORMAT=json` for structured JSON output; the default is
/// human-readable text without ANSI colors.
///
/// # Example
///
/// ```rust,ignore
/// mcp_common::init_tracing("setup_mcp")?;
/// ```
pub fn init_tracing(crate_name: &str) -> anyhow::Result<()> {
    let directive = format!("{}=info", crate_name);
    let filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}

/// Generate `main` for a stdio MCP server
///
/// The server type must provide `fn load() -> Result<Self, E>` where `E` can
/// be converted into `anyhow::Error`. `load` is the composition root: it reads
/// configuration and wires the server exactly once per process.
///
/// # Example
///
/// ```rust,ignore
/// mod server;
/// use server::SetupMcpServer;
///
/// mcp_common::serve_stdio!(SetupMcpServer, "setup_mcp");
/// ```
///
/// Expands to a `#[tokio::main] async fn main()` that:
/// 1. Initializes tracing to stderr
/// 2. Builds the server with `::load()`
/// 3. Serves over the stdio transport
/// 4. Waits for the client to disconnect
#[macro_export]
macro_rules! serve_stdio {
    ($server_type:ty, $crate_name:expr) => {
        #[tokio::main]
        async fn main() -> anyhow::Result<()> {
            use rmcp::ServiceExt;

            $crate::init_tracing($crate_name)?;

            tracing::info!(concat!("Starting ", $crate_name, " MCP Server"));

            let server = <$server_type>::load()?;
            let service = server.serve(rmcp::transport::stdio()).await?;

            tracing::info!("Server running, waiting for requests...");

            service.waiting().await?;

            tracing::info!("Server shutting down");
            Ok(())
        }
    };
}
