//! Stdio transport: reads JSON-RPC from stdin, writes to stdout.

use crate::cancel::CancelToken;
use crate::protocol::McpServer;
use crate::types::McpResult;

/// Stdio transport for desktop MCP clients.
pub struct StdioTransport {
    server: McpServer,
}

impl StdioTransport {
    pub fn new(server: McpServer) -> Self {
        Self { server }
    }

    /// Serve stdin/stdout until end of input, a transport failure, or cancellation.
    pub async fn run(&self, cancel: &CancelToken) -> McpResult<()> {
        tracing::info!("Stdio transport started");
        self.server
            .serve(tokio::io::stdin(), tokio::io::stdout(), cancel)
            .await
    }
}
