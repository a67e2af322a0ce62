//! The dispatch loop and server construction.

use tokio::io::{AsyncRead, AsyncWrite};

use crate::cancel::CancelToken;
use crate::config::ServerConfig;
use crate::tools::{ToolHandler, ToolRegistry};
use crate::transport::{EnvelopeDecoder, ResponseWriter};
use crate::types::{McpError, McpResult, RegistrationError, ToolDefinition};

use super::handler::ProtocolHandler;

/// Collects configuration and tools, validating all of them in [`build`](Self::build).
#[derive(Default)]
pub struct McpServerBuilder {
    config: ServerConfig,
    tools: Vec<(ToolDefinition, ToolHandler)>,
}

impl McpServerBuilder {
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn server_info(mut self, name: &str, version: &str) -> Self {
        self.config = self.config.with_server_info(Some(name), Some(version));
        self
    }

    pub fn strict_writes(mut self, strict: bool) -> Self {
        self.config.strict_writes = strict;
        self
    }

    pub fn tool(mut self, definition: ToolDefinition, handler: ToolHandler) -> Self {
        self.tools.push((definition, handler));
        self
    }

    pub fn tools(mut self, tools: impl IntoIterator<Item = (ToolDefinition, ToolHandler)>) -> Self {
        self.tools.extend(tools);
        self
    }

    /// Register every collected tool in order. The first invalid or duplicate
    /// registration aborts construction.
    pub fn build(self) -> Result<McpServer, RegistrationError> {
        let mut registry = ToolRegistry::new();
        for (definition, handler) in self.tools {
            registry.register(definition, handler)?;
        }

        Ok(McpServer {
            handler: ProtocolHandler::new(registry, self.config.server_info),
            strict_writes: self.config.strict_writes,
        })
    }
}

/// A JSON-RPC server bound to one input stream and one output stream per
/// [`serve`](Self::serve) call.
pub struct McpServer {
    handler: ProtocolHandler,
    strict_writes: bool,
}

impl McpServer {
    pub fn builder() -> McpServerBuilder {
        McpServerBuilder::default()
    }

    pub fn handler(&self) -> &ProtocolHandler {
        &self.handler
    }

    /// Read envelopes until the input ends, fails, or `cancel` fires.
    ///
    /// Clean end of input returns `Ok(())`. Cancellation is observed before
    /// and during each read and returns [`McpError::Cancelled`]; a request
    /// already being handled still gets its reply written. A failed
    /// response write is logged and skipped, unless strict writes are enabled.
    pub async fn serve<R, W>(&self, reader: R, writer: W, cancel: &CancelToken) -> McpResult<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut decoder = EnvelopeDecoder::new(reader);
        let writer = ResponseWriter::new(writer);

        tracing::info!(
            "{} {} serving {} tools",
            self.handler.server_info().name,
            self.handler.server_info().version,
            self.handler.registry().len()
        );

        loop {
            if cancel.is_cancelled() {
                tracing::info!("Cancellation requested, stopping");
                return Err(McpError::Cancelled);
            }

            // Only the read is raced: a dispatched request is always answered in full.
            let next = tokio::select! {
                next = decoder.next_envelope() => next,
                _ = cancel.cancelled() => {
                    tracing::info!("Cancellation requested while waiting for input, stopping");
                    return Err(McpError::Cancelled);
                }
            };

            let envelope = match next {
                Ok(Some(envelope)) => envelope,
                Ok(None) => {
                    tracing::info!("EOF on input, shutting down");
                    return Ok(());
                }
                Err(e) => {
                    tracing::error!("Input stream failed: {e}");
                    return Err(e);
                }
            };

            let Some(reply) = self.handler.handle_envelope(envelope, cancel).await else {
                continue;
            };

            if let Err(e) = writer.write(&reply).await {
                if self.strict_writes {
                    tracing::error!("Failed to send response {}: {e}", reply.id());
                    return Err(McpError::Transport(format!("write response: {e}")));
                }
                tracing::error!("Failed to send response {}: {e}", reply.id());
            }
        }
    }
}
