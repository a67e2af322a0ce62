//! Builtin method handlers and the method table.

use std::collections::HashMap;

use serde_json::value::RawValue;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::cancel::CancelToken;
use crate::tools::ToolRegistry;
use crate::types::*;

use super::negotiation::SessionState;
use super::validator::validate_envelope;

/// Methods served by [`ProtocolHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinMethod {
    Initialize,
    Ping,
    ToolsList,
    ToolsCall,
}

impl BuiltinMethod {
    pub const ALL: [BuiltinMethod; 4] = [
        BuiltinMethod::Initialize,
        BuiltinMethod::Ping,
        BuiltinMethod::ToolsList,
        BuiltinMethod::ToolsCall,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinMethod::Initialize => "initialize",
            BuiltinMethod::Ping => "ping",
            BuiltinMethod::ToolsList => "tools/list",
            BuiltinMethod::ToolsCall => "tools/call",
        }
    }
}

/// Routes envelopes to builtin handlers and shapes the reply.
pub struct ProtocolHandler {
    registry: ToolRegistry,
    server_info: ServerInfo,
    methods: HashMap<&'static str, BuiltinMethod>,
    state: Mutex<SessionState>,
}

impl ProtocolHandler {
    pub fn new(registry: ToolRegistry, server_info: ServerInfo) -> Self {
        let methods = BuiltinMethod::ALL
            .into_iter()
            .map(|method| (method.name(), method))
            .collect();
        Self {
            registry,
            server_info,
            methods,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    pub async fn is_initialized(&self) -> bool {
        self.state.lock().await.initialized
    }

    /// Handle one envelope. Returns the reply to send, or `None` for
    /// notifications, which are never answered.
    pub async fn handle_envelope(
        &self,
        envelope: Envelope,
        cancel: &CancelToken,
    ) -> Option<JsonRpcReply> {
        if let Err(e) = validate_envelope(&envelope) {
            return self.respond_with_error(&envelope, e);
        }

        let Some(method) = self.methods.get(envelope.method.as_str()).copied() else {
            tracing::debug!("Unknown method: {}", envelope.method);
            let error = McpError::MethodNotFound(envelope.method.clone());
            return self.respond_with_error(&envelope, error);
        };

        let outcome = self.dispatch(method, &envelope, cancel).await;

        let Some(id) = &envelope.id else {
            if let Err(e) = &outcome {
                tracing::debug!("Dropping error for notification {}: {e}", envelope.method);
            }
            return None;
        };

        Some(JsonRpcReply::from_outcome(id.clone(), outcome))
    }

    fn respond_with_error(&self, envelope: &Envelope, error: McpError) -> Option<JsonRpcReply> {
        match &envelope.id {
            Some(id) => Some(JsonRpcReply::Failure(error.to_json_rpc_error(id.clone()))),
            None => {
                tracing::debug!("Dropping error for notification {}: {error}", envelope.method);
                None
            }
        }
    }

    async fn dispatch(
        &self,
        method: BuiltinMethod,
        envelope: &Envelope,
        cancel: &CancelToken,
    ) -> McpResult<Value> {
        match method {
            BuiltinMethod::Initialize => self.handle_initialize(envelope.params()).await,
            BuiltinMethod::Ping => self.handle_ping(envelope.params()),
            BuiltinMethod::ToolsList => self.handle_tools_list(),
            BuiltinMethod::ToolsCall => self.handle_tools_call(envelope.params(), cancel).await,
        }
    }

    async fn handle_initialize(&self, params: Option<&RawValue>) -> McpResult<Value> {
        let params: InitializeParams = decode_params(params)?.unwrap_or_default();

        let result = self.state.lock().await.negotiate(params, &self.server_info);

        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    fn handle_ping(&self, params: Option<&RawValue>) -> McpResult<Value> {
        let params: PingParams = decode_params(params)?.unwrap_or_default();
        let result = PingResult::ok(params.message.unwrap_or_default());
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    fn handle_tools_list(&self) -> McpResult<Value> {
        let result = ToolListResult {
            tools: self.registry.definitions(),
        };
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    async fn handle_tools_call(
        &self,
        params: Option<&RawValue>,
        cancel: &CancelToken,
    ) -> McpResult<Value> {
        let call: ToolCallParams = decode_params(params)?
            .ok_or_else(|| McpError::InvalidParams("missing params".to_string()))?;

        if call.name.is_empty() {
            return Err(McpError::InvalidParams("missing tool name".to_string()));
        }

        let registration = self
            .registry
            .get(&call.name)
            .ok_or_else(|| McpError::ToolNotRegistered(call.name.clone()))?;

        let result = registration
            .call(call.arguments, cancel.clone())
            .await
            .map_err(|e| {
                tracing::warn!("Tool {} failed: {e}", call.name);
                McpError::Tool(e.to_string())
            })?
            .unwrap_or_else(ToolCallResult::empty);

        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }
}
