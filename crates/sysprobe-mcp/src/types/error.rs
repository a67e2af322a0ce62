//! Error types and JSON-RPC error codes for the MCP server.

use super::message::{JsonRpcError, JsonRpcErrorObject, RequestId, JSONRPC_VERSION};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Server-defined error codes.
pub mod mcp_error_codes {
    /// Application: the requested tool is not registered.
    pub const APPLICATION_ERROR: i32 = -32001;
    /// Tool: the tool handler reported a failure.
    pub const TOOL_ERROR: i32 = -32002;
}

/// All errors that can occur in the MCP server.
///
/// Messages are delivered to clients verbatim, so the per-message variants
/// render without a category prefix.
#[derive(thiserror::Error, Debug)]
pub enum McpError {
    #[error("{0}")]
    ParseError(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("method {0:?} not found")]
    MethodNotFound(String),

    #[error("{0}")]
    InvalidParams(String),

    #[error("{0}")]
    InternalError(String),

    #[error("tool {0:?} not registered")]
    ToolNotRegistered(String),

    /// A tool handler failed; holds the failure's rendered text.
    #[error("{0}")]
    Tool(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        use mcp_error_codes::*;
        match self {
            McpError::ParseError(_) | McpError::Json(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::ToolNotRegistered(_) => APPLICATION_ERROR,
            McpError::Tool(_) => TOOL_ERROR,
            McpError::InternalError(_)
            | McpError::Cancelled
            | McpError::Transport(_)
            | McpError::Io(_) => INTERNAL_ERROR,
        }
    }

    /// True for failures that end the session rather than a single message.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            McpError::Transport(_) | McpError::Io(_) | McpError::Cancelled
        )
    }

    pub fn to_error_object(&self) -> JsonRpcErrorObject {
        JsonRpcErrorObject {
            code: self.code(),
            message: self.to_string(),
            data: None,
        }
    }

    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcError {
        JsonRpcError {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: self.to_error_object(),
        }
    }
}

pub type McpResult<T> = Result<T, McpError>;

/// Errors raised while building the tool registry.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("tool name is required")]
    EmptyName,

    #[error("tool {0} already registered")]
    Duplicate(String),
}
