//! MCP protocol handling: JSON-RPC dispatch over builtin methods.

pub mod handler;
pub mod negotiation;
pub mod server;
pub mod validator;

pub use handler::{BuiltinMethod, ProtocolHandler};
pub use server::{McpServer, McpServerBuilder};
