//! sysprobe MCP server: JSON-RPC 2.0 over stdio, serving host metrics as tools.

pub mod cancel;
pub mod config;
pub mod protocol;
pub mod repl;
pub mod tools;
pub mod transport;
pub mod types;

pub use cancel::CancelToken;
pub use config::ServerConfig;
pub use protocol::{McpServer, McpServerBuilder, ProtocolHandler};
pub use transport::StdioTransport;
