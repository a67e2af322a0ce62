//! Transport layer for MCP communication.

pub mod framing;
pub mod stdio;
pub mod writer;

pub use framing::EnvelopeDecoder;
pub use stdio::StdioTransport;
pub use writer::ResponseWriter;
