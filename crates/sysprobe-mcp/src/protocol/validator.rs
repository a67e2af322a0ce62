//! JSON-RPC envelope validation.

use crate::types::{Envelope, McpError, McpResult, JSONRPC_VERSION};

/// Reject envelopes that declare a protocol tag other than "2.0".
///
/// An absent tag is tolerated.
pub fn validate_envelope(envelope: &Envelope) -> McpResult<()> {
    if !envelope.jsonrpc.is_empty() && envelope.jsonrpc != JSONRPC_VERSION {
        return Err(McpError::InvalidRequest(format!(
            "expected jsonrpc version {JSONRPC_VERSION}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(jsonrpc: &str) -> Envelope {
        serde_json::from_str(&format!(r#"{{"jsonrpc":"{jsonrpc}","id":1,"method":"ping"}}"#))
            .unwrap()
    }

    #[test]
    fn test_versions() {
        assert!(validate_envelope(&envelope("2.0")).is_ok());
        assert!(validate_envelope(&envelope("")).is_ok());
        let err = validate_envelope(&envelope("1.0")).unwrap_err();
        assert_eq!(err.code(), -32600);
        assert_eq!(err.to_string(), "expected jsonrpc version 2.0");
    }
}
