//! Session lifecycle recorded during initialization.

use crate::types::{ClientInfo, InitializeParams, InitializeResult, ServerInfo, MCP_VERSION};

/// Client identity and the initialized flag.
///
/// The flag is informational: other methods are served whether or not
/// `initialize` has been called.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub client: Option<ClientInfo>,
    pub initialized: bool,
}

impl SessionState {
    pub fn negotiate(&mut self, params: InitializeParams, server: &ServerInfo) -> InitializeResult {
        if !params.protocol_version.is_empty() && params.protocol_version != MCP_VERSION {
            tracing::warn!(
                "Client requested protocol version {}, server supports {}. Proceeding with server version.",
                params.protocol_version,
                MCP_VERSION
            );
        }

        if let Some(client) = &params.client_info {
            tracing::info!("Client connected: {} {}", client.name, client.version);
        }

        self.client = params.client_info;
        self.initialized = true;

        InitializeResult::for_server(server)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiate_marks_initialized() {
        let mut state = SessionState::default();
        let params = InitializeParams {
            protocol_version: "2025-01-01".into(),
            client_info: Some(ClientInfo {
                name: "inspector".into(),
                version: "1.0".into(),
            }),
            ..Default::default()
        };
        let result = state.negotiate(params, &ServerInfo::default());
        assert!(state.initialized);
        assert_eq!(state.client.unwrap().name, "inspector");
        assert_eq!(result.protocol_version, MCP_VERSION);
    }
}
