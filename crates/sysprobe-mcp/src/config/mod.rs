//! Server configuration.

use crate::types::ServerInfo;

/// Settings fixed at server construction.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub server_info: ServerInfo,
    /// Treat a failed response write as fatal instead of logging it.
    pub strict_writes: bool,
}

impl ServerConfig {
    /// Override the advertised name and version. Empty or missing values keep
    /// the defaults.
    pub fn with_server_info(mut self, name: Option<&str>, version: Option<&str>) -> Self {
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            self.server_info.name = name.to_string();
        }
        if let Some(version) = version.filter(|v| !v.is_empty()) {
            self.server_info.version = version.to_string();
        }
        self
    }

    pub fn with_strict_writes(mut self, strict: bool) -> Self {
        self.strict_writes = strict;
        self
    }
}
