use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::validation::validate_endpoint;
use crate::error::Result;
use crate::mcp::{ClientInfo, ClientOptions, ToolSessionClient};

/// One MCP server as written in the config file. Every field is optional so
/// environment variables and built-in defaults can fill the gaps.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub handshake_timeout_secs: Option<u64>,
    #[serde(default)]
    pub timeout_overrides: HashMap<String, u64>,
    #[serde(default)]
    pub client_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServersConfig {
    #[serde(default)]
    pub slides: ServerSettings,
    #[serde(default)]
    pub github: ServerSettings,
}

/// Fully resolved settings for one server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub url: String,
    pub timeout: Duration,
    pub handshake_timeout: Duration,
    pub timeout_overrides: HashMap<String, Duration>,
    pub client_name: String,
}

impl ServerConfig {
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            default_timeout: self.timeout,
            handshake_timeout: self.handshake_timeout,
            timeout_overrides: self.timeout_overrides.clone(),
            client_info: ClientInfo {
                name: self.client_name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Replace the URL with a `--url` override, held to the same checks as
    /// configured URLs.
    pub fn with_url_override(mut self, url: Option<&str>) -> anyhow::Result<Self> {
        if let Some(url) = url {
            validate_endpoint(url).map_err(|e| anyhow::anyhow!("invalid --url: {}", e))?;
            self.url = url.to_string();
        }
        Ok(self)
    }

    pub fn connect(&self) -> Result<ToolSessionClient> {
        ToolSessionClient::new(self.url.clone(), self.client_options())
    }
}
