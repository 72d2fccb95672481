use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::decode::decode_response;
use super::types::{
    ClientInfo, InitializeParams, McpTool, RpcEnvelope, ToolCall, ToolListResponse,
    METHOD_INITIALIZE, METHOD_INITIALIZED, METHOD_TOOLS_CALL, METHOD_TOOLS_LIST,
};
use crate::error::{DecodeError, Result, ToolError};

pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";
pub const SESSION_HEADER: &str = "mcp-session-id";
pub const ACCEPT_JSON_AND_EVENT_STREAM: &str = "application/json, text/event-stream";

const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(30);
const INITIALIZE_ID: u64 = 0;

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub default_timeout: Duration,
    pub handshake_timeout: Duration,
    /// Per-tool timeouts for operations known to be slow.
    pub timeout_overrides: HashMap<String, Duration>,
    pub client_info: ClientInfo,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TOOL_TIMEOUT,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            timeout_overrides: HashMap::new(),
            client_info: ClientInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}

#[derive(Debug, Default)]
struct Session {
    session_id: Option<String>,
    initialized: bool,
}

/// JSON-RPC client for one MCP endpoint over streamable HTTP.
///
/// The `initialize` handshake runs lazily before the first request and at
/// most once successfully per instance. The session lock is held for the
/// whole handshake, so concurrent first callers share one attempt. A failed
/// handshake leaves the client uninitialized and the next call tries again.
/// A session the server later invalidates is not renegotiated; build a new
/// client instead.
pub struct ToolSessionClient {
    endpoint: String,
    http: Client,
    options: ClientOptions,
    session: Mutex<Session>,
    next_id: AtomicU64,
}

impl ToolSessionClient {
    pub fn new(endpoint: impl Into<String>, options: ClientOptions) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self::with_http_client(endpoint, http, options))
    }

    pub fn with_http_client(endpoint: impl Into<String>, http: Client, options: ClientOptions) -> Self {
        Self {
            endpoint: endpoint.into(),
            http,
            options,
            session: Mutex::new(Session::default()),
            next_id: AtomicU64::new(INITIALIZE_ID + 1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn is_initialized(&self) -> bool {
        self.session.lock().await.initialized
    }

    pub async fn session_id(&self) -> Option<String> {
        self.session.lock().await.session_id.clone()
    }

    pub fn timeout_for(&self, tool_name: &str) -> Duration {
        self.options
            .timeout_overrides
            .get(tool_name)
            .copied()
            .unwrap_or(self.options.default_timeout)
    }

    /// Invoke a tool and return its `result.content` payload.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value> {
        if name.trim().is_empty() {
            return Err(ToolError::InvalidRequest("tool name must not be empty".into()));
        }
        let arguments = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(ToolError::InvalidRequest(format!(
                    "arguments for '{}' must be a JSON object, got {}",
                    name, other
                )))
            }
        };

        let call = ToolCall {
            name: name.to_string(),
            arguments,
        };
        let timeout = self.timeout_for(name);
        info!(tool = %name, timeout_secs = timeout.as_secs(), "calling MCP tool");
        let logged_arguments = Value::Object(call.arguments.clone());
        debug!(arguments = %logged_arguments, "tool arguments");

        let response = self
            .request(METHOD_TOOLS_CALL, serde_json::to_value(&call)?, timeout)
            .await?;

        let content = response
            .pointer("/result/content")
            .filter(|content| !content.is_null())
            .cloned()
            .unwrap_or_else(|| json!([]));
        info!(tool = %name, "MCP tool call succeeded");
        Ok(content)
    }

    /// Discover the tools the server exposes.
    pub async fn list_tools(&self) -> Result<Vec<McpTool>> {
        let response = self
            .request(METHOD_TOOLS_LIST, json!({}), self.options.default_timeout)
            .await?;
        let listing = match response.get("result") {
            Some(result) => serde_json::from_value::<ToolListResponse>(result.clone())
                .map_err(DecodeError::from)?,
            None => ToolListResponse { tools: Vec::new() },
        };
        debug!(count = listing.tools.len(), "discovered MCP tools");
        Ok(listing.tools)
    }

    async fn request(&self, method: &str, params: Value, timeout: Duration) -> Result<Value> {
        let session_id = self.ensure_session().await?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let envelope = RpcEnvelope::request(id, method, Some(params));
        let response = self.post(&envelope, session_id.as_deref(), timeout).await?;

        let status = response.status();
        let content_type = content_type(&response);
        let body = response.text().await?;
        debug!(method, status = status.as_u16(), "MCP response received");

        if status != StatusCode::OK {
            error!(method, status = status.as_u16(), body = %body, "MCP HTTP error");
            return Err(ToolError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let decoded = decode_response(content_type.as_deref(), &body).map_err(|e| {
            error!(method, error = %e, raw = %body, "failed to decode MCP response");
            ToolError::from(e)
        })?;

        match decoded.get("error") {
            Some(rpc_error) if !rpc_error.is_null() => {
                error!(method, error = %rpc_error, "MCP returned an error");
                Err(ToolError::from_rpc_error(rpc_error))
            }
            _ => Ok(decoded),
        }
    }

    async fn ensure_session(&self) -> Result<Option<String>> {
        let mut session = self.session.lock().await;
        if !session.initialized {
            info!(endpoint = %self.endpoint, "MCP session not initialized, running handshake");
            match self.handshake().await {
                Ok(session_id) => {
                    session.session_id = session_id;
                    session.initialized = true;
                }
                Err(e) => {
                    error!(endpoint = %self.endpoint, error = %e, "MCP handshake failed");
                    return Err(ToolError::HandshakeFailed);
                }
            }
        }
        Ok(session.session_id.clone())
    }

    async fn handshake(&self) -> Result<Option<String>> {
        let params = InitializeParams {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: json!({}),
            client_info: self.options.client_info.clone(),
        };
        let envelope = RpcEnvelope::request(
            INITIALIZE_ID,
            METHOD_INITIALIZE,
            Some(serde_json::to_value(params)?),
        );

        let response = self
            .post(&envelope, None, self.options.handshake_timeout)
            .await?;

        let session_id = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        match &session_id {
            Some(id) => info!(session_id = %id, "captured MCP session id"),
            None => debug!("no MCP session id in initialize response"),
        }

        let status = response.status();
        let content_type = content_type(&response);
        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(ToolError::Http {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            debug!("initialize response body is empty");
        } else {
            let decoded = decode_response(content_type.as_deref(), &body)?;
            if let Some(rpc_error) = decoded.get("error").filter(|e| !e.is_null()) {
                warn!(error = %rpc_error, "initialize returned an error, continuing");
            } else if let Some(server) = decoded.pointer("/result/serverInfo/name") {
                debug!(server = %server, "MCP server identified");
            }
        }

        let notification = RpcEnvelope::notification(METHOD_INITIALIZED);
        match self
            .post(&notification, session_id.as_deref(), self.options.handshake_timeout)
            .await
        {
            Ok(resp) => debug!(status = resp.status().as_u16(), "initialized notification sent"),
            Err(e) => warn!(error = %e, "initialized notification failed"),
        }

        info!(endpoint = %self.endpoint, "MCP session initialized");
        Ok(session_id)
    }

    async fn post(
        &self,
        envelope: &RpcEnvelope,
        session_id: Option<&str>,
        timeout: Duration,
    ) -> Result<Response> {
        let body = serde_json::to_vec(envelope)?;
        let mut req = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, ACCEPT_JSON_AND_EVENT_STREAM)
            .timeout(timeout)
            .body(body);

        if let Some(id) = session_id {
            req = req.header(SESSION_HEADER, id);
        }

        let response = req.send().await.map_err(|e| {
            error!(endpoint = %self.endpoint, method = %envelope.method, error = %e, "MCP HTTP request failed");
            ToolError::Transport(e)
        })?;
        Ok(response)
    }
}

fn content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_overrides() {
        let mut options = ClientOptions::default();
        options
            .timeout_overrides
            .insert("create_branch".to_string(), Duration::from_secs(120));
        let client = ToolSessionClient::with_http_client("http://localhost:3000/mcp", Client::new(), options);

        assert_eq!(client.timeout_for("create_branch"), Duration::from_secs(120));
        assert_eq!(client.timeout_for("create_presentation"), Duration::from_secs(60));
    }
}
