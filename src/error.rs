use thiserror::Error;

/// Why a response body could not be turned into a JSON-RPC envelope.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed JSON in response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("no data line found in event-stream response")]
    NoDataLine,
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("MCP session handshake failed")]
    HandshakeFailed,
    #[error("HTTP error (status {status}): {body}")]
    Http { status: u16, body: String },
    #[error("MCP error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("could not decode MCP response: {0}")]
    Decode(#[from] DecodeError),
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid tool request: {0}")]
    InvalidRequest(String),
    #[error("could not encode request: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ToolError {
    /// Builds an `Rpc` error from the `error` member of a JSON-RPC envelope.
    pub fn from_rpc_error(error: &serde_json::Value) -> Self {
        let code = error.get("code").and_then(|c| c.as_i64()).unwrap_or(-1);
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .map(|m| m.to_string())
            .unwrap_or_else(|| error.to_string());
        ToolError::Rpc { code, message }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ToolError::Transport(e) if e.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no data received for {0} seconds")]
    Timeout(u64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rpc_error_fields() {
        let err = ToolError::from_rpc_error(&json!({"code": -32601, "message": "Method not found"}));
        match err {
            ToolError::Rpc { code, message } => {
                assert_eq!(code, -32601);
                assert_eq!(message, "Method not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rpc_error_without_message() {
        let err = ToolError::from_rpc_error(&json!("boom"));
        assert_eq!(err.to_string(), "MCP error -1: \"boom\"");
    }
}
