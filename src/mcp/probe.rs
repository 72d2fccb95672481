use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{debug, info, warn};

use super::client::ACCEPT_JSON_AND_EVENT_STREAM;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The sibling `/health` endpoint answered.
    Healthy,
    /// `/health` was unreachable but a bare `initialize` returned 200.
    InitializeOk,
    Unreachable(String),
}

impl ProbeOutcome {
    pub fn is_reachable(&self) -> bool {
        !matches!(self, ProbeOutcome::Unreachable(_))
    }
}

/// `/mcp` endpoints expose their health check next to them.
pub fn health_url(endpoint: &str) -> String {
    let trimmed = endpoint.trim_end_matches('/');
    match trimmed.strip_suffix("/mcp") {
        Some(base) => format!("{}/health", base),
        None => format!("{}/health", trimmed),
    }
}

/// Cheap reachability check run before multi-step workflows.
///
/// Any HTTP answer from `/health` counts as reachable; only a transport
/// failure falls through to an `initialize` POST.
pub async fn probe(http: &Client, endpoint: &str, timeout: Duration) -> ProbeOutcome {
    probe_with_health_url(http, &health_url(endpoint), endpoint, timeout).await
}

/// Same as [`probe`] with an explicit health check URL.
pub async fn probe_with_health_url(
    http: &Client,
    health: &str,
    endpoint: &str,
    timeout: Duration,
) -> ProbeOutcome {
    info!(url = %health, "probing MCP server");

    match http.get(health).timeout(timeout).send().await {
        Ok(resp) => {
            debug!(status = resp.status().as_u16(), "health endpoint answered");
            return ProbeOutcome::Healthy;
        }
        Err(e) => debug!(error = %e, "health endpoint unreachable, trying initialize"),
    }

    let init = json!({"jsonrpc": "2.0", "id": 0, "method": "initialize", "params": {}});
    match http
        .post(endpoint)
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, ACCEPT_JSON_AND_EVENT_STREAM)
        .timeout(timeout)
        .json(&init)
        .send()
        .await
    {
        Ok(resp) if resp.status() == StatusCode::OK => ProbeOutcome::InitializeOk,
        Ok(resp) => {
            let reason = format!("initialize returned HTTP {}", resp.status().as_u16());
            warn!(%reason, "MCP server probe failed");
            ProbeOutcome::Unreachable(reason)
        }
        Err(e) => {
            warn!(error = %e, "MCP server probe failed");
            ProbeOutcome::Unreachable(e.to_string())
        }
    }
}
