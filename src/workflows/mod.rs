pub mod repo;
pub mod slides;

use std::time::Duration;

use anyhow::{bail, Result};
use tracing::info;

use crate::mcp::{probe, ProbeOutcome};

pub use repo::{commit_files, CommitReport, FileUpload, RepoTarget};
pub use slides::{create_deck, DeckSummary};

/// Stop before a multi-step workflow when its tool server is down.
pub async fn ensure_reachable(server_label: &str, endpoint: &str, timeout: Duration) -> Result<ProbeOutcome> {
    let http = reqwest::Client::new();
    match probe(&http, endpoint, timeout).await {
        ProbeOutcome::Unreachable(reason) => {
            bail!("Cannot connect to {} MCP server at {}: {}", server_label, endpoint, reason)
        }
        outcome => {
            info!(server = %server_label, ?outcome, "MCP server reachable");
            Ok(outcome)
        }
    }
}
