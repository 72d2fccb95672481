use std::time::Duration;

use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::extract::branch_names;
use crate::mcp::ToolSessionClient;
use crate::retry::{with_retry, RetryPolicy};

#[derive(Debug, Clone)]
pub struct RepoTarget {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub base_branch: String,
}

#[derive(Debug, Clone)]
pub struct FileUpload {
    pub path: String,
    pub content: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CommitReport {
    pub branch: String,
    pub uploaded: Vec<String>,
    pub errors: Vec<String>,
}

impl CommitReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && !self.uploaded.is_empty()
    }
}

/// Whether `branch` shows up in `list_branches`. Lookup failures count as absent.
pub async fn branch_exists(client: &ToolSessionClient, owner: &str, repo: &str, branch: &str) -> bool {
    info!(%branch, "checking if branch exists");
    match client
        .call_tool("list_branches", json!({"owner": owner, "repo": repo}))
        .await
    {
        Ok(content) => {
            let names = branch_names(&content, branch);
            info!(?names, "extracted branch names");
            names.iter().any(|n| n == branch)
        }
        Err(e) => {
            error!(error = %e, "error checking branch existence");
            false
        }
    }
}

pub async fn create_branch(client: &ToolSessionClient, target: &RepoTarget, policy: &RetryPolicy) -> Result<()> {
    with_retry(policy, "create_branch", move |attempt| async move {
        info!(branch = %target.branch, attempt, "creating branch");
        client
            .call_tool(
                "create_branch",
                json!({
                    "owner": target.owner,
                    "repo": target.repo,
                    "branch": target.branch,
                    "from_branch": target.base_branch,
                }),
            )
            .await
    })
    .await?;
    info!(branch = %target.branch, "branch created");
    Ok(())
}

/// Make sure the target branch exists, falling back to the base branch if it
/// cannot be created. Returns the branch files should be committed to.
pub async fn ensure_branch(client: &ToolSessionClient, target: &RepoTarget, policy: &RetryPolicy) -> String {
    if target.branch == target.base_branch
        || branch_exists(client, &target.owner, &target.repo, &target.branch).await
    {
        info!(branch = %target.branch, "using existing branch");
        return target.branch.clone();
    }

    match create_branch(client, target, policy).await {
        Ok(()) => target.branch.clone(),
        Err(e) => {
            warn!(error = %e, base = %target.base_branch, "branch creation failed, using base branch");
            target.base_branch.clone()
        }
    }
}

/// Upload each file with `create_or_update_file`. Individual failures are
/// recorded in the report and do not stop the remaining uploads.
pub async fn commit_files(
    client: &ToolSessionClient,
    target: &RepoTarget,
    files: &[FileUpload],
    policy: &RetryPolicy,
) -> Result<CommitReport> {
    if files.is_empty() {
        bail!("no files to commit");
    }

    let branch = ensure_branch(client, target, policy).await;
    let mut report = CommitReport {
        branch: branch.clone(),
        ..Default::default()
    };

    for file in files {
        info!(path = %file.path, %branch, "uploading file");
        let result = client
            .call_tool(
                "create_or_update_file",
                json!({
                    "owner": target.owner,
                    "repo": target.repo,
                    "path": file.path,
                    "content": file.content,
                    "message": file.message,
                    "branch": branch,
                }),
            )
            .await;

        match result {
            Ok(_) => report.uploaded.push(file.path.clone()),
            Err(e) => {
                error!(path = %file.path, error = %e, "upload failed");
                report.errors.push(format!("{}: {}", file.path, e));
            }
        }
    }

    Ok(report)
}

/// Branch name derived from an event or topic name.
pub fn branch_for(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

pub fn default_retry_policy(attempts: u32) -> RetryPolicy {
    RetryPolicy::new(attempts, Duration::from_secs(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_for() {
        assert_eq!(branch_for("ApiDays Paris 2025"), "apidays-paris-2025");
    }

    #[test]
    fn test_report_success() {
        let mut report = CommitReport::default();
        assert!(!report.is_success());
        report.uploaded.push("events/report.md".into());
        assert!(report.is_success());
        report.errors.push("events/image.jpg: HTTP error".into());
        assert!(!report.is_success());
    }
}
