//! Commit status publishing.
//!
//! Every commit in the pull request receives the same aggregate verdict,
//! tagged with [`STATUS_CONTEXT`] so the check is distinguishable from other
//! status checks and so the branch-protection reconciler can find it later.
//! The context string is part of the deployed surface: changing it orphans
//! every branch-protection rule that references the old value.

use serde::Serialize;
use tracing::warn;

use super::verdict::{CommitRecord, Verdict, VerdictState};
use crate::github::{ApiError, GitHubClient};
use crate::types::RepoId;

/// Context identifier for the sign-off status check.
pub const STATUS_CONTEXT: &str = "signed-off-by";

/// POST body for the status endpoint.
#[derive(Debug, Clone, Serialize)]
struct StatusPayload<'a> {
    state: VerdictState,
    target_url: &'a str,
    description: &'a str,
    context: &'a str,
}

/// Publishes the verdict onto every commit in the pull request.
///
/// Best-effort broadcast: a failure on one commit is logged and the remaining
/// commits are still attempted.
pub async fn publish_verdict(
    gh: &GitHubClient,
    repo: &RepoId,
    commits: &[CommitRecord],
    verdict: &Verdict,
) {
    for commit in commits {
        if let Err(e) = publish_one(gh, repo, commit, verdict).await {
            warn!(
                repo = %repo,
                sha = %commit.sha,
                error = %e,
                "Error setting status"
            );
        }
    }
}

async fn publish_one(
    gh: &GitHubClient,
    repo: &RepoId,
    commit: &CommitRecord,
    verdict: &Verdict,
) -> Result<(), ApiError> {
    let route = format!("/repos/{}/{}/statuses/{}", repo.owner, repo.repo, commit.sha);
    let payload = StatusPayload {
        state: verdict.state,
        target_url: &verdict.target_url,
        description: verdict.description,
        context: STATUS_CONTEXT,
    };
    gh.post_json(&route, &payload).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_payload_serializes_api_shape() {
        let payload = StatusPayload {
            state: VerdictState::Failure,
            target_url: "https://github.com/o/r/blob/master/CONTRIBUTING.md",
            description: "A commit in PR is missing Signed-off-by",
            context: STATUS_CONTEXT,
        };

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "state": "failure",
                "target_url": "https://github.com/o/r/blob/master/CONTRIBUTING.md",
                "description": "A commit in PR is missing Signed-off-by",
                "context": "signed-off-by"
            })
        );
    }

    /// The context is deployed surface; this pin catches accidental renames.
    #[test]
    fn status_context_is_stable() {
        assert_eq!(STATUS_CONTEXT, "signed-off-by");
    }
}
