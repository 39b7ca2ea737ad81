//! Sign-off policy enforcement for pull request events.
//!
//! Flow per event: fetch the complete commit list, compute the aggregate
//! verdict, publish it onto every commit. Each event is handled from scratch;
//! nothing is cached between deliveries.

pub mod commits;
pub mod status;
pub mod verdict;

pub use commits::list_pr_commits;
pub use status::{STATUS_CONTEXT, publish_verdict};
pub use verdict::{CommitRecord, Verdict, VerdictState, evaluate, is_signed_off};

use tracing::{info, warn};

use crate::github::GitHubClient;
use crate::webhooks::PullRequestEvent;

/// Handles one pull request event end to end.
///
/// A failure fetching the commit list abandons the event (GitHub's redelivery
/// is the retry path); publishing failures are handled per commit inside
/// [`publish_verdict`]. Nothing propagates to the HTTP response.
pub async fn handle_pull_request(gh: &GitHubClient, event: &PullRequestEvent) {
    let commits = match list_pr_commits(gh, &event.repo, event.number).await {
        Ok(commits) => commits,
        Err(e) => {
            warn!(
                repo = %event.repo,
                pr = %event.number,
                error = %e,
                "Error getting commits for PR"
            );
            return;
        }
    };

    let verdict = evaluate(&event.repo, &commits);

    info!(
        repo = %event.repo,
        pr = %event.number,
        action = %event.action,
        commits = commits.len(),
        state = %verdict.state,
        "Evaluated sign-off policy"
    );

    publish_verdict(gh, &event.repo, &commits, &verdict).await;
}
