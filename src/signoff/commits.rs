//! Pull request commit listing.
//!
//! The commit list is fetched fresh on every event and collected client-side
//! into one complete sequence before the verdict is computed - the verdict is
//! a property of the whole set, not of individual pages.

use serde::Deserialize;

use super::verdict::CommitRecord;
use crate::github::{ApiError, GitHubClient, PAGE_SIZE, PageOf, Pager};
use crate::types::{PrNumber, RepoId, Sha};

#[derive(Debug, Deserialize)]
struct RawCommit {
    sha: String,
    commit: RawCommitDetail,
}

#[derive(Debug, Deserialize)]
struct RawCommitDetail {
    message: String,
}

/// Collects the complete, ordered commit list for a pull request.
///
/// Pages are fetched in API order and concatenated; ordering is the API's
/// page order.
pub async fn list_pr_commits(
    gh: &GitHubClient,
    repo: &RepoId,
    number: PrNumber,
) -> Result<Vec<CommitRecord>, ApiError> {
    let raw = Pager::new(|page| {
        let route = format!(
            "/repos/{}/{}/pulls/{}/commits?per_page={}&page={}",
            repo.owner, repo.repo, number.0, PAGE_SIZE, page
        );
        async move {
            let items: Vec<RawCommit> = gh.get_json(&route).await?;
            Ok(PageOf::from_items(items, PAGE_SIZE))
        }
    })
    .collect_all()
    .await?;

    Ok(raw
        .into_iter()
        .map(|c| CommitRecord {
            sha: Sha::new(c.sha),
            message: c.commit.message,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_commit_deserializes_api_shape() {
        let payload = r#"{
            "sha": "1234567890abcdef1234567890abcdef12345678",
            "commit": {
                "message": "fix bug\n\nSigned-off-by: A <a@x.com>",
                "author": { "name": "A", "email": "a@x.com" }
            },
            "url": "https://api.github.com/repos/o/r/commits/1234"
        }"#;

        let raw: RawCommit = serde_json::from_str(payload).unwrap();
        assert_eq!(raw.sha, "1234567890abcdef1234567890abcdef12345678");
        assert_eq!(raw.commit.message, "fix bug\n\nSigned-off-by: A <a@x.com>");
    }
}
