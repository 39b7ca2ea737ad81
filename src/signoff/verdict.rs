//! Sign-off verdict computation.
//!
//! A commit is signed when its message carries a `Signed-off-by:` trailer at
//! the start of any line, matched case-insensitively. The pull request's
//! verdict is the logical AND across all of its commits: one unsigned commit
//! fails the entire set, and every commit in the set receives the same
//! aggregate verdict. Pure function over the fetched commit sequence; no side
//! effects.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::types::{RepoId, Sha};

/// Matches a sign-off trailer at the start of any line, case-insensitively.
static SIGN_OFF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^signed-off-by:").expect("sign-off pattern is valid"));

/// Description applied to every commit when at least one is unsigned.
const FAILURE_DESCRIPTION: &str = "A commit in PR is missing Signed-off-by";

/// Description applied to every commit when all are signed.
const SUCCESS_DESCRIPTION: &str = "Commit has Signed-off-by";

/// A commit as the verdict engine sees it: identity plus message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub sha: Sha,
    pub message: String,
}

/// Aggregate state of a pull request's sign-off check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictState {
    Success,
    Failure,
}

impl fmt::Display for VerdictState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerdictState::Success => write!(f, "success"),
            VerdictState::Failure => write!(f, "failure"),
        }
    }
}

/// The rendered outcome applied to every commit in the pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub state: VerdictState,
    pub description: &'static str,
    /// Points contributors at the repository's CONTRIBUTING.md.
    pub target_url: String,
}

/// Returns true if the message contains a sign-off trailer on any line.
pub fn is_signed_off(message: &str) -> bool {
    SIGN_OFF_RE.is_match(message)
}

/// Computes the aggregate verdict for a pull request's complete commit list.
///
/// The sequence must be complete (all pages collected) before calling; the
/// verdict is a property of the whole set. An empty set is vacuously signed.
pub fn evaluate(repo: &RepoId, commits: &[CommitRecord]) -> Verdict {
    let sign_missing = commits.iter().any(|c| !is_signed_off(&c.message));

    let (state, description) = if sign_missing {
        (VerdictState::Failure, FAILURE_DESCRIPTION)
    } else {
        (VerdictState::Success, SUCCESS_DESCRIPTION)
    };

    Verdict {
        state,
        description,
        target_url: format!(
            "https://github.com/{}/{}/blob/master/CONTRIBUTING.md",
            repo.owner, repo.repo
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn commit(sha: &str, message: &str) -> CommitRecord {
        CommitRecord {
            sha: Sha::new(sha),
            message: message.to_string(),
        }
    }

    fn repo() -> RepoId {
        RepoId::new("heptio", "ark")
    }

    #[test]
    fn trailer_on_last_line_is_signed() {
        assert!(is_signed_off(
            "fix bug\n\nSigned-off-by: A <a@x.com>"
        ));
    }

    #[test]
    fn trailer_in_middle_of_message_is_signed() {
        assert!(is_signed_off(
            "fix bug\n\nSigned-off-by: A <a@x.com>\n\nmore detail below the trailer"
        ));
    }

    #[test]
    fn trailer_is_case_insensitive() {
        assert!(is_signed_off("x\nsigned-off-by: a <a@x.com>"));
        assert!(is_signed_off("x\nSIGNED-OFF-BY: a <a@x.com>"));
        assert!(is_signed_off("x\nSigned-Off-By: a <a@x.com>"));
    }

    #[test]
    fn trailer_must_start_a_line() {
        assert!(!is_signed_off("this commit was Signed-off-by: someone"));
        assert!(!is_signed_off("xSigned-off-by: a <a@x.com>"));
    }

    #[test]
    fn bare_message_is_not_signed() {
        assert!(!is_signed_off("typo"));
        assert!(!is_signed_off(""));
    }

    #[test]
    fn all_signed_is_success() {
        let commits = vec![
            commit("a", "one\n\nSigned-off-by: A <a@x.com>"),
            commit("b", "two\n\nSigned-off-by: B <b@x.com>"),
        ];

        let verdict = evaluate(&repo(), &commits);
        assert_eq!(verdict.state, VerdictState::Success);
        assert_eq!(verdict.description, "Commit has Signed-off-by");
    }

    /// One unsigned commit fails the whole set; the failure verdict is what
    /// every commit will carry.
    #[test]
    fn one_unsigned_commit_fails_the_set() {
        let commits = vec![
            commit("a", "fix bug\n\nSigned-off-by: A <a@x.com>"),
            commit("b", "typo"),
        ];

        let verdict = evaluate(&repo(), &commits);
        assert_eq!(verdict.state, VerdictState::Failure);
        assert_eq!(verdict.description, "A commit in PR is missing Signed-off-by");
    }

    #[test]
    fn empty_commit_set_is_success() {
        let verdict = evaluate(&repo(), &[]);
        assert_eq!(verdict.state, VerdictState::Success);
    }

    #[test]
    fn target_url_points_at_contributing_guide() {
        let verdict = evaluate(&repo(), &[]);
        assert_eq!(
            verdict.target_url,
            "https://github.com/heptio/ark/blob/master/CONTRIBUTING.md"
        );
    }

    #[test]
    fn verdict_state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&VerdictState::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(
            serde_json::to_string(&VerdictState::Failure).unwrap(),
            "\"failure\""
        );
    }

    proptest! {
        /// Permuting the commit sequence never changes the aggregate verdict.
        #[test]
        fn prop_verdict_is_order_independent(
            signed in proptest::collection::vec(proptest::bool::ANY, 0..8),
            rotation in 0usize..8,
        ) {
            let commits: Vec<CommitRecord> = signed
                .iter()
                .enumerate()
                .map(|(i, &is_signed)| {
                    let message = if is_signed {
                        format!("commit {}\n\nSigned-off-by: Dev <dev@x.com>", i)
                    } else {
                        format!("commit {}", i)
                    };
                    commit(&format!("{:040x}", i), &message)
                })
                .collect();

            let mut rotated = commits.clone();
            if !rotated.is_empty() {
                let len = rotated.len();
                rotated.rotate_left(rotation % len);
            }

            prop_assert_eq!(
                evaluate(&repo(), &commits).state,
                evaluate(&repo(), &rotated).state
            );
        }

        /// Any set containing an unsigned commit fails; a fully signed set
        /// succeeds.
        #[test]
        fn prop_verdict_is_and_across_commits(
            signed in proptest::collection::vec(proptest::bool::ANY, 1..8),
        ) {
            let commits: Vec<CommitRecord> = signed
                .iter()
                .enumerate()
                .map(|(i, &is_signed)| {
                    let message = if is_signed {
                        format!("c{}\nSigned-off-by: Dev <dev@x.com>", i)
                    } else {
                        format!("c{}", i)
                    };
                    commit(&format!("{:040x}", i), &message)
                })
                .collect();

            let expected = if signed.iter().all(|&s| s) {
                VerdictState::Success
            } else {
                VerdictState::Failure
            };

            prop_assert_eq!(evaluate(&repo(), &commits).state, expected);
        }
    }
}
