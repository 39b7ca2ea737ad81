//! Branch protection reconciliation.
//!
//! Desired state is "the existing configuration plus the sign-off context in
//! the required status checks" - a merge, never a replace. The write is a
//! get-modify-put: the protection endpoint offers no precondition, so a
//! concurrent change to branch protection between the read and the write is
//! lost. That window is an accepted limitation.

use serde::{Deserialize, Serialize};

use crate::github::{ApiError, GitHubClient};
use crate::signoff::STATUS_CONTEXT;
use crate::types::Repository;

#[derive(Debug, Default, Deserialize)]
struct Protection {
    #[serde(default)]
    enforce_admins: Option<EnforceAdmins>,
    #[serde(default)]
    required_status_checks: Option<StatusChecks>,
}

#[derive(Debug, Deserialize)]
struct EnforceAdmins {
    enabled: bool,
}

#[derive(Debug, Default, Deserialize)]
struct StatusChecks {
    #[serde(default)]
    strict: bool,
    #[serde(default)]
    contexts: Vec<String>,
}

/// PUT body for the protection endpoint. The API requires every key to be
/// present; the settings this system does not manage are sent as null.
#[derive(Debug, Serialize)]
struct ProtectionRequest {
    enforce_admins: bool,
    required_status_checks: RequiredChecksRequest,
    required_pull_request_reviews: Option<()>,
    restrictions: Option<()>,
}

#[derive(Debug, Serialize)]
struct RequiredChecksRequest {
    strict: bool,
    contexts: Vec<String>,
}

fn protection_route(repo: &Repository) -> String {
    format!(
        "/repos/{}/{}/branches/{}/protection",
        repo.owner,
        repo.name,
        urlencoding::encode(&repo.default_branch)
    )
}

/// Returns true if the default branch already requires the sign-off context.
///
/// A 404 means no branch protection is configured at all, returned as a
/// clean `false`.
pub async fn has_protection(gh: &GitHubClient, repo: &Repository) -> Result<bool, ApiError> {
    let route = format!(
        "{}/required_status_checks/contexts",
        protection_route(repo)
    );

    match gh.get_json::<Vec<String>>(&route).await {
        Ok(contexts) => Ok(contexts.iter().any(|c| c == STATUS_CONTEXT)),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Builds the protection write from whatever configuration already exists.
///
/// `None` (no protection at all) gets fresh defaults: admin enforcement on,
/// non-strict checks, exactly the sign-off context. Existing protection is
/// preserved and extended: a missing required-checks block becomes an empty
/// one, the sign-off context is appended without duplicating, and the admin
/// flag and strictness carry over unchanged.
fn merge_protection(existing: Option<Protection>) -> ProtectionRequest {
    let Some(protection) = existing else {
        return ProtectionRequest {
            enforce_admins: true,
            required_status_checks: RequiredChecksRequest {
                strict: false,
                contexts: vec![STATUS_CONTEXT.to_string()],
            },
            required_pull_request_reviews: None,
            restrictions: None,
        };
    };

    let checks = protection.required_status_checks.unwrap_or_default();
    let mut contexts = checks.contexts;
    if !contexts.iter().any(|c| c == STATUS_CONTEXT) {
        contexts.push(STATUS_CONTEXT.to_string());
    }

    ProtectionRequest {
        enforce_admins: protection
            .enforce_admins
            .map(|e| e.enabled)
            .unwrap_or(false),
        required_status_checks: RequiredChecksRequest {
            strict: checks.strict,
            contexts,
        },
        required_pull_request_reviews: None,
        restrictions: None,
    }
}

/// Reads the existing branch protection and writes it back with the sign-off
/// context required.
pub async fn add_protection(gh: &GitHubClient, repo: &Repository) -> Result<(), ApiError> {
    let route = protection_route(repo);

    let existing = match gh.get_json::<Protection>(&route).await {
        Ok(protection) => Some(protection),
        Err(e) if e.is_not_found() => None,
        Err(e) => return Err(e),
    };

    let request = merge_protection(existing);
    gh.put_json(&route, &request).await
}
