//! Webhook reconciliation.
//!
//! Desired state is a constant: one hook delivering `pull_request` events to
//! the public callback URL. Actual state is whatever hooks already exist,
//! discovered by listing and matching on URL. The existence check gates the
//! create - creation itself is not idempotent.

use serde::{Deserialize, Serialize};

use crate::github::{ApiError, GitHubClient, PAGE_SIZE, PageOf, Pager};
use crate::types::Repository;

#[derive(Debug, Deserialize)]
struct Hook {
    #[serde(default)]
    config: HookConfig,
}

#[derive(Debug, Default, Deserialize)]
struct HookConfig {
    url: Option<String>,
}

/// POST body for hook creation.
#[derive(Debug, Serialize)]
struct NewHook<'a> {
    name: &'static str,
    active: bool,
    events: [&'static str; 1],
    config: NewHookConfig<'a>,
}

#[derive(Debug, Serialize)]
struct NewHookConfig<'a> {
    url: &'a str,
    secret: &'a str,
    content_type: &'static str,
}

fn hooks_route(repo: &Repository) -> String {
    format!("/repos/{}/{}/hooks", repo.owner, repo.name)
}

fn page_has_url(hooks: &[Hook], url: &str) -> bool {
    hooks.iter().any(|h| h.config.url.as_deref() == Some(url))
}

/// Returns true if any existing hook on the repository delivers to `url`.
///
/// A 404 from the hook listing means the repository has no hooks configured
/// and is a clean `false`, not an error. Pagination stops at the first match.
pub async fn has_hook(gh: &GitHubClient, repo: &Repository, url: &str) -> Result<bool, ApiError> {
    let mut pager = Pager::new(|page| {
        let route = format!("{}?per_page={}&page={}", hooks_route(repo), PAGE_SIZE, page);
        async move {
            let items: Vec<Hook> = gh.get_json(&route).await?;
            Ok(PageOf::from_items(items, PAGE_SIZE))
        }
    });

    loop {
        let hooks = match pager.next_page::<Hook, ApiError, _>().await {
            Ok(Some(hooks)) => hooks,
            Ok(None) => return Ok(false),
            Err(e) if e.is_not_found() => return Ok(false),
            Err(e) => return Err(e),
        };

        if page_has_url(&hooks, url) {
            return Ok(true);
        }
    }
}

/// Creates the sign-off webhook on the repository.
///
/// The hook is a generic "web" delivery, subscribed only to pull request
/// events, active, JSON content type, with the secret embedded in its
/// configuration. Not idempotent: calling it twice creates two hooks, so
/// callers gate on [`has_hook`].
pub async fn add_hook(
    gh: &GitHubClient,
    repo: &Repository,
    url: &str,
    secret: &str,
) -> Result<(), ApiError> {
    let hook = NewHook {
        name: "web",
        active: true,
        events: ["pull_request"],
        config: NewHookConfig {
            url,
            secret,
            content_type: "json",
        },
    };

    gh.post_json(&hooks_route(repo), &hook).await
}
