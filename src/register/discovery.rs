//! DCO repository discovery.
//!
//! Walks an organization's full repository listing and keeps the
//! repositories whose CONTRIBUTING.md declares the Developer Certificate of
//! Origin. A missing guide is an empty string, not an error; any other
//! failure aborts discovery for the organization and propagates.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use tracing::debug;

use crate::github::{ApiError, GitHubClient, PAGE_SIZE, PageOf, Pager};
use crate::types::Repository;

/// Marker text that identifies a DCO contribution guide.
const DCO_MARKER: &str = "Developer Certificate of Origin";

#[derive(Debug, Deserialize)]
struct RawRepository {
    name: String,
    owner: RawOwner,
    default_branch: String,
    html_url: String,
    contents_url: String,
}

#[derive(Debug, Deserialize)]
struct RawOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RawContents {
    content: String,
}

/// Returns true if the contribution guide is based on the DCO.
pub(crate) fn is_dco(contributing: &str) -> bool {
    contributing.contains(DCO_MARKER)
}

/// Builds the base-relative contents route from the repository's contents URL
/// template (`.../contents/{+path}`).
///
/// The client routes against its configured base URI, so the scheme and host
/// are stripped when the template carries them.
fn contributing_route(contents_url: &str) -> String {
    let url = contents_url.replace("{+path}", "CONTRIBUTING.md");

    match url.find("://") {
        Some(scheme_end) => match url[scheme_end + 3..].find('/') {
            Some(path_start) => url[scheme_end + 3 + path_start..].to_string(),
            None => url,
        },
        None => url,
    }
}

/// Fetches the repository's CONTRIBUTING.md text.
///
/// A 404 means the repository has no contribution guide and yields an empty
/// string. Any other failure propagates.
pub async fn contributing_guide(gh: &GitHubClient, repo: &Repository) -> Result<String, ApiError> {
    let route = contributing_route(&repo.contents_url);

    let contents: RawContents = match gh.get_json(&route).await {
        Ok(contents) => contents,
        Err(e) if e.is_not_found() => return Ok(String::new()),
        Err(e) => return Err(e),
    };

    // The contents API returns base64 with embedded line breaks.
    let cleaned: String = contents
        .content
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let decoded = BASE64.decode(cleaned.as_bytes()).map_err(|e| {
        ApiError::invalid_response(format!(
            "Error decoding CONTRIBUTING.md for {}: {}",
            repo.full_name(),
            e
        ))
    })?;

    String::from_utf8(decoded).map_err(|e| {
        ApiError::invalid_response(format!(
            "CONTRIBUTING.md for {} is not valid UTF-8: {}",
            repo.full_name(),
            e
        ))
    })
}

/// Collects the organization's repositories whose contribution guide declares
/// the DCO, in listing order.
pub async fn dco_repositories(gh: &GitHubClient, org: &str) -> Result<Vec<Repository>, ApiError> {
    let raw = Pager::new(|page| {
        let route = format!(
            "/orgs/{}/repos?type=all&per_page={}&page={}",
            org, PAGE_SIZE, page
        );
        async move {
            let items: Vec<RawRepository> = gh.get_json(&route).await?;
            Ok(PageOf::from_items(items, PAGE_SIZE))
        }
    })
    .collect_all()
    .await?;

    let mut matching = Vec::new();
    for repo in raw {
        let repo = Repository {
            owner: repo.owner.login,
            name: repo.name,
            default_branch: repo.default_branch,
            html_url: repo.html_url,
            contents_url: repo.contents_url,
        };

        let contributing = contributing_guide(gh, &repo).await?;
        if is_dco(&contributing) {
            matching.push(repo);
        } else {
            debug!(repo = %repo, "No DCO marker in contribution guide");
        }
    }

    Ok(matching)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dco_marker_is_detected() {
        assert!(is_dco(
            "## Contributing\n\nThis project uses the Developer Certificate of Origin."
        ));
        assert!(!is_dco("## Contributing\n\nSign the CLA first."));
        assert!(!is_dco(""));
    }

    #[test]
    fn contributing_route_substitutes_path_and_strips_host() {
        assert_eq!(
            contributing_route("https://api.github.com/repos/heptio/ark/contents/{+path}"),
            "/repos/heptio/ark/contents/CONTRIBUTING.md"
        );
    }

    #[test]
    fn contributing_route_passes_through_relative_template() {
        assert_eq!(
            contributing_route("/repos/o/r/contents/{+path}"),
            "/repos/o/r/contents/CONTRIBUTING.md"
        );
    }

    #[test]
    fn raw_repository_deserializes_api_shape() {
        let payload = r#"{
            "id": 1,
            "name": "ark",
            "full_name": "heptio/ark",
            "owner": { "login": "heptio", "id": 2 },
            "default_branch": "master",
            "html_url": "https://github.com/heptio/ark",
            "contents_url": "https://api.github.com/repos/heptio/ark/contents/{+path}",
            "private": false
        }"#;

        let raw: RawRepository = serde_json::from_str(payload).unwrap();
        assert_eq!(raw.name, "ark");
        assert_eq!(raw.owner.login, "heptio");
        assert_eq!(raw.default_branch, "master");
    }
}
