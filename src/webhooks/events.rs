//! Typed webhook events and payload parsing.
//!
//! The checker handles exactly two event types: `pull_request` (policy
//! enforcement) and `ping` (GitHub's delivery test, a no-op). Every other
//! event type parses to `Ok(None)` so the caller can log and drop it -
//! unknown events are expected traffic, not errors.
//!
//! # Parsing Strategy
//!
//! 1. The event type comes from the `X-GitHub-Event` header
//! 2. The payload is decoded according to the event type
//! 3. Unknown event types return `Ok(None)`
//! 4. Malformed payloads return `Err` with details

use serde::Deserialize;
use thiserror::Error;

use crate::types::{PrNumber, RepoId};

/// A parsed webhook event.
///
/// This is a closed set: the hooks this system registers subscribe only to
/// pull request events, and GitHub additionally delivers `ping` on hook
/// creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    /// A pull request was opened, synchronized, or otherwise updated.
    PullRequest(PullRequestEvent),

    /// GitHub's hook-creation test event. Acknowledged, nothing to do.
    Ping,
}

/// The fields of a `pull_request` delivery the checker consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    /// The repository the pull request belongs to.
    pub repo: RepoId,

    /// The pull request number.
    pub number: PrNumber,

    /// The action verbatim ("opened", "synchronize", ...). The sign-off
    /// policy re-evaluates on every action; this is recorded for logging.
    pub action: String,
}

/// Error type for webhook parsing failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON deserialization failed (includes missing required fields).
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses a webhook payload into a typed event.
///
/// # Returns
///
/// * `Ok(Some(event))` - a known event type was parsed
/// * `Ok(None)` - unknown event type (to be logged and dropped, not an error)
/// * `Err(e)` - malformed payload or missing required fields
pub fn parse_webhook(event_type: &str, payload: &[u8]) -> Result<Option<WebhookEvent>, ParseError> {
    match event_type {
        "pull_request" => parse_pull_request(payload).map(|e| Some(WebhookEvent::PullRequest(e))),
        "ping" => Ok(Some(WebhookEvent::Ping)),
        _ => Ok(None),
    }
}

// Raw payload structures matching GitHub's webhook JSON. Only the fields the
// checker consumes are declared; everything else is ignored.

#[derive(Debug, Deserialize)]
struct RawPullRequestPayload {
    action: String,
    number: u64,
    repository: RawRepository,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    owner: RawOwner,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawOwner {
    login: String,
}

fn parse_pull_request(payload: &[u8]) -> Result<PullRequestEvent, ParseError> {
    let raw: RawPullRequestPayload = serde_json::from_slice(payload)?;

    Ok(PullRequestEvent {
        repo: RepoId::new(raw.repository.owner.login, raw.repository.name),
        number: PrNumber(raw.number),
        action: raw.action,
    })
}
