//! Webhook endpoint handler.
//!
//! Validates the delivery signature, decodes the payload into a typed event,
//! and runs the sign-off policy for pull request events. Signature and decode
//! failures reject the request with 400 and a plain-text body; failures after
//! that point are logged and the delivery is acknowledged - GitHub's
//! redelivery is the only retry path for a lost event.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, info};

use super::AppState;
use crate::signoff::handle_pull_request;
use crate::webhooks::{ParseError, WebhookEvent, parse_webhook, verify_signature};

/// Header name for GitHub event type.
const HEADER_EVENT: &str = "x-github-event";
/// Header name for GitHub signature.
const HEADER_SIGNATURE: &str = "x-hub-signature-256";

/// Errors that reject a webhook delivery.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Missing required header.
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    /// Signature did not match the shared secret.
    #[error("could not validate signature")]
    InvalidSignature,

    /// Payload did not decode into the typed event.
    #[error("error parsing payload: {0}")]
    Parse(#[from] ParseError),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        // Signature and decode failures are both client errors; the body
        // is plain text naming the failure.
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

/// Webhook handler.
///
/// # Request
///
/// - Method: POST
/// - Required headers:
///   - `X-GitHub-Event`: Event type (e.g., "pull_request", "ping")
///   - `X-Hub-Signature-256`: HMAC-SHA256 signature of the payload
/// - Body: JSON webhook payload
///
/// # Response
///
/// - 200 OK: Event processed (or ignored as an unsupported type)
/// - 400 Bad Request: Missing header, invalid signature, or malformed payload
pub async fn webhook_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, WebhookError> {
    let event_type = get_header(&headers, HEADER_EVENT)?;
    let signature_header = get_header(&headers, HEADER_SIGNATURE)?;

    // Verify the signature before parsing anything.
    if !verify_signature(&body, &signature_header, app_state.webhook_secret()) {
        return Err(WebhookError::InvalidSignature);
    }

    match parse_webhook(&event_type, &body)? {
        Some(WebhookEvent::PullRequest(event)) => {
            debug!(
                repo = %event.repo,
                pr = %event.number,
                action = %event.action,
                "Received pull request event"
            );
            handle_pull_request(app_state.github(), &event).await;
        }
        Some(WebhookEvent::Ping) => {
            debug!("Received ping");
        }
        None => {
            info!(event_type = %event_type, "Unhandled hook type");
        }
    }

    Ok("OK")
}

/// Extracts a required header value as a string.
fn get_header(headers: &HeaderMap, name: &'static str) -> Result<String, WebhookError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or(WebhookError::MissingHeader(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_header_present() {
        let mut headers = HeaderMap::new();
        headers.insert("x-github-event", "pull_request".parse().unwrap());

        let result = get_header(&headers, "x-github-event").unwrap();
        assert_eq!(result, "pull_request");
    }

    #[test]
    fn get_header_missing() {
        let headers = HeaderMap::new();

        let result = get_header(&headers, "x-github-event");
        assert!(matches!(result, Err(WebhookError::MissingHeader(_))));
    }

    #[test]
    fn errors_render_as_bad_request() {
        let response = WebhookError::InvalidSignature.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = WebhookError::MissingHeader("x-github-event").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
