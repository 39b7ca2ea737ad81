//! Webhook handling: signature verification and payload parsing.

pub mod events;
pub mod signature;

pub use events::{ParseError, PullRequestEvent, WebhookEvent, parse_webhook};
pub use signature::{
    compute_signature, format_signature_header, parse_signature_header, verify_signature,
};
