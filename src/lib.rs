//! sign-off-checker - a GitHub bot that enforces a Signed-off-by policy on
//! pull requests.
//!
//! The bot has two halves. The webhook half receives `pull_request` events,
//! fetches the full commit list, and posts a pass/fail status on every commit
//! depending on whether all of them carry a `Signed-off-by:` trailer. The
//! registration half periodically sweeps a set of organizations, finds
//! repositories whose CONTRIBUTING.md declares the Developer Certificate of
//! Origin, and provisions the webhook plus a branch-protection rule requiring
//! the status check.

pub mod config;
pub mod github;
pub mod register;
pub mod server;
pub mod signoff;
pub mod types;
pub mod webhooks;
