//! GitHub API access.
//!
//! This module provides the authenticated client wrapper, the error taxonomy
//! used everywhere the API is touched, and the pagination cursor the listing
//! endpoints are driven with.

pub mod client;
pub mod error;
pub mod pages;

pub use client::GitHubClient;
pub use error::{ApiError, ApiErrorKind};
pub use pages::{PAGE_SIZE, PageOf, Pager};
