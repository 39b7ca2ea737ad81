//! Octocrab client wrapper.
//!
//! Wraps an authenticated `Octocrab` instance and exposes typed raw-route
//! helpers for the API surfaces the bindings do not wrap (hooks, commit
//! statuses, file contents, branch protection). Every helper maps failures
//! into [`ApiError`] so call sites can distinguish "absent" (404) from real
//! failures.
//!
//! The client is constructed once at bootstrap and passed into the server
//! state and the sweep - core logic never builds or reads one from ambient
//! process state.

use octocrab::Octocrab;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// An authenticated GitHub API client.
#[derive(Clone)]
pub struct GitHubClient {
    inner: Octocrab,
}

impl GitHubClient {
    /// Creates a client from a pre-configured Octocrab instance.
    pub fn new(inner: Octocrab) -> Self {
        Self { inner }
    }

    /// Creates a client from a personal access token.
    pub fn from_token(token: impl Into<String>) -> Result<Self, octocrab::Error> {
        let inner = Octocrab::builder().personal_token(token.into()).build()?;
        Ok(Self::new(inner))
    }

    /// Returns a reference to the underlying octocrab client.
    pub fn inner(&self) -> &Octocrab {
        &self.inner
    }

    /// GETs a route and deserializes the JSON response.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, route: &str) -> Result<T, ApiError> {
        self.inner
            .get(route, None::<&()>)
            .await
            .map_err(ApiError::from_octocrab)
    }

    /// POSTs a JSON body to a route, discarding the response body.
    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        route: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .inner
            .post(route, Some(body))
            .await
            .map_err(ApiError::from_octocrab)?;
        Ok(())
    }

    /// PUTs a JSON body to a route, discarding the response body.
    pub(crate) async fn put_json<B: Serialize + ?Sized>(
        &self,
        route: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .inner
            .put(route, Some(body))
            .await
            .map_err(ApiError::from_octocrab)?;
        Ok(())
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient").finish_non_exhaustive()
    }
}
