//! Fetch port used by the network-style load strategy.

use async_trait::async_trait;

/// The outcome of a single fetch, successful or not at the HTTP level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// Status code reported by the host.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl FetchResponse {
    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Host capability to fetch a resource by URL or relative path.
#[async_trait]
pub trait DataFetcher: Send + Sync {
    /// Fetches `url`.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure when the request could not be
    /// made at all. Non-2xx responses are returned as `Ok`.
    async fn fetch(&self, url: &str) -> Result<FetchResponse, String>;
}
