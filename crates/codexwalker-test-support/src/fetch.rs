//! Test fetchers — mock `DataFetcher` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use codexwalker_core::fetch::{DataFetcher, FetchResponse};

/// A fetcher that answers from a fixed table of URLs and records every
/// request. Unknown URLs get a 404.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    responses: HashMap<String, FetchResponse>,
    requested: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    /// Creates a fetcher with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the response for `url`.
    #[must_use]
    pub fn with(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses.insert(
            url.to_owned(),
            FetchResponse {
                status,
                body: body.to_owned(),
            },
        );
        self
    }

    /// Returns every URL requested so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requested_urls(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, String> {
        self.requested.lock().unwrap().push(url.to_owned());
        Ok(self.responses.get(url).cloned().unwrap_or(FetchResponse {
            status: 404,
            body: String::new(),
        }))
    }
}

/// A fetcher whose every request fails before reaching a server.
#[derive(Debug)]
pub struct FailingFetcher;

#[async_trait]
impl DataFetcher for FailingFetcher {
    async fn fetch(&self, _url: &str) -> Result<FetchResponse, String> {
        Err("connection refused".into())
    }
}
