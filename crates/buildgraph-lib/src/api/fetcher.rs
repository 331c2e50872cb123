//! Document fetching over the CI server's REST API
//!
//! Provides production (Live) and test (Mock) implementations of the
//! document fetcher. One HTTP GET per call, body parsed into a
//! [`Document`] tree. The manifest-specific `fetch_or_empty` treats any
//! non-success status as "this build has no package activity" and
//! substitutes the empty-manifest sentinel.

use super::document::{Document, DocumentError};
use crate::networking::{NetworkingError, NetworkingManager};
use reqwest::Url;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::trace;

/// Document fetch errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: NetworkingError,
    },

    #[error("HTTP request failed: {source}")]
    Request {
        #[from]
        source: reqwest::Error,
    },

    #[error("Server returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid document from {url}: {source}")]
    Document { url: String, source: DocumentError },
}

/// Capability to fetch hypermedia documents from the crawled server.
///
/// The crawler takes this as an explicit collaborator; the Mock
/// implementation drives the full descent against canned bodies.
pub trait DocumentFetcher {
    /// Root URL of the crawled server; relative links resolve against it
    fn base_url(&self) -> &Url;

    /// GET one document. Non-success status, transport failure and parse
    /// failure are all errors, fatal for the crawl branch issuing them.
    fn fetch(
        &self,
        url: &Url,
    ) -> impl std::future::Future<Output = Result<Document, FetchError>> + Send;

    /// GET a package manifest. Any non-success status yields
    /// [`Document::empty_manifest`] instead of failing; only this endpoint
    /// legitimately 404s for builds without package activity.
    fn fetch_or_empty(
        &self,
        url: &Url,
    ) -> impl std::future::Future<Output = Result<Document, FetchError>> + Send;
}

/// Live document fetcher (production)
pub struct LiveDocumentFetcher {
    networking: Arc<NetworkingManager>,
}

impl LiveDocumentFetcher {
    pub fn new(networking: Arc<NetworkingManager>) -> Self {
        Self { networking }
    }
}

impl DocumentFetcher for LiveDocumentFetcher {
    fn base_url(&self) -> &Url {
        self.networking.base_url()
    }

    async fn fetch(&self, url: &Url) -> Result<Document, FetchError> {
        let response = self.networking.get(url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        Document::parse(&body).map_err(|source| FetchError::Document {
            url: url.to_string(),
            source,
        })
    }

    async fn fetch_or_empty(&self, url: &Url) -> Result<Document, FetchError> {
        let response = self.networking.get(url).await?;
        let status = response.status();
        if !status.is_success() {
            trace!("No package manifest at {} (status {})", url, status);
            return Ok(Document::empty_manifest());
        }

        let body = response.text().await?;
        Document::parse(&body).map_err(|source| FetchError::Document {
            url: url.to_string(),
            source,
        })
    }
}

/// Mock document fetcher (testing)
///
/// Maps absolute URLs to canned XML bodies or injected failures, and
/// counts how often each URL was requested.
pub struct MockDocumentFetcher {
    base_url: Url,
    responses: Arc<Mutex<HashMap<String, Result<String, String>>>>,
    request_counts: Arc<Mutex<HashMap<String, usize>>>,
}

impl MockDocumentFetcher {
    /// Create a mock fetcher rooted at the given server URL
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: Url::parse(base_url).expect("valid mock base url"),
            responses: Arc::new(Mutex::new(HashMap::new())),
            request_counts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Add a canned XML body for a URL
    pub async fn with_document(self, url: &str, xml: &str) -> Self {
        self.responses
            .lock()
            .await
            .insert(url.to_string(), Ok(xml.to_string()));
        self
    }

    /// Make a URL fail with the given message
    pub async fn with_failure(self, url: &str, message: &str) -> Self {
        self.responses
            .lock()
            .await
            .insert(url.to_string(), Err(message.to_string()));
        self
    }

    /// How often the given URL was fetched
    pub async fn request_count(&self, url: &str) -> usize {
        self.request_counts
            .lock()
            .await
            .get(url)
            .copied()
            .unwrap_or(0)
    }

    async fn record(&self, url: &Url) {
        *self
            .request_counts
            .lock()
            .await
            .entry(url.to_string())
            .or_insert(0) += 1;
    }

    async fn lookup(&self, url: &Url) -> Option<Result<String, String>> {
        self.responses.lock().await.get(url.as_str()).cloned()
    }
}

impl DocumentFetcher for MockDocumentFetcher {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn fetch(&self, url: &Url) -> Result<Document, FetchError> {
        self.record(url).await;

        match self.lookup(url).await {
            Some(Ok(body)) => {
                Document::parse(&body).map_err(|source| FetchError::Document {
                    url: url.to_string(),
                    source,
                })
            }
            Some(Err(_)) => Err(FetchError::Status {
                status: 500,
                url: url.to_string(),
            }),
            None => Err(FetchError::Status {
                status: 404,
                url: url.to_string(),
            }),
        }
    }

    async fn fetch_or_empty(&self, url: &Url) -> Result<Document, FetchError> {
        self.record(url).await;

        match self.lookup(url).await {
            Some(Ok(body)) => {
                Document::parse(&body).map_err(|source| FetchError::Document {
                    url: url.to_string(),
                    source,
                })
            }
            // Failure or no mapping both model a non-success status
            Some(Err(_)) | None => Ok(Document::empty_manifest()),
        }
    }
}

#[cfg(test)]
mod tests {
    include!("fetcher.test.rs");
}
