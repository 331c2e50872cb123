use reqwest::{Client, Response, Url};
use thiserror::Error;
use tracing::debug;

/// Networking errors for CI server communication
#[derive(Debug, Error)]
pub enum NetworkingError {
    #[error("HTTP request failed: {source}")]
    RequestFailed {
        #[from]
        source: reqwest::Error,
    },

    #[error("Invalid server URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// HTTP client configuration for one crawl
#[derive(Debug, Clone)]
pub struct NetworkingConfig {
    /// Root URL of the CI server's REST API
    pub base_url: String,
    /// Optional basic-auth credentials
    pub username: Option<String>,
    pub password: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for NetworkingConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: None,
            password: None,
            timeout_seconds: 30,
        }
    }
}

/// Networking manager for the crawl.
///
/// Owns the single shared `reqwest::Client`; its connection pool is safe
/// for concurrent use, so every in-flight fetch of the crawl goes through
/// this one instance. No concurrency cap is imposed here: fan-out is
/// bounded only by the size of the crawled hierarchy.
pub struct NetworkingManager {
    client: Client,
    base_url: Url,
    username: Option<String>,
    password: Option<String>,
}

impl NetworkingManager {
    /// Build the shared HTTP client from config
    pub fn new(config: NetworkingConfig) -> Result<Self, NetworkingError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| NetworkingError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url,
            username: config.username,
            password: config.password,
        })
    }

    /// Root URL of the crawled server
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue one GET, applying basic auth when credentials are configured.
    /// Status handling is left to the caller.
    pub async fn get(&self, url: &Url) -> Result<Response, NetworkingError> {
        debug!("GET {}", url);

        let mut request = self.client.get(url.clone());
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }

        Ok(request.send().await?)
    }

    /// Get HTTP client for manual requests
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
