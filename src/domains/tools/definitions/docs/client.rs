//! HTTP client for the documentation site, with a TTL cache in front.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument};

use super::index::{DocEntry, parse_index};
use crate::core::cache::{Cache, TtlCache};
use crate::core::config::DocsConfig;

/// Errors raised while fetching documentation.
#[derive(Debug, Error)]
pub enum DocsError {
    /// The requested path cannot be resolved against the base URL.
    #[error("Invalid documentation path: {0}")]
    InvalidPath(String),

    /// The HTTP request failed or returned a non-success status.
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Fetches documentation pages relative to a base URL.
///
/// Page bodies are cached by absolute URL for the configured TTL.
pub struct DocsClient {
    http: reqwest::Client,
    base_url: String,
    index_path: String,
    cache: Arc<dyn Cache<String>>,
}

impl DocsClient {
    /// Create a client using an existing cache.
    pub fn new(config: &DocsConfig, cache: Arc<dyn Cache<String>>) -> Result<Self, DocsError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            index_path: config.index_path.clone(),
            cache,
        })
    }

    /// Create a client with its own TTL cache sized from `config`.
    pub fn from_config(config: &DocsConfig) -> Result<Self, DocsError> {
        Self::new(config, Arc::new(TtlCache::new(config.cache_ttl())))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a documentation path to an absolute URL under the base URL.
    pub fn page_url(&self, path: &str) -> Result<String, DocsError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(DocsError::InvalidPath("path must not be empty".to_string()));
        }

        if let Some(rest) = path.strip_prefix(&self.base_url) {
            if rest.is_empty() || rest.starts_with('/') {
                return Ok(path.to_string());
            }
        }
        if path.contains("://") {
            return Err(DocsError::InvalidPath(format!(
                "'{}' is not under {}",
                path, self.base_url
            )));
        }

        Ok(format!("{}/{}", self.base_url, path.trim_start_matches('/')))
    }

    /// Fetch a page body, serving from cache while fresh.
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, path: &str) -> Result<String, DocsError> {
        let url = self.page_url(path)?;

        if let Some(body) = self.cache.get(&url) {
            debug!("Cache hit for {}", url);
            return Ok(body);
        }

        info!("Fetching {}", url);
        let body = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| DocsError::Request {
                url: url.clone(),
                source,
            })?
            .text()
            .await
            .map_err(|source| DocsError::Request {
                url: url.clone(),
                source,
            })?;

        self.cache.set(url, body.clone());
        Ok(body)
    }

    /// Fetch and parse the documentation index.
    pub async fn fetch_index(&self) -> Result<Vec<DocEntry>, DocsError> {
        let body = self.fetch_page(&self.index_path).await?;
        let entries = parse_index(&body, &self.base_url);
        debug!("Index lists {} pages", entries.len());
        Ok(entries)
    }
}
