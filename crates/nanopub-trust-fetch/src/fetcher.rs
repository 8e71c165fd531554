//! Transport abstraction for fetching raw publication bytes.
//!
//! The retriever only needs "bytes of this media type at this URL".
//! Per-request deadlines are the fetcher's concern; a timed-out request is
//! just another failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use url::Url;

use crate::error::{FetchError, Result};

/// Fetches the raw bytes stored at a URL.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url`, asking for content of media type `accept`.
    async fn fetch(&self, url: &str, accept: &str) -> Result<Vec<u8>>;
}

/// Configuration for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Deadline for a single request.
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            user_agent: concat!("nanopub-trust/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Fetcher for `http`, `https` and `file` URLs.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    async fn fetch_http(&self, url: Url, accept: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(body.to_vec())
    }

    async fn fetch_file(&self, url: Url) -> Result<Vec<u8>> {
        let path = url
            .to_file_path()
            .map_err(|_| FetchError::Transport(format!("not a local file URL: {}", url)))?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| FetchError::Transport(format!("{}: {}", path.display(), e)))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, accept: &str) -> Result<Vec<u8>> {
        let parsed =
            Url::parse(url).map_err(|e| FetchError::Transport(format!("{}: {}", url, e)))?;
        match parsed.scheme() {
            "http" | "https" => self.fetch_http(parsed, accept).await,
            "file" => self.fetch_file(parsed).await,
            other => Err(FetchError::Transport(format!("unsupported scheme: {}", other))),
        }
    }
}

/// A scripted in-memory fetcher for testing.
///
/// Every URL without a script answers 404. All attempts are recorded.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    /// A scripted answer.
    #[derive(Debug, Clone)]
    pub enum Scripted {
        Body(Vec<u8>),
        Status(u16),
        Transport(String),
    }

    #[derive(Debug, Default)]
    pub struct MemoryFetcher {
        responses: HashMap<String, Scripted>,
        attempts: Mutex<Vec<String>>,
        accepted: Mutex<Vec<String>>,
    }

    impl MemoryFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer `url` with `body`.
        pub fn with_body(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
            self.responses.insert(url.into(), Scripted::Body(body.into()));
            self
        }

        /// Answer `url` with an HTTP status.
        pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
            self.responses.insert(url.into(), Scripted::Status(status));
            self
        }

        /// Fail `url` at the transport level.
        pub fn with_transport_error(mut self, url: impl Into<String>, msg: impl Into<String>) -> Self {
            self.responses.insert(url.into(), Scripted::Transport(msg.into()));
            self
        }

        /// URLs fetched so far, in order.
        pub async fn attempts(&self) -> Vec<String> {
            self.attempts.lock().await.clone()
        }

        /// Media types requested so far, in attempt order.
        pub async fn accepted(&self) -> Vec<String> {
            self.accepted.lock().await.clone()
        }
    }

    #[async_trait]
    impl Fetcher for MemoryFetcher {
        async fn fetch(&self, url: &str, accept: &str) -> Result<Vec<u8>> {
            self.attempts.lock().await.push(url.to_string());
            self.accepted.lock().await.push(accept.to_string());
            match self.responses.get(url) {
                Some(Scripted::Body(body)) => Ok(body.clone()),
                Some(Scripted::Status(status)) => Err(FetchError::Status(*status)),
                Some(Scripted::Transport(msg)) => Err(FetchError::Transport(msg.clone())),
                None => Err(FetchError::Status(404)),
            }
        }
    }
}
