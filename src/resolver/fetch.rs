use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use thiserror::Error;

use super::locator::Marker;
use super::rate_limit::RateLimiter;

/// Why a single lookup produced nothing. Always recovered inside the
/// resolver by substituting a placeholder.
#[derive(Debug, Error)]
pub enum LookupFailure {
    #[error("invalid URL {0}")]
    InvalidUrl(String),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("{0:?} not found in document")]
    MarkerMissing(Marker),
}

impl From<reqwest::Error> for LookupFailure {
    fn from(err: reqwest::Error) -> Self {
        LookupFailure::Transport(err.to_string())
    }
}

/// Retrieves a document body by URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, LookupFailure>;
}

/// `reqwest`-backed fetcher. Every request waits on the shared
/// [`RateLimiter`] for its host and is bounded by the client timeout.
pub struct HttpFetcher {
    client: Client,
    limiter: Arc<dyn RateLimiter>,
}

impl HttpFetcher {
    pub fn new(
        timeout: Duration,
        user_agent: &str,
        limiter: Arc<dyn RateLimiter>,
    ) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, limiter })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, LookupFailure> {
        let host = host_of(url)?;
        self.limiter.acquire(&host).await;

        tracing::debug!(url, "GET");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(LookupFailure::Status(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }
}

fn host_of(url: &str) -> Result<String, LookupFailure> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .ok_or_else(|| LookupFailure::InvalidUrl(url.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::resolver::rate_limit::IntervalGate;

    /// Limiter that lets every request through and remembers the hosts.
    #[derive(Default)]
    struct RecordingLimiter {
        hosts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RateLimiter for RecordingLimiter {
        async fn acquire(&self, host: &str) {
            self.hosts.lock().unwrap().push(host.to_string());
        }
    }

    #[test]
    fn test_host_of() {
        assert_eq!(
            host_of("https://pkg.go.dev/golang.org/x/text@v0.14.0?tab=licenses").unwrap(),
            "pkg.go.dev"
        );
        assert_eq!(
            host_of("https://raw.githubusercontent.com/a/b/refs/heads/main/LICENSE").unwrap(),
            "raw.githubusercontent.com"
        );
        assert!(matches!(
            host_of("not a url"),
            Err(LookupFailure::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_http_fetcher_creation() {
        let limiter = Arc::new(IntervalGate::new(Duration::from_millis(500)));
        let fetcher = HttpFetcher::new(Duration::from_secs(20), "oss-list/test", limiter);
        assert!(fetcher.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url_fails_without_request() {
        let limiter = Arc::new(IntervalGate::new(Duration::ZERO));
        let fetcher = HttpFetcher::new(Duration::from_secs(1), "oss-list/test", limiter).unwrap();
        let err = fetcher.fetch("::::").await.unwrap_err();
        assert!(matches!(err, LookupFailure::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_fetch_acquires_host_before_request() {
        let limiter = Arc::new(RecordingLimiter::default());
        let fetcher = HttpFetcher::new(Duration::from_secs(2), "oss-list/test", limiter.clone()).unwrap();

        // Nothing listens on port 1, so the request fails at the transport layer.
        let err = fetcher.fetch("http://127.0.0.1:1/x").await.unwrap_err();
        assert!(matches!(err, LookupFailure::Transport(_)));
        assert_eq!(*limiter.hosts.lock().unwrap(), vec!["127.0.0.1".to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_url_skips_limiter() {
        let limiter = Arc::new(RecordingLimiter::default());
        let fetcher = HttpFetcher::new(Duration::from_secs(1), "oss-list/test", limiter.clone()).unwrap();
        assert!(fetcher.fetch("::::").await.is_err());
        assert!(limiter.hosts.lock().unwrap().is_empty());
    }
}
