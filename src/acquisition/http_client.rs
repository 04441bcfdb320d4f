//! Async HTTP client wrapping reqwest.
//!
//! Handles redirects and timeouts, nothing else. There is deliberately no
//! retry and no backoff: each page gets exactly one attempt per run, and a
//! failure is reported to the caller as a value, not smoothed over.

use std::time::Duration;

/// Why a page fetch failed.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// Transport-level failure: DNS, connect, TLS, or timeout.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered, but not with a success status.
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// URL the failed fetch was aimed at.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Request { url, .. } => url,
            FetchError::Status { url, .. } => url,
        }
    }
}

/// HTTP client for the extraction batch.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client with the given user-agent and per-request timeout.
    pub fn new(user_agent: &str, timeout_ms: u64) -> Self {
        let timeout = Duration::from_millis(timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(user_agent)
            .build()
            .unwrap_or_default();

        Self { client, timeout }
    }

    /// GET one page and return its body. Non-2xx statuses are errors; the
    /// caller decides whether the batch survives them.
    pub async fn get(&self, url: &str) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_creation() {
        let client = HttpClient::new("pricewatch-test/1.0", 10000);
        // Just verify it doesn't panic
        let _ = client;
    }

    #[test]
    fn test_status_error_names_url_and_code() {
        let err = FetchError::Status {
            url: "https://example.com/x".to_string(),
            status: 503,
        };
        let rendered = format!("{err}");
        assert!(rendered.contains("https://example.com/x"));
        assert!(rendered.contains("503"));
        assert_eq!(err.url(), "https://example.com/x");
    }
}
