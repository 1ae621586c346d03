//! Shared HTTP plumbing for upstream services.

use std::sync::Arc;
use std::time::Duration;

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error, warn};
use url::Url;

use super::ApiError;

/// Exponential backoff for transient failures.
///
/// Attempt `n` (zero-based) waits `min(base_delay * 2^n, max_delay)` before
/// retrying. Only GET requests are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (zero-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// HTTP client bound to one upstream base URL.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("retry", &self.inner.retry)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: parsed.as_str().trim_end_matches('/').to_string(),
                retry,
            }),
        })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Absolute URL for `path` (which starts with `/`).
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// GET `path` and return the response body, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns the last error once retries are exhausted, or the first
    /// non-transient error.
    pub async fn get_text(
        &self,
        path: &str,
        bearer: Option<&SecretString>,
    ) -> Result<String, ApiError> {
        let url = self.url(path);
        let retry = self.inner.retry;
        let mut attempt = 0;

        loop {
            let mut request = self.inner.client.get(&url);
            if let Some(token) = bearer {
                request = request.bearer_auth(token.expose_secret());
            }

            match self.send(request).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt < retry.max_retries => {
                    let delay = retry.delay_for(attempt);
                    attempt += 1;
                    warn!(
                        url = %url,
                        attempt,
                        delay = ?delay,
                        error = %e,
                        "Upstream request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if !matches!(e, ApiError::Status(status) if status.is_client_error()) {
                        error!(url = %url, attempts = attempt + 1, error = %e, "Upstream request failed");
                    }
                    return Err(e);
                }
            }
        }
    }

    /// GET `path` and decode the JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_text`]; also fails if the body is not valid
    /// JSON for `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.get_text(path, None).await?;
        parse_json(&body)
    }

    /// POST `body` as JSON to `path` and decode the JSON response.
    ///
    /// Not retried.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or an
    /// undecodable response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self.inner.client.post(&url).json(body);
        let text = self.send(request).await.inspect_err(|e| {
            warn!(url = %url, error = %e, "Upstream POST failed");
        })?;
        parse_json(&text)
    }

    /// Send one request and return its body if the status is a success.
    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await.map_err(from_reqwest)?;
        let status = response.status();
        let body = response.text().await.map_err(from_reqwest)?;

        if !status.is_success() {
            debug!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "Upstream returned non-success status"
            );
            return Err(ApiError::Status(status));
        }

        Ok(body)
    }
}

fn from_reqwest(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Http(e)
    }
}

/// Decode a JSON response body, logging the body on failure.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        error!(
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse upstream response"
        );
        ApiError::Parse(e)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use axum::{Router, http::StatusCode, routing::get};

    use super::*;

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Upstream that fails with 503 `failures` times, then succeeds.
    async fn flaky_upstream(failures: u32) -> (String, Arc<AtomicU32>) {
        let hits = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&hits);
        let router = Router::new().route(
            "/flaky",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    if n < failures {
                        (StatusCode::SERVICE_UNAVAILABLE, "down".to_string())
                    } else {
                        (StatusCode::OK, "[1,2,3]".to_string())
                    }
                }
            }),
        );
        (serve(router).await, hits)
    }

    #[test]
    fn test_delay_for_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(4), Duration::from_millis(16000));
        assert_eq!(policy.delay_for(5), Duration::from_secs(30));
        assert_eq!(policy.delay_for(40), Duration::from_secs(30));
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let result = ApiClient::new("not a url", Duration::from_secs(1), RetryPolicy::none());
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_url_keeps_base_path() {
        let client = ApiClient::new(
            "https://viacep.com.br/ws/",
            Duration::from_secs(1),
            RetryPolicy::none(),
        )
        .unwrap();
        assert_eq!(client.base_url(), "https://viacep.com.br/ws");
        assert_eq!(
            client.url("/01310100/json/"),
            "https://viacep.com.br/ws/01310100/json/"
        );
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let (base, hits) = flaky_upstream(2).await;
        let client = ApiClient::new(&base, Duration::from_secs(5), fast_retry()).unwrap();

        let numbers: Vec<i32> = client.get_json("/flaky").await.unwrap();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let (base, hits) = flaky_upstream(10).await;
        let client = ApiClient::new(&base, Duration::from_secs(5), fast_retry()).unwrap();

        let err = client.get_text("/flaky", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Status(s) if s == StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(hits.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let base = serve(Router::new()).await;
        let client = ApiClient::new(&base, Duration::from_secs(5), fast_retry()).unwrap();

        let err = client.get_text("/missing", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Status(s) if s == StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_timeout_maps_to_timeout_error() {
        let router = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                "late"
            }),
        );
        let base = serve(router).await;
        let client =
            ApiClient::new(&base, Duration::from_millis(50), RetryPolicy::none()).unwrap();

        let err = client.get_text("/slow", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Timeout));
    }

    #[tokio::test]
    async fn test_sends_bearer_token() {
        let router = Router::new().route(
            "/whoami",
            get(|headers: axum::http::HeaderMap| async move {
                headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string()
            }),
        );
        let base = serve(router).await;
        let client = ApiClient::new(&base, Duration::from_secs(5), RetryPolicy::none()).unwrap();

        let token = SecretString::from("abc123");
        let body = client.get_text("/whoami", Some(&token)).await.unwrap();
        assert_eq!(body, "Bearer abc123");
    }
}
