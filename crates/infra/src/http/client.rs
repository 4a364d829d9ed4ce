//! Outbound HTTP shared by the service adapters
//!
//! Every call is checked: a non-2xx reply becomes an error carrying the
//! response body. Transport failures and 5xx replies are replayed while
//! attempts remain, so calendar writes and webhook posts run on a
//! single-attempt client.

use std::time::Duration;

use brief_domain::{BriefError, Result};
use reqwest::{Client, IntoUrl, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::errors::{status_error, InfraError};

const USER_AGENT: &str = concat!("brief/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_ATTEMPTS: u32 = 3;
/// Linear: the n-th retry waits n times this.
const RETRY_STEP: Duration = Duration::from_millis(250);

/// A failed attempt and whether replaying it could help.
struct Failure {
    error: BriefError,
    retryable: bool,
}

/// Checked HTTP client with a fixed attempt budget.
#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: Client,
    attempts: u32,
}

impl HttpClient {
    /// Builder with a 30s timeout and three attempts.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Total attempts per call, including the first.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Start a request on the underlying client.
    pub fn request<U: IntoUrl>(&self, method: Method, url: U) -> RequestBuilder {
        self.inner.request(method, url)
    }

    /// Send `builder` and require a 2xx reply; other statuses map through
    /// [`status_error`].
    pub async fn send_checked(&self, builder: RequestBuilder) -> Result<Response> {
        self.send_checked_with(builder, status_error).await
    }

    /// Send `builder`, mapping a non-2xx status and its body with
    /// `on_status`.
    pub async fn send_checked_with<F>(&self, builder: RequestBuilder, on_status: F) -> Result<Response>
    where
        F: Fn(StatusCode, String) -> BriefError,
    {
        let mut attempt = 1;
        loop {
            let request = builder.try_clone().ok_or_else(|| {
                BriefError::Internal("streaming request bodies cannot be replayed".into())
            })?;

            match self.attempt(request, &on_status).await {
                Ok(response) => return Ok(response),
                Err(failure) if failure.retryable && attempt < self.attempts => {
                    debug!(attempt, error = %failure.error, "retrying HTTP request");
                    tokio::time::sleep(RETRY_STEP * attempt).await;
                    attempt += 1;
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }

    /// [`send_checked`](Self::send_checked) and decode the JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send_checked(builder).await?;
        response.json::<T>().await.map_err(|err| InfraError::from(err).into())
    }

    async fn attempt<F>(&self, request: RequestBuilder, on_status: &F) -> std::result::Result<Response, Failure>
    where
        F: Fn(StatusCode, String) -> BriefError,
    {
        let response = request.send().await.map_err(|err| Failure {
            retryable: err.is_timeout() || err.is_connect(),
            error: InfraError::from(err).into(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().clone();
        let body = response.text().await.unwrap_or_default();
        warn!(%status, %url, "upstream returned error status");
        Err(Failure { error: on_status(status, body), retryable: status.is_server_error() })
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpClientBuilder {
    timeout: Duration,
    attempts: u32,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: DEFAULT_TIMEOUT, attempts: DEFAULT_ATTEMPTS }
    }
}

impl HttpClientBuilder {
    /// Per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts per call; `1` disables replay.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Build the client; fails only if TLS setup fails.
    pub fn build(self) -> Result<HttpClient> {
        let inner = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .no_proxy()
            .build()
            .map_err(InfraError::from)?;

        Ok(HttpClient { inner, attempts: self.attempts })
    }
}
