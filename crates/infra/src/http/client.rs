//! Typed HTTP request executor with a closed failure taxonomy.
//!
//! Every call terminates in an [`ApiResult`]: success values carry the
//! response status, and every failure is classified into one of the
//! [`NetworkError`] kinds. Nothing is propagated as a Rust error to callers.
//!
//! Retry is bounded and restricted to 5xx responses; 4xx and transport
//! failures surface immediately.

use std::sync::Arc;
use std::time::Duration;

use eloquia_domain::{ApiResult, EloquiaError, NetworkError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cookies::PersistentCookieJar;

/// Callback supplying a bearer token, invoked fresh on every attempt.
///
/// Yielding `None` simply omits the `Authorization` header; session state
/// normally travels via cookie instead.
pub type TokenProvider = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Construction-time configuration for [`NetworkClient`].
///
/// Timeouts and the retry policy are fixed here; there is no per-call
/// override.
#[derive(Debug, Clone)]
pub struct NetworkClientConfig {
    /// Base URL prefixed to every request path
    pub base_url: String,
    /// Whole-request timeout
    pub request_timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// Socket read timeout
    pub read_timeout: Duration,
    /// Total number of attempts (initial try + retries on 5xx)
    pub max_attempts: usize,
    /// Base delay for exponential backoff between retries
    pub base_backoff: Duration,
    /// Emit per-request/response debug lines (observability only)
    pub enable_logging: bool,
}

impl Default for NetworkClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            enable_logging: false,
        }
    }
}

/// HTTP client issuing typed requests against a fixed base URL.
#[derive(Clone)]
pub struct NetworkClient {
    client: ReqwestClient,
    base_url: String,
    token_provider: Option<TokenProvider>,
    max_attempts: usize,
    base_backoff: Duration,
    enable_logging: bool,
    cancellation: CancellationToken,
}

impl NetworkClient {
    /// Start building a new network client.
    pub fn builder(base_url: impl Into<String>) -> NetworkClientBuilder {
        NetworkClientBuilder::new(base_url)
    }

    /// Token that cooperatively cancels in-flight requests on this client.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Execute a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(Method::GET, path, &[], &[], None::<&()>).await
    }

    /// Execute a GET request with query parameters.
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        self.request(Method::GET, path, &[], query, None::<&()>).await
    }

    /// Execute a POST request with a JSON body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, &[], &[], Some(body)).await
    }

    /// Execute a POST request without a body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(Method::POST, path, &[], &[], None::<&()>).await
    }

    /// Execute a request, classifying every outcome into an [`ApiResult`].
    ///
    /// This is the one funnel all typed calls go through. It never returns a
    /// Rust `Err` to its caller: timeouts, connectivity failures, decode
    /// mismatches, cancellation, and anything else all come back as
    /// [`NetworkError`] values.
    pub async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        // Serialize once so every retry attempt sends the same payload.
        let body = match body {
            Some(body) => match serde_json::to_value(body) {
                Ok(value) => Some(value),
                Err(err) => {
                    return ApiResult::err(NetworkError::Decode(format!(
                        "failed to serialize request body: {err}"
                    )));
                }
            },
            None => None,
        };

        let attempts = self.max_attempts.max(1);

        for attempt in 0..attempts {
            let mut request = self.client.request(method.clone(), &url);

            if !query.is_empty() {
                request = request.query(query);
            }
            for (name, value) in headers {
                request = request.header(*name, *value);
            }
            if let Some(provider) = &self.token_provider {
                if let Some(token) = provider() {
                    request = request.bearer_auth(token);
                }
            }
            if let Some(json) = &body {
                request = request.json(json);
            }

            if self.enable_logging {
                debug!(attempt = attempt + 1, %method, %url, "sending request");
            }

            let outcome = tokio::select! {
                () = self.cancellation.cancelled() => {
                    return ApiResult::err(NetworkError::Cancelled);
                }
                outcome = request.send() => outcome,
            };

            match outcome {
                Ok(response) => {
                    let status = response.status();

                    if self.enable_logging {
                        debug!(attempt = attempt + 1, %method, %url, %status, "received response");
                    }

                    if status.is_server_error() && attempt + 1 < attempts {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    return read_response(response).await;
                }
                // Transport failures never participate in the retry loop;
                // only 5xx responses do.
                Err(err) => return ApiResult::err(classify_transport_error(&err)),
            }
        }

        ApiResult::err(NetworkError::Unknown)
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`NetworkClient`].
pub struct NetworkClientBuilder {
    config: NetworkClientConfig,
    token_provider: Option<TokenProvider>,
    cookie_jar: Option<Arc<PersistentCookieJar>>,
    cancellation: Option<CancellationToken>,
}

impl NetworkClientBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: NetworkClientConfig { base_url: base_url.into(), ..Default::default() },
            token_provider: None,
            cookie_jar: None,
            cancellation: None,
        }
    }

    /// Replace the whole configuration, keeping the base URL already set.
    pub fn config(mut self, config: NetworkClientConfig) -> Self {
        let base_url = std::mem::take(&mut self.config.base_url);
        self.config = config;
        if self.config.base_url.is_empty() {
            self.config.base_url = base_url;
        }
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.config.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.config.base_backoff = backoff;
        self
    }

    pub fn enable_logging(mut self, enabled: bool) -> Self {
        self.config.enable_logging = enabled;
        self
    }

    /// Install the bearer token hook, invoked fresh on every attempt.
    pub fn token_provider(mut self, provider: TokenProvider) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Install the persistent cookie jar as the client's cookie provider.
    pub fn cookie_jar(mut self, jar: Arc<PersistentCookieJar>) -> Self {
        self.cookie_jar = Some(jar);
        self
    }

    /// Use an externally owned cancellation token.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns `EloquiaError::Config` if the underlying HTTP client cannot
    /// be constructed. An absent token provider is not an error.
    pub fn build(self) -> Result<NetworkClient, EloquiaError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = ReqwestClient::builder()
            .timeout(self.config.request_timeout)
            .connect_timeout(self.config.connect_timeout)
            .read_timeout(self.config.read_timeout)
            .default_headers(headers);

        if let Some(jar) = self.cookie_jar {
            builder = builder.cookie_provider(jar);
        }

        let client = builder
            .build()
            .map_err(|err| EloquiaError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(NetworkClient {
            client,
            base_url: self.config.base_url,
            token_provider: self.token_provider,
            max_attempts: self.config.max_attempts.max(1),
            base_backoff: self.config.base_backoff,
            enable_logging: self.config.enable_logging,
            cancellation: self.cancellation.unwrap_or_default(),
        })
    }
}

async fn read_response<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    let status_code = status.as_u16();

    if status.is_success() {
        // These status codes have no body by RFC spec; decode from JSON null
        // so unit and optional targets succeed without a body read.
        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            return match serde_json::from_value(Value::Null) {
                Ok(value) => ApiResult::Ok { value, status: status_code },
                Err(err) => ApiResult::err(NetworkError::Decode(err.to_string())),
            };
        }

        match response.json::<T>().await {
            Ok(value) => ApiResult::Ok { value, status: status_code },
            Err(err) => ApiResult::err(classify_transport_error(&err)),
        }
    } else {
        // Best effort: a failed body read on the error path is swallowed.
        let body = response.text().await.ok();
        ApiResult::err(NetworkError::Http { status: status_code, body })
    }
}

fn classify_transport_error(err: &reqwest::Error) -> NetworkError {
    if err.is_timeout() {
        NetworkError::Timeout
    } else if err.is_decode() {
        NetworkError::Decode(err.to_string())
    } else if err.is_connect() || err.is_request() || err.is_body() {
        NetworkError::Offline
    } else {
        NetworkError::Unknown
    }
}
