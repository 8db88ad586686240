//! Auth enforcement executor
//!
//! Carries an `Enforce` decision out against the configured auth endpoint:
//! one sub-request per enforced evaluation, the status code is the sole
//! signal consumed. Any 2xx allows the request through to the upstream;
//! anything else, including an unreachable or timed-out auth service,
//! denies it (fail-closed). No retries.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HOST};
use http::{Method, StatusCode};
use metrics::counter;
use reqwest::Client;
use tracing::{debug, warn};

use crate::auth::evaluator::AuthDecision;
use crate::errors::{AuthGateError, Result};

/// Header carrying the original request URL on the auth sub-request.
pub const X_ORIGINAL_URL: &str = "x-original-url";

/// Header carrying the original request method on the auth sub-request.
pub const X_ORIGINAL_METHOD: &str = "x-original-method";

const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(5);

/// The caller-supplied request, as seen by the gate.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub method: Method,
    pub host: String,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl GatewayRequest {
    /// Convenience constructor for a bodyless GET.
    pub fn get<H: Into<String>, P: Into<String>>(host: H, path: P) -> Self {
        Self {
            method: Method::GET,
            host: host.into(),
            path: path.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Original URL as presented to the auth service.
    pub fn original_url(&self) -> String {
        format!("http://{}{}", self.host, self.path)
    }
}

/// The response returned to the caller.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl GatewayResponse {
    /// A terminal denial response with an empty body.
    pub fn denied(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }
}

/// Outcome of invoking the auth endpoint for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthVerdict {
    /// 2xx from the auth service; carries the allow-listed response headers
    Allow { headers: HeaderMap },
    /// Non-2xx, unreachable or timed out; status is surfaced to the caller
    Deny { status: StatusCode },
}

impl AuthVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthVerdict::Allow { .. })
    }
}

/// Destination a permitted request is forwarded to.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn forward(&self, request: GatewayRequest) -> Result<GatewayResponse>;
}

/// HTTP upstream forwarding via a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
    base_url: String,
}

impl HttpUpstream {
    /// Forwarder for one upstream service base URL.
    pub fn new<S: Into<String>>(client: Client, base_url: S) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn forward(&self, request: GatewayRequest) -> Result<GatewayResponse> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), request.path);
        let response = self
            .client
            .request(request.method.clone(), &url)
            .headers(request.headers.clone())
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| AuthGateError::upstream(format!("forwarding to {}", url), e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| AuthGateError::upstream(format!("reading body from {}", url), e))?;

        Ok(GatewayResponse {
            status,
            headers,
            body,
        })
    }
}

/// Executes `Enforce` decisions: one bounded auth sub-request, then either
/// forward or short-circuit.
#[derive(Debug, Clone)]
pub struct Enforcer {
    client: Client,
    timeout: Duration,
    allowed_response_headers: Vec<HeaderName>,
}

impl Enforcer {
    /// Build an enforcer with the default timeout and no header pass-through.
    ///
    /// Fails only if the underlying HTTP client cannot be constructed (TLS
    /// backend initialization).
    pub fn new() -> Result<Self> {
        // The verdict is the status code itself; a redirecting auth service
        // must surface as non-2xx, not be followed.
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AuthGateError::internal(format!("Failed to build auth client: {}", e)))?;
        Ok(Self {
            client,
            timeout: DEFAULT_AUTH_TIMEOUT,
            allowed_response_headers: Vec::new(),
        })
    }

    /// Bound the auth sub-request. An unbounded hang would defeat the
    /// fail-closed guarantee, so a timeout is always in force.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Auth-service response headers passed through to the upstream request
    /// on allow. Empty by default.
    pub fn with_allowed_response_headers(mut self, headers: Vec<HeaderName>) -> Self {
        self.allowed_response_headers = headers;
        self
    }

    /// Issue the auth sub-request and map its result to a verdict.
    ///
    /// The sub-request is always a GET; the caller's method travels in
    /// `X-Original-Method` so an auth endpoint serving only GET never
    /// spuriously denies a POST caller.
    pub async fn check(&self, auth_url: &str, original: &GatewayRequest) -> AuthVerdict {
        let result = self
            .client
            .get(auth_url)
            .header(X_ORIGINAL_URL, original.original_url())
            .header(X_ORIGINAL_METHOD, original.method.as_str())
            .header(HOST, original.host.as_str())
            .timeout(self.timeout)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                let mut headers = HeaderMap::new();
                for name in &self.allowed_response_headers {
                    for value in response.headers().get_all(name) {
                        headers.append(name.clone(), value.clone());
                    }
                }
                debug!(auth_url, status = %response.status(), "Auth service allowed request");
                counter!("authgate_auth_verdicts_total", "verdict" => "allow").increment(1);
                AuthVerdict::Allow { headers }
            }
            Ok(response) => {
                let status = response.status();
                debug!(auth_url, %status, "Auth service denied request");
                counter!("authgate_auth_verdicts_total", "verdict" => "deny").increment(1);
                AuthVerdict::Deny { status }
            }
            Err(error) => {
                // Unreachable or timed out: deny rather than letting traffic
                // through past a broken auth dependency.
                warn!(auth_url, %error, "Auth sub-request failed; denying");
                counter!("authgate_auth_verdicts_total", "verdict" => "deny_unreachable")
                    .increment(1);
                AuthVerdict::Deny {
                    status: StatusCode::UNAUTHORIZED,
                }
            }
        }
    }

    /// Apply a decision to a request: forward on `Skip`, run the auth
    /// sub-request on `Enforce` and either forward (with allow-listed auth
    /// headers attached) or return the denial to the caller.
    pub async fn enforce(
        &self,
        decision: AuthDecision,
        mut request: GatewayRequest,
        upstream: &dyn Upstream,
    ) -> Result<GatewayResponse> {
        let auth_url = match decision {
            AuthDecision::Skip => return upstream.forward(request).await,
            AuthDecision::Enforce(url) => url,
        };

        match self.check(&auth_url, &request).await {
            AuthVerdict::Allow { headers } => {
                for (name, value) in headers.iter() {
                    request.headers.append(name.clone(), value.clone());
                }
                upstream.forward(request).await
            }
            AuthVerdict::Deny { status } => Ok(GatewayResponse::denied(status)),
        }
    }
}
