//! Shared HTTP transport for provider and registry clients.
//!
//! Every request is a single attempt: the connector never retries on its own.
//! Failures are classified into the transport family of [`AppError`]:
//!
//! | Failure | Error |
//! |---|---|
//! | request timed out | [`AppError::Timeout`] |
//! | connection refused / DNS failure | [`AppError::NetworkError`] |
//! | non-success HTTP status, unreadable body | [`AppError::ClientError`] |
//! | empty body or invalid JSON where JSON is expected | [`AppError::UpstreamFormat`] |

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use rwsync_core::HttpConfig;
use rwsync_core::error::AppError;
use serde::Serialize;
use serde_json::Value;

/// Parses an absolute URL, mapping failures to [`AppError::InvalidUrl`].
pub fn parse_url(url: &str) -> Result<Url, AppError> {
    Url::parse(url).map_err(|e| AppError::InvalidUrl(format!("{}: {}", url, e)))
}

/// Maps a reqwest error into the transport error family.
pub fn classify_error(err: &reqwest::Error, timeout: Duration) -> AppError {
    if err.is_timeout() {
        AppError::Timeout(timeout.as_secs())
    } else if err.is_connect() {
        AppError::NetworkError(format!("Connection failed: {}", err))
    } else {
        AppError::ClientError(err.to_string())
    }
}

/// Parses a JSON response body.
///
/// An empty body or invalid JSON is an upstream format error.
pub fn parse_json_body(body: &str, url: &Url) -> Result<Value, AppError> {
    if body.trim().is_empty() {
        return Err(AppError::UpstreamFormat(format!(
            "empty response body from {}",
            url
        )));
    }
    serde_json::from_str(body)
        .map_err(|e| AppError::UpstreamFormat(format!("invalid JSON from {}: {}", url, e)))
}

/// Configured reqwest client plus an optional bearer token.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
    bearer_token: Option<String>,
}

impl HttpTransport {
    /// Builds a transport from the HTTP configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ClientError` if the HTTP client cannot be built.
    pub fn new(http_config: &HttpConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(http_config.user_agent.as_str())
            .timeout(http_config.timeout)
            .build()
            .map_err(|e| AppError::ClientError(e.to_string()))?;

        Ok(Self {
            client,
            timeout: http_config.timeout,
            bearer_token: None,
        })
    }

    /// Sends `Authorization: Bearer <token>` on every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn has_token(&self) -> bool {
        self.bearer_token.is_some()
    }

    /// GETs a URL and parses the body as JSON.
    pub async fn get_json(&self, url: &Url) -> Result<Value, AppError> {
        let resp = self
            .execute(self.client.request(Method::GET, url.clone()), url)
            .await?;
        let body = resp
            .text()
            .await
            .map_err(|e| classify_error(&e, self.timeout))?;
        parse_json_body(&body, url)
    }

    /// Sends a JSON body with the given method. The response body is ignored.
    pub async fn send_json<B>(&self, method: Method, url: &Url, body: &B) -> Result<(), AppError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(self.client.request(method, url.clone()).json(body), url)
            .await?;
        Ok(())
    }

    async fn execute(&self, request: RequestBuilder, url: &Url) -> Result<Response, AppError> {
        let request = match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let resp = request
            .send()
            .await
            .map_err(|e| classify_error(&e, self.timeout))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), %url, "Request failed");
            return Err(AppError::ClientError(format!(
                "HTTP {} from {}",
                status.as_u16(),
                url
            )));
        }

        Ok(resp)
    }
}
