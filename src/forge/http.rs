//! forge::http
//!
//! Authenticated JSON client shared by the GitHub and GitLab hosts.
//!
//! # Design
//!
//! Each host builds one [`ApiClient`] with its own auth headers and base URL.
//! The client maps every non-2xx response to [`ForgeError::NotFound`] (404) or
//! [`ForgeError::ApiError`] carrying the raw response body, and every transport
//! failure to [`ForgeError::NetworkError`]. It never retries.
//!
//! Endpoint paths are built segment by segment so tag names and GitLab
//! project paths are percent-encoded exactly once.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::traits::ForgeError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User-Agent header value for API requests.
pub(crate) const USER_AGENT_VALUE: &str = concat!("releasekit/", env!("CARGO_PKG_VERSION"));

/// Map a failed send to `NetworkError`, keeping the underlying cause.
///
/// `reqwest` leaves the cause (refused connection, DNS failure) out of its
/// own message, so the source chain is appended.
fn transport_error(error: reqwest::Error) -> ForgeError {
    let mut message = if error.is_timeout() {
        format!("request timed out: {}", error)
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    };

    let mut source = std::error::Error::source(&error);
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.ends_with(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = std::error::Error::source(cause);
    }
    ForgeError::NetworkError(message)
}

/// JSON-over-HTTP client bound to one API base URL.
pub(crate) struct ApiClient {
    client: Client,
    base: Url,
}

// Custom Debug so auth headers never end up in logs
impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .finish()
    }
}

impl ApiClient {
    /// Create a client sending `headers` with every request.
    ///
    /// # Errors
    ///
    /// - `InvalidUrl` if `base` is not an absolute http(s) URL
    /// - `NetworkError` if the HTTP client cannot be constructed
    pub(crate) fn new(
        base: &str,
        headers: HeaderMap,
        timeout: Duration,
    ) -> Result<Self, ForgeError> {
        let base = Url::parse(base.trim_end_matches('/'))
            .map_err(|e| ForgeError::InvalidUrl(format!("{}: {}", base, e)))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ForgeError::InvalidUrl(base.to_string()));
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        Ok(Self { client, base })
    }

    /// Build an endpoint URL by appending path segments to the base URL.
    ///
    /// Each segment is percent-encoded, so a segment may itself contain `/`.
    pub(crate) fn url<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url, ForgeError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ForgeError::InvalidUrl(self.base.to_string()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment.as_ref());
            }
        }
        Ok(url)
    }

    /// GET `url` with `query` parameters and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, ForgeError> {
        debug!(method = "GET", %url, "sending request");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;

        Self::handle_response(response).await
    }

    /// GET `url` and report whether the resource exists.
    ///
    /// 2xx means it exists, 404 means it does not; anything else is an error.
    pub(crate) async fn exists(&self, url: Url) -> Result<bool, ForgeError> {
        debug!(method = "GET", %url, "checking existence");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    /// POST `body` as JSON to `url` and decode the JSON response.
    pub(crate) async fn post<B, T>(&self, url: Url, body: &B) -> Result<T, ForgeError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(method = "POST", %url, "sending request");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        Self::handle_response(response).await
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, ForgeError> {
        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| ForgeError::Decode(e.to_string()))
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    /// Turn a non-2xx response into an error carrying status and body.
    async fn error_from_response(response: Response) -> ForgeError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), %body, "API returned an error");

        if status == reqwest::StatusCode::NOT_FOUND {
            ForgeError::NotFound(body)
        } else {
            ForgeError::ApiError {
                status: status.as_u16(),
                message: body,
            }
        }
    }
}

/// Build a header value from a secret, marking it sensitive.
pub(crate) fn secret_header(token: &str) -> Result<HeaderValue, ForgeError> {
    if token.is_empty() {
        return Err(ForgeError::AuthRequired);
    }
    let mut value = HeaderValue::from_str(token)
        .map_err(|_| ForgeError::InvalidToken("token contains invalid characters".into()))?;
    value.set_sensitive(true);
    Ok(value)
}
