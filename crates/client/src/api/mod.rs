//! Typed HTTP client for the shop API.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP via `reqwest`; every path is resolved against the
//!   configured base URL
//! - The bearer token is passed per call, never stored on the client, so one
//!   client can serve anonymous and authenticated requests side by side
//! - No retries and no request de-duplication; callers decide what a
//!   failure means for their state
//!
//! # Example
//!
//! ```rust,ignore
//! use sweet_home_client::api::{SweetQuery, SweetsClient};
//!
//! let client = SweetsClient::new(&config)?;
//! let login = client.login("a@b.co", &password).await?;
//! let sweets = client.list_sweets(&SweetQuery::default(), None).await?;
//! ```

mod auth;
mod sweets;
pub mod types;

pub use auth::admin_signup_message;
pub use sweets::MAX_SCAN_PAGES;
pub use types::*;

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::ClientConfig;
use crate::token::AuthToken;

/// Longest slice of an error body kept in [`ApiError::Status`].
const MAX_ERROR_BODY: usize = 200;

/// Errors that can occur when talking to the shop API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a usable response (connect, timeout, decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server refused the request with a machine-readable reason.
    #[error("Rejected ({status}): {code}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Parsed `error` field of the response body.
        code: RejectionCode,
    },

    /// The server answered with a non-success status and no known reason.
    #[error("Unexpected status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Start of the response body, for logs.
        message: String,
    },

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Whether the server could not be reached at all.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_connect() || e.is_timeout() || e.is_request())
    }

    /// HTTP status of the failure, if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Http(_) | Self::Url(_) => None,
        }
    }

    /// Whether the server answered with a 4xx status.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }
}

/// Reason codes the API puts in the `error` field of 4xx bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionCode {
    /// The email is already registered.
    UserExists,
    /// No valid credential was sent.
    Unauthorized,
    /// The credential lacks the required role.
    Forbidden,
    /// Any other code, kept verbatim.
    Other(String),
}

impl RejectionCode {
    fn parse(code: &str) -> Self {
        match code {
            "user_exists" => Self::UserExists,
            "unauthorized" => Self::Unauthorized,
            "forbidden" => Self::Forbidden,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for RejectionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserExists => f.write_str("user_exists"),
            Self::Unauthorized => f.write_str("unauthorized"),
            Self::Forbidden => f.write_str("forbidden"),
            Self::Other(code) => f.write_str(code),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Client for the shop API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct SweetsClient {
    inner: Arc<SweetsClientInner>,
}

struct SweetsClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for SweetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweetsClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SweetsClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            "sweet-home-client/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(SweetsClientInner {
                client: builder.build()?,
                base_url: config.api_base_url.clone(),
            }),
        })
    }

    /// The base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve a relative API path (no leading slash) against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    /// URL of one item under `collection`, with `id` percent-encoded as a
    /// single path segment.
    fn item_endpoint(&self, collection: &str, id: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&format!("{collection}/"))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn request(
        &self,
        method: reqwest::Method,
        url: Url,
        bearer: Option<&AuthToken>,
    ) -> reqwest::RequestBuilder {
        let request = self.inner.client.request(method, url);
        match bearer {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        }
    }

    /// Turn a non-success response into an `ApiError`.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(error_from_body(status.as_u16(), &text))
    }
}

fn error_from_body(status: u16, body: &str) -> ApiError {
    if let Ok(ErrorBody { error: Some(code) }) = serde_json::from_str::<ErrorBody>(body) {
        return ApiError::Rejected {
            status,
            code: RejectionCode::parse(&code),
        };
    }

    let message: String = body.chars().take(MAX_ERROR_BODY).collect();
    ApiError::Status { status, message }
}
