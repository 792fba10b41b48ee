//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SWEET_HOME_API_BASE_URL` - Base URL of the shop API (default: `http://127.0.0.1:4000/api`)
//! - `SWEET_HOME_SESSION_FILE` - Where a remembered session is stored
//!   (default: `$HOME/.sweet-home/session.json`)
//! - `SWEET_HOME_HTTP_TIMEOUT_SECS` - Per-request timeout in seconds (default: none)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:4000/api";
const SESSION_DIR: &str = ".sweet-home";
const SESSION_FILE: &str = "session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every API path is resolved against
    pub api_base_url: Url,
    /// File holding the remembered session
    pub session_file: PathBuf,
    /// Optional per-request timeout; requests wait indefinitely when unset
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup("SWEET_HOME_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = parse_base_url(&raw_url)
            .map_err(|e| ConfigError::InvalidEnvVar("SWEET_HOME_API_BASE_URL".to_string(), e))?;

        let session_file = lookup("SWEET_HOME_SESSION_FILE").map_or_else(
            || default_session_file(&lookup),
            PathBuf::from,
        );

        let request_timeout = lookup("SWEET_HOME_HTTP_TIMEOUT_SECS")
            .map(|raw| parse_timeout(&raw))
            .transpose()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SWEET_HOME_HTTP_TIMEOUT_SECS".to_string(), e)
            })?;

        Ok(Self {
            api_base_url,
            session_file,
            request_timeout,
        })
    }

    /// Configuration pointing at the given API with defaults elsewhere.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an http(s) URL.
    pub fn for_api(base_url: &str) -> Result<Self, ConfigError> {
        let api_base_url = parse_base_url(base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("api_base_url".to_string(), e))?;
        Ok(Self {
            api_base_url,
            session_file: PathBuf::from(SESSION_DIR).join(SESSION_FILE),
            request_timeout: None,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a base URL and normalise it to end with `/` so relative joins keep
/// the path prefix (`/api` + `auth/login` -> `/api/auth/login`).
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration, String> {
    let secs = raw.trim().parse::<u64>().map_err(|e| e.to_string())?;
    if secs == 0 {
        return Err("must be greater than zero".to_string());
    }
    Ok(Duration::from_secs(secs))
}

fn default_session_file(lookup: &impl Fn(&str) -> Option<String>) -> PathBuf {
    let home = lookup("HOME").or_else(|| lookup("USERPROFILE"));
    home.map_or_else(PathBuf::new, PathBuf::from)
        .join(SESSION_DIR)
        .join(SESSION_FILE)
}
