//! CLI command implementations.

pub mod auth;
pub mod cart;
pub mod sweets;

use sweet_home_client::api::ApiError;
use sweet_home_client::session::FileStorage;
use sweet_home_client::{Access, AuthToken, ClientConfig, ConfigError, SessionStore, SweetsClient};
use thiserror::Error;

/// Session store backed by the session file.
pub type Store = SessionStore<FileStorage>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A store operation failed; carries its display message.
    #[error("{0}")]
    Failed(String),

    #[error("Not logged in. Run `sh-cli login` first")]
    RequiresLogin,

    #[error("This command needs an admin session")]
    Forbidden,

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("No sweet with id {0}")]
    UnknownSweet(String),
}

/// Load configuration and restore any remembered session.
pub fn open_store() -> Result<Store, CommandError> {
    let config = ClientConfig::from_env()?;
    let api = SweetsClient::new(&config)?;
    tracing::debug!(
        api = %config.api_base_url,
        session_file = %config.session_file.display(),
        "Opening session"
    );

    let mut store = SessionStore::new(api, FileStorage::new(config.session_file));
    store.restore();
    Ok(store)
}

/// Bearer token of the current session, if it passes the access check.
pub fn authorize(store: &Store, admin_only: bool) -> Result<&AuthToken, CommandError> {
    match Access::check(store.state(), admin_only) {
        Access::Granted => store.state().token().ok_or(CommandError::RequiresLogin),
        Access::RequiresLogin => Err(CommandError::RequiresLogin),
        Access::Forbidden => Err(CommandError::Forbidden),
    }
}
