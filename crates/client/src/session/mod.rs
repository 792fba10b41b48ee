//! Session Store: who is logged in, and whether that survives a restart.
//!
//! The store is a plain value owned by the caller. Operations take
//! `&mut self`, so only one transition runs at a time; network calls suspend
//! the caller without locking anything.
//!
//! Failures never escape as errors. Each operation reports success as a
//! `bool`, leaves a generic message in [`Session::error`] for display, and
//! records a [`AuthFailure`] classification for callers that want to tell
//! "wrong password" from "server down".

mod storage;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use sweet_home_core::{Role, UserId};

use crate::api::{ApiError, SweetsClient};
use crate::token::{AuthToken, TokenError};

/// Message shown after any failed login.
pub const LOGIN_FAILED: &str = "Login failed";
/// Message shown after any failed registration.
pub const REGISTRATION_FAILED: &str = "Registration failed";

/// The logged-in account.
///
/// `email` is whatever the server accepted at login; it is not re-validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub role: Role,
    pub email: String,
}

/// Why the last login or registration failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// The email was blank, so no request was made.
    InvalidInput,
    /// The server answered with a 4xx (bad credentials, duplicate account).
    Rejected,
    /// The server could not be reached.
    Unreachable,
    /// The server answered with something other than a 2xx or 4xx.
    Server,
    /// The server accepted the login but its token could not be read.
    MalformedToken,
}

impl AuthFailure {
    fn from_api(err: &ApiError) -> Self {
        if err.is_unreachable() {
            Self::Unreachable
        } else if err.is_client_error() {
            Self::Rejected
        } else {
            Self::Server
        }
    }
}

/// Session state.
///
/// `user` is only ever set together with `token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: Option<AuthToken>,
    user: Option<SessionUser>,
    remember: bool,
    loading: bool,
    error: Option<String>,
    last_failure: Option<AuthFailure>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            token: None,
            user: None,
            remember: true,
            loading: false,
            error: None,
            last_failure: None,
        }
    }
}

impl Session {
    #[must_use]
    pub const fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    #[must_use]
    pub const fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn remember(&self) -> bool {
        self.remember
    }

    /// Whether a login or registration is in flight.
    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    /// Display message from the last failed operation.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn last_failure(&self) -> Option<AuthFailure> {
        self.last_failure
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role.is_admin())
    }

    fn start(&mut self) {
        self.loading = true;
        self.error = None;
        self.last_failure = None;
    }

    fn fail(&mut self, message: &str, failure: AuthFailure) {
        self.loading = false;
        self.error = Some(message.to_string());
        self.last_failure = Some(failure);
    }

    fn log_in(&mut self, token: AuthToken, user: Option<SessionUser>) {
        self.loading = false;
        self.token = Some(token);
        self.user = user;
    }
}

/// What is written to storage for a remembered session.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    token: AuthToken,
    #[serde(default)]
    user: Option<SessionUser>,
}

/// Holds the session and keeps its persisted copy in step.
#[derive(Debug)]
pub struct SessionStore<S> {
    api: SweetsClient,
    storage: S,
    state: Session,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Create a store with an empty session.
    pub fn new(api: SweetsClient, storage: S) -> Self {
        Self {
            api,
            storage,
            state: Session::default(),
        }
    }

    /// Current session state.
    pub const fn state(&self) -> &Session {
        &self.state
    }

    /// The API client the store logs in with.
    pub const fn api(&self) -> &SweetsClient {
        &self.api
    }

    /// Load a remembered session, if one is stored.
    ///
    /// Returns whether a session was restored. Unreadable or unparseable
    /// records are ignored and leave the session empty.
    pub fn restore(&mut self) -> bool {
        let record = match self.storage.load() {
            Ok(Some(record)) => record,
            Ok(None) => return false,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unreadable session record");
                return false;
            }
        };

        match serde_json::from_str::<PersistedSession>(&record) {
            Ok(persisted) => {
                self.state.log_in(persisted.token, persisted.user);
                tracing::debug!("Restored remembered session");
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring corrupt session record");
                false
            }
        }
    }

    /// Log in and, if `remember` is set, persist the session.
    ///
    /// Returns whether the login succeeded.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&mut self, email: &str, password: &SecretString, remember: bool) -> bool {
        self.state.start();

        if email.trim().is_empty() {
            tracing::warn!("Login refused: empty email");
            self.state.fail(LOGIN_FAILED, AuthFailure::InvalidInput);
            return false;
        }

        let token = match self.api.login(email, password).await {
            Ok(token) => token,
            Err(e) => {
                let failure = AuthFailure::from_api(&e);
                tracing::warn!(error = %e, ?failure, "Login failed");
                self.state.fail(LOGIN_FAILED, failure);
                return false;
            }
        };

        if let Err(e) = self.complete_login(token, email.to_owned(), remember) {
            tracing::warn!(error = %e, "Login token unreadable");
            self.state.fail(LOGIN_FAILED, AuthFailure::MalformedToken);
            return false;
        }

        tracing::info!("Logged in");
        true
    }

    /// Install a freshly issued token as the current session.
    fn complete_login(
        &mut self,
        token: AuthToken,
        email: String,
        remember: bool,
    ) -> Result<(), TokenError> {
        let claims = token.claims()?;
        self.state.remember = remember;
        self.state.log_in(
            token,
            Some(SessionUser {
                id: claims.sub,
                role: claims.role,
                email,
            }),
        );
        self.sync_storage();
        Ok(())
    }

    /// Create an account. Does not log in.
    ///
    /// Returns whether the registration succeeded.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(&mut self, email: &str, password: &SecretString) -> bool {
        self.state.start();

        match self.api.register(email, password).await {
            Ok(()) => {
                self.state.loading = false;
                true
            }
            Err(e) => {
                let failure = AuthFailure::from_api(&e);
                tracing::warn!(error = %e, ?failure, "Registration failed");
                self.state.fail(REGISTRATION_FAILED, failure);
                false
            }
        }
    }

    /// Forget the session everywhere, keeping only the remember preference.
    pub fn logout(&mut self) {
        if let Err(e) = self.storage.remove() {
            tracing::warn!(error = %e, "Could not remove stored session");
        }
        self.state = Session {
            remember: self.state.remember,
            ..Session::default()
        };
        tracing::info!("Logged out");
    }

    /// Change the remember preference and bring storage in line with it.
    pub fn set_remember(&mut self, remember: bool) {
        self.state.remember = remember;
        self.sync_storage();
    }

    /// Dismiss the current error message.
    pub fn clear_error(&mut self) {
        self.state.error = None;
    }

    /// Write the session when it should be remembered, otherwise make sure
    /// no stale record of an earlier login is left behind.
    fn sync_storage(&self) {
        let result = match (&self.state.token, self.state.remember) {
            (Some(token), true) => {
                let persisted = PersistedSession {
                    token: token.clone(),
                    user: self.state.user.clone(),
                };
                match serde_json::to_string(&persisted) {
                    Ok(record) => self.storage.save(&record),
                    Err(e) => {
                        tracing::warn!(error = %e, "Could not serialize session");
                        return;
                    }
                }
            }
            _ => self.storage.remove(),
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "Could not update stored session");
        }
    }
}
