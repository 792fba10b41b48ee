//! Account endpoints: login, registration, admin creation.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use super::types::{Credentials, LoginResponse};
use super::{ApiError, RejectionCode, SweetsClient};
use crate::token::AuthToken;

impl SweetsClient {
    /// Exchange credentials for a session token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the credentials or cannot be
    /// reached.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<AuthToken, ApiError> {
        let url = self.endpoint("auth/login")?;
        let response = self
            .request(Method::POST, url, None)
            .json(&Credentials {
                email,
                password: password.expose_secret(),
            })
            .send()
            .await?;

        let body: LoginResponse = Self::check(response).await?.json().await?;
        tracing::debug!("Login accepted");
        Ok(AuthToken::new(body.token))
    }

    /// Create a regular account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server refuses the registration.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(&self, email: &str, password: &SecretString) -> Result<(), ApiError> {
        let url = self.endpoint("auth/register")?;
        let response = self
            .request(Method::POST, url, None)
            .json(&Credentials {
                email,
                password: password.expose_secret(),
            })
            .send()
            .await?;

        Self::check(response).await?;
        tracing::info!("Account registered");
        Ok(())
    }

    /// Create an admin account.
    ///
    /// The API lets the very first admin be created anonymously; after that
    /// the caller must hold an admin token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` with `user_exists`, `unauthorized` or
    /// `forbidden` when the server refuses; see [`admin_signup_message`].
    #[instrument(skip(self, password, bearer), fields(email = %email, authenticated = bearer.is_some()))]
    pub async fn register_admin(
        &self,
        email: &str,
        password: &SecretString,
        bearer: Option<&AuthToken>,
    ) -> Result<(), ApiError> {
        let url = self.endpoint("auth/register-admin")?;
        let response = self
            .request(Method::POST, url, bearer)
            .json(&Credentials {
                email,
                password: password.expose_secret(),
            })
            .send()
            .await?;

        Self::check(response).await?;
        tracing::info!("Admin account registered");
        Ok(())
    }
}

/// User-facing message for a failed admin registration.
#[must_use]
pub fn admin_signup_message(err: &ApiError) -> &'static str {
    match err {
        ApiError::Rejected { code, .. } => match code {
            RejectionCode::UserExists => "Email already registered",
            RejectionCode::Unauthorized => "Login as admin to create more admins",
            RejectionCode::Forbidden => "Only admins can create new admins",
            RejectionCode::Other(_) => "Failed to create admin",
        },
        _ => "Failed to create admin",
    }
}
