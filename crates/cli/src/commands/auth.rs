//! Account commands.
//!
//! # Usage
//!
//! ```bash
//! sh-cli register -u maya -e maya@example.com -p caramel42
//! sh-cli login -e maya@example.com -p caramel42
//! sh-cli whoami
//! sh-cli register-admin -e boss@example.com -p toffee123
//! sh-cli logout
//! ```

use secrecy::SecretString;
use sweet_home_client::api::admin_signup_message;
use sweet_home_client::session::{LOGIN_FAILED, REGISTRATION_FAILED};
use sweet_home_client::validation::SignupForm;

use super::{CommandError, Store};

pub async fn login(
    store: &mut Store,
    email: &str,
    password: &SecretString,
    remember: bool,
) -> Result<(), CommandError> {
    if !store.login(email, password, remember).await {
        let message = store.state().error().unwrap_or(LOGIN_FAILED);
        return Err(CommandError::Failed(message.to_owned()));
    }

    if let Some(user) = store.state().user() {
        tracing::info!("Logged in as {} ({})", user.email, user.role);
    }
    if !remember {
        tracing::info!("Session will not be remembered");
    }
    Ok(())
}

/// Validate the signup form, then create the account.
pub async fn register(store: &mut Store, form: &SignupForm) -> Result<(), CommandError> {
    if let Err(errors) = form.validate() {
        let details = errors
            .iter()
            .map(|(field, message)| format!("{field:?}: {message}"))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(CommandError::Failed(details));
    }

    let password = SecretString::from(form.password.as_str());
    if !store.register(&form.email, &password).await {
        let message = store.state().error().unwrap_or(REGISTRATION_FAILED);
        return Err(CommandError::Failed(message.to_owned()));
    }

    tracing::info!("Account created for {}. Log in to continue", form.email);
    Ok(())
}

/// Create an admin account, presenting the current session if there is one.
pub async fn register_admin(
    store: &Store,
    email: &str,
    password: &SecretString,
) -> Result<(), CommandError> {
    store
        .api()
        .register_admin(email, password, store.state().token())
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "Admin registration refused");
            CommandError::Failed(admin_signup_message(&e).to_owned())
        })?;

    tracing::info!("Admin account created for {email}");
    Ok(())
}

pub fn logout(store: &mut Store) {
    store.logout();
}

#[allow(clippy::print_stdout)]
pub fn whoami(store: &Store) -> Result<(), CommandError> {
    let state = store.state();
    let Some(token) = state.token() else {
        return Err(CommandError::RequiresLogin);
    };

    match state.user() {
        Some(user) => println!("{} ({}, id {})", user.email, user.role, user.id),
        None => println!("Logged in (account details unavailable)"),
    }

    if let Ok(claims) = token.claims()
        && let Some(expires_at) = claims.expires_at()
    {
        let status = if claims.is_expired_at(chrono::Utc::now()) {
            "expired"
        } else {
            "expires"
        };
        println!("Token {status} {}", expires_at.to_rfc3339());
    }
    Ok(())
}
