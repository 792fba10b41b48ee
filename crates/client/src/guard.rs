//! Access checks for protected screens and commands.

use crate::session::Session;

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Nobody is logged in; send the user to the login screen.
    RequiresLogin,
    /// Logged in, but not as an admin; send the user home.
    Forbidden,
}

impl Access {
    /// Decide whether `session` may see a page, optionally admin-only.
    #[must_use]
    pub fn check(session: &Session, admin_only: bool) -> Self {
        if !session.is_authenticated() {
            Self::RequiresLogin
        } else if admin_only && !session.is_admin() {
            Self::Forbidden
        } else {
            Self::Granted
        }
    }

    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::SweetsClient;
    use crate::config::ClientConfig;
    use crate::session::{MemoryStorage, SessionStore};

    fn restored(record: &str) -> Session {
        let api = SweetsClient::new(&ClientConfig::for_api("http://127.0.0.1:1").unwrap()).unwrap();
        let mut store = SessionStore::new(api, MemoryStorage::with_record(record));
        store.restore();
        store.state().clone()
    }

    #[test]
    fn test_anonymous_needs_login() {
        let session = Session::default();
        assert_eq!(Access::check(&session, false), Access::RequiresLogin);
        assert_eq!(Access::check(&session, true), Access::RequiresLogin);
    }

    #[test]
    fn test_user_is_kept_out_of_admin() {
        let session = restored(
            r#"{"token":"t","user":{"id":"u","role":"user","email":"u@sweets.test"}}"#,
        );
        assert!(Access::check(&session, false).is_granted());
        assert_eq!(Access::check(&session, true), Access::Forbidden);
    }

    #[test]
    fn test_admin_is_granted() {
        let session = restored(
            r#"{"token":"t","user":{"id":"a","role":"admin","email":"a@sweets.test"}}"#,
        );
        assert!(Access::check(&session, true).is_granted());
    }
}
