//! Session Store against the mock shop API.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use sweet_home_client::session::{
    AuthFailure, FileStorage, LOGIN_FAILED, MemoryStorage, REGISTRATION_FAILED, SessionStore,
};
use sweet_home_core::{Role, UserId};
use sweet_home_integration_tests::{MockShop, TOKEN_EXPIRY};

fn password(raw: &str) -> SecretString {
    SecretString::from(raw)
}

#[tokio::test]
async fn test_login_sets_session_from_token() {
    let shop = MockShop::start().await.unwrap();
    let id = shop.add_account("admin@sweets.test", "toffee123", true);

    let mut store = SessionStore::new(shop.client().unwrap(), MemoryStorage::new());
    assert!(
        store
            .login("admin@sweets.test", &password("toffee123"), true)
            .await
    );

    let state = store.state();
    assert!(state.is_authenticated());
    assert!(state.is_admin());
    assert!(!state.loading());
    assert!(state.error().is_none());

    let user = state.user().unwrap();
    assert_eq!(user.id, UserId::new(id));
    assert_eq!(user.role, Role::Admin);
    assert_eq!(user.email.as_str(), "admin@sweets.test");

    let claims = state.token().unwrap().claims().unwrap();
    assert_eq!(claims.exp, Some(TOKEN_EXPIRY));
}

#[tokio::test]
async fn test_remembered_session_survives_restart() {
    let shop = MockShop::start().await.unwrap();
    shop.add_account("maya@sweets.test", "caramel42", false);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");

    let mut first = SessionStore::new(shop.client().unwrap(), FileStorage::new(&path));
    assert!(first.login("maya@sweets.test", &password("caramel42"), true).await);
    assert!(path.exists());

    let mut second = SessionStore::new(shop.client().unwrap(), FileStorage::new(&path));
    assert!(second.restore());
    assert_eq!(second.state().token(), first.state().token());
    assert_eq!(second.state().user(), first.state().user());
    assert!(!second.state().is_admin());

    second.logout();
    assert!(!path.exists());

    let mut third = SessionStore::new(shop.client().unwrap(), FileStorage::new(&path));
    assert!(!third.restore());
}

#[tokio::test]
async fn test_login_without_remember_is_not_persisted() {
    let shop = MockShop::start().await.unwrap();
    shop.add_account("maya@sweets.test", "caramel42", false);
    let storage = MemoryStorage::new();

    let mut store = SessionStore::new(shop.client().unwrap(), storage.clone());
    assert!(store.login("maya@sweets.test", &password("caramel42"), false).await);

    assert!(store.state().is_authenticated());
    assert!(!store.state().remember());
    assert!(storage.snapshot().is_none());
}

#[tokio::test]
async fn test_wrong_password_fails_generically() {
    let shop = MockShop::start().await.unwrap();
    shop.add_account("maya@sweets.test", "caramel42", false);
    let storage = MemoryStorage::new();

    let mut store = SessionStore::new(shop.client().unwrap(), storage.clone());
    assert!(!store.login("maya@sweets.test", &password("wrong-one"), true).await);

    let state = store.state();
    assert_eq!(state.error(), Some(LOGIN_FAILED));
    assert_eq!(state.last_failure(), Some(AuthFailure::Rejected));
    assert!(!state.is_authenticated());
    assert!(!state.loading());
    assert!(storage.snapshot().is_none());
}

#[tokio::test]
async fn test_failed_login_keeps_existing_session() {
    let shop = MockShop::start().await.unwrap();
    shop.add_account("maya@sweets.test", "caramel42", false);

    let mut store = SessionStore::new(shop.client().unwrap(), MemoryStorage::new());
    assert!(store.login("maya@sweets.test", &password("caramel42"), true).await);
    let token = store.state().token().cloned();

    assert!(!store.login("maya@sweets.test", &password("nope-nope"), true).await);
    assert_eq!(store.state().token().cloned(), token);
    assert_eq!(store.state().error(), Some(LOGIN_FAILED));
}

#[tokio::test]
async fn test_register_creates_account_without_logging_in() {
    let shop = MockShop::start().await.unwrap();

    let mut store = SessionStore::new(shop.client().unwrap(), MemoryStorage::new());
    assert!(store.register("new@sweets.test", &password("caramel42")).await);

    assert!(!store.state().is_authenticated());
    assert!(!store.state().loading());
    assert_eq!(shop.account_role("new@sweets.test"), Some("user"));

    assert!(store.login("new@sweets.test", &password("caramel42"), true).await);
    assert!(!store.state().is_admin());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let shop = MockShop::start().await.unwrap();
    shop.add_account("taken@sweets.test", "caramel42", false);

    let mut store = SessionStore::new(shop.client().unwrap(), MemoryStorage::new());
    assert!(!store.register("taken@sweets.test", &password("caramel42")).await);

    assert_eq!(store.state().error(), Some(REGISTRATION_FAILED));
    assert_eq!(store.state().last_failure(), Some(AuthFailure::Rejected));
}

#[tokio::test]
async fn test_login_request_shape() {
    let shop = MockShop::start().await.unwrap();
    shop.add_account("maya@sweets.test", "caramel42", false);

    let mut store = SessionStore::new(shop.client().unwrap(), MemoryStorage::new());
    store.login("maya@sweets.test", &password("caramel42"), true).await;

    let requests = shop.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/auth/login");
    assert!(requests[0].bearer.is_none());
}

#[tokio::test]
async fn test_login_accepts_any_address_the_server_knows() {
    let shop = MockShop::start().await.unwrap();
    let api = shop.client().unwrap();
    api.register_admin("boss@localhost", &password("toffee123"), None)
        .await
        .unwrap();

    let mut store = SessionStore::new(api, MemoryStorage::new());
    assert!(store.login("boss@localhost", &password("toffee123"), true).await);

    let state = store.state();
    assert!(state.is_admin());
    assert_eq!(state.user().unwrap().email, "boss@localhost");
    assert!(
        shop.requests()
            .iter()
            .any(|r| r.path == "/api/auth/login")
    );
}

#[tokio::test]
async fn test_blank_email_never_reaches_the_server() {
    let shop = MockShop::start().await.unwrap();

    let mut store = SessionStore::new(shop.client().unwrap(), MemoryStorage::new());
    assert!(!store.login("  ", &password("toffee123"), true).await);

    assert_eq!(store.state().last_failure(), Some(AuthFailure::InvalidInput));
    assert!(shop.requests().is_empty());
}
