//! Integration test harness for the SweetHome client.
//!
//! [`MockShop`] is an in-process stand-in for the shop API, served by axum on
//! an ephemeral port. It keeps accounts and sweets in memory, issues
//! unsigned JWT-shaped tokens, enforces the admin rules of the real API, and
//! records every request it sees.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sweet-home-integration-tests
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde_json::{Value, json};
use sweet_home_client::{ClientConfig, SweetsClient};
use tokio::task::JoinHandle;

/// Expiry stamped on every issued token (2100-01-01).
pub const TOKEN_EXPIRY: i64 = 4_102_444_800;

/// A request as the mock saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Value of a `Bearer` authorization header, if any.
    pub bearer: Option<String>,
}

#[derive(Debug, Clone)]
struct Account {
    id: String,
    password: String,
    role: &'static str,
}

#[derive(Debug, Default)]
struct ShopData {
    accounts: HashMap<String, Account>,
    /// Issued token -> account email.
    tokens: HashMap<String, String>,
    sweets: Vec<Value>,
    requests: Vec<RecordedRequest>,
    fail_catalog: bool,
}

impl ShopData {
    fn has_admin(&self) -> bool {
        self.accounts.values().any(|a| a.role == "admin")
    }

    fn role_for(&self, bearer: Option<&str>) -> Option<&'static str> {
        let email = self.tokens.get(bearer?)?;
        self.accounts.get(email).map(|a| a.role)
    }

    fn add_account(&mut self, email: &str, password: &str, role: &'static str) -> String {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.accounts.insert(
            email.to_owned(),
            Account {
                id: id.clone(),
                password: password.to_owned(),
                role,
            },
        );
        id
    }
}

#[derive(Debug, Clone, Default)]
struct MockState {
    data: Arc<Mutex<ShopData>>,
}

impl MockState {
    fn lock(&self) -> MutexGuard<'_, ShopData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A running mock shop API. The server stops when this is dropped.
#[derive(Debug)]
pub struct MockShop {
    addr: SocketAddr,
    state: MockState,
    task: JoinHandle<()>,
}

impl MockShop {
    /// Bind to an ephemeral local port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = MockState::default();
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Mock shop stopped");
            }
        });

        Ok(Self { addr, state, task })
    }

    /// API root, as `SWEET_HOME_API_BASE_URL` would carry it.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Client configuration pointed at this server.
    ///
    /// # Errors
    ///
    /// Never fails for the URLs this server produces.
    pub fn config(&self) -> Result<ClientConfig, sweet_home_client::ConfigError> {
        ClientConfig::for_api(&self.base_url())
    }

    /// API client pointed at this server.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn client(&self) -> Result<SweetsClient, Box<dyn std::error::Error>> {
        Ok(SweetsClient::new(&self.config()?)?)
    }

    /// Create an account directly. Returns its id.
    pub fn add_account(&self, email: &str, password: &str, admin: bool) -> String {
        let role = if admin { "admin" } else { "user" };
        self.state.lock().add_account(email, password, role)
    }

    /// Add a sweet directly. Returns its id.
    pub fn add_sweet(&self, name: &str, category: &str, price: f64, quantity: u32) -> String {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.state.lock().sweets.push(json!({
            "_id": id,
            "name": name,
            "category": category,
            "price": price,
            "quantity": quantity,
        }));
        id
    }

    /// Current catalog, as stored.
    #[must_use]
    pub fn sweets(&self) -> Vec<Value> {
        self.state.lock().sweets.clone()
    }

    /// Whether an account exists, and with which role.
    #[must_use]
    pub fn account_role(&self, email: &str) -> Option<&'static str> {
        self.state.lock().accounts.get(email).map(|a| a.role)
    }

    /// Make `GET /sweets` answer 500 until switched back.
    pub fn fail_catalog(&self, fail: bool) {
        self.state.lock().fail_catalog = fail;
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }
}

impl Drop for MockShop {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn router(state: MockState) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/register-admin", post(register_admin))
        .route("/api/sweets", get(list_sweets).post(create_sweet))
        .route("/api/sweets/{id}", put(update_sweet).delete(delete_sweet))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let recorded = RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_owned(),
        query: request.uri().query().map(str::to_owned),
        bearer: bearer(request.headers()).map(str::to_owned),
    };
    state.lock().requests.push(recorded);
    next.run(request).await
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn rejection(status: StatusCode, code: &str) -> Response {
    (status, Json(json!({ "error": code }))).into_response()
}

fn issue_token(id: &str, role: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({ "sub": id, "role": role, "iat": 1_700_000_000, "exp": TOKEN_EXPIRY }).to_string(),
    );
    format!("{header}.{payload}.mock-signature")
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn login(State(state): State<MockState>, Json(body): Json<Credentials>) -> Response {
    let mut data = state.lock();
    let Some(account) = data
        .accounts
        .get(&body.email)
        .filter(|a| a.password == body.password)
        .cloned()
    else {
        return rejection(StatusCode::UNAUTHORIZED, "invalid_credentials");
    };

    let token = issue_token(&account.id, account.role);
    data.tokens.insert(token.clone(), body.email);
    Json(json!({ "token": token })).into_response()
}

async fn register(State(state): State<MockState>, Json(body): Json<Credentials>) -> Response {
    let mut data = state.lock();
    if data.accounts.contains_key(&body.email) {
        return rejection(StatusCode::CONFLICT, "user_exists");
    }
    data.add_account(&body.email, &body.password, "user");
    StatusCode::CREATED.into_response()
}

async fn register_admin(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Credentials>,
) -> Response {
    let mut data = state.lock();
    if data.has_admin() {
        match data.role_for(bearer(&headers)) {
            None => return rejection(StatusCode::UNAUTHORIZED, "unauthorized"),
            Some("admin") => {}
            Some(_) => return rejection(StatusCode::FORBIDDEN, "forbidden"),
        }
    }
    if data.accounts.contains_key(&body.email) {
        return rejection(StatusCode::CONFLICT, "user_exists");
    }
    data.add_account(&body.email, &body.password, "admin");
    StatusCode::CREATED.into_response()
}

/// Admin check shared by the write endpoints.
fn require_admin(data: &ShopData, headers: &HeaderMap) -> Result<(), Response> {
    match data.role_for(bearer(headers)) {
        Some("admin") => Ok(()),
        Some(_) => Err(rejection(StatusCode::FORBIDDEN, "forbidden")),
        None => Err(rejection(StatusCode::UNAUTHORIZED, "unauthorized")),
    }
}

async fn list_sweets(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let data = state.lock();
    if data.fail_catalog {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
    }

    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(24);
    let name = params.get("name").map(|n| n.to_lowercase());

    let items: Vec<&Value> = data
        .sweets
        .iter()
        .filter(|s| {
            name.as_ref().is_none_or(|n| {
                s["name"]
                    .as_str()
                    .is_some_and(|sn| sn.to_lowercase().contains(n.as_str()))
            })
        })
        .skip(page.saturating_sub(1).saturating_mul(limit))
        .take(limit)
        .collect();

    Json(json!({ "items": items, "page": page, "limit": limit })).into_response()
}

async fn create_sweet(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    let mut data = state.lock();
    if let Err(response) = require_admin(&data, &headers) {
        return response;
    }
    let Some(fields) = body.as_object_mut() else {
        return rejection(StatusCode::BAD_REQUEST, "invalid_body");
    };
    fields.insert(
        "_id".to_owned(),
        Value::String(uuid::Uuid::new_v4().simple().to_string()),
    );
    data.sweets.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_sweet(
    State(state): State<MockState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut data = state.lock();
    if let Err(response) = require_admin(&data, &headers) {
        return response;
    }
    let Some(sweet) = data.sweets.iter_mut().find(|s| s["_id"] == id.as_str()) else {
        return rejection(StatusCode::NOT_FOUND, "not_found");
    };
    if let (Some(target), Some(changes)) = (sweet.as_object_mut(), body.as_object()) {
        for (key, value) in changes {
            target.insert(key.clone(), value.clone());
        }
    }
    Json(sweet.clone()).into_response()
}

async fn delete_sweet(
    State(state): State<MockState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut data = state.lock();
    if let Err(response) = require_admin(&data, &headers) {
        return response;
    }
    let before = data.sweets.len();
    data.sweets.retain(|s| s["_id"] != id.as_str());
    if data.sweets.len() == before {
        return rejection(StatusCode::NOT_FOUND, "not_found");
    }
    StatusCode::NO_CONTENT.into_response()
}
