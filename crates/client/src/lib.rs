//! SweetHome client library.
//!
//! Client-side state for the SweetHome shop, as explicit values the caller
//! owns:
//!
//! - [`session::SessionStore`] - login, registration, logout, and the
//!   remembered session
//! - [`cart::Cart`] - the in-memory cart
//! - [`catalog::CatalogStore`] - fetched catalog plus filter/sort helpers
//!
//! plus the typed HTTP client ([`api::SweetsClient`]) they talk to the shop
//! API through.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod guard;
pub mod session;
pub mod token;
pub mod validation;

pub use api::{ApiError, SweetsClient};
pub use cart::Cart;
pub use catalog::CatalogStore;
pub use config::{ClientConfig, ConfigError};
pub use guard::Access;
pub use session::{Session, SessionStore};
pub use token::AuthToken;
