//! SweetHome Core - Shared types library.
//!
//! This crate provides common types used across all SweetHome components:
//! - `client` - Session/cart stores and the HTTP client for the shop API
//! - `cli` - Command-line front end driving the stores
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
