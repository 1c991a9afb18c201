//! Bazaar storefront library.
//!
//! This crate provides the storefront client functionality as a library,
//! allowing it to be tested and reused. The binary in `main.rs` wires the
//! pieces into the interactive shell.
//!
//! # Architecture
//!
//! - `api` - typed client for the remote catalog/auth REST API
//! - `session` - persistent key-value store for the logged-in user's fields
//! - `services` - credential authentication on top of `api` + `session`
//! - `stores` - in-memory reactive state (cart, search query, toasts)
//! - `views` - page-fetching list views with client-side filtering

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod state;
pub mod stores;
pub mod views;
