//! Unified application error type.
//!
//! Views fold API failures into their own load state; this type is for the
//! places that bubble instead - startup wiring and the shell loop.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::session::SessionError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Remote API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session storage failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
