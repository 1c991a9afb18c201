//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password missing from the login form.
    #[error("email and password are required")]
    EmptyCredentials,

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] bazaar_core::EmailError),

    /// Display name too short.
    #[error("name must be at least {min} characters")]
    NameTooShort {
        /// Minimum accepted length.
        min: usize,
    },

    /// Password too weak.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Password and confirmation do not match.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Backend rejected the login (no token in the response).
    #[error("login failed: {0}")]
    LoginFailed(String),

    /// Underlying API call failed.
    #[error("auth request failed: {0}")]
    Api(#[from] ApiError),
}
