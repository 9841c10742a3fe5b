//! Authentication error types.

use thiserror::Error;

use crate::backend::BackendError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(String),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Sign-up without a display name.
    #[error("display name is required")]
    MissingDisplayName,

    /// Backend request failed.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

impl AuthError {
    /// Map a rejected sign-in to [`AuthError::InvalidCredentials`].
    pub(crate) fn from_sign_in(err: BackendError) -> Self {
        match err {
            BackendError::Status { status: 400, .. } | BackendError::Unauthorized(_) => {
                Self::InvalidCredentials
            }
            other => Self::Backend(other),
        }
    }

    /// Map a rejected sign-up to the matching variant.
    pub(crate) fn from_sign_up(err: BackendError) -> Self {
        match err {
            BackendError::Status {
                status: 400 | 422,
                ref body,
            } if body.contains("already") => Self::UserAlreadyExists,
            BackendError::Status {
                status: 400 | 422,
                body,
            } if body.contains("weak_password") || body.contains("Password should") => {
                Self::WeakPassword(body)
            }
            other => Self::Backend(other),
        }
    }
}
