//! Admin error types.

use thiserror::Error;

use mamiejago_storefront::backend::BackendError;

/// Errors from admin console operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The identity is still being resolved.
    #[error("identity is still loading")]
    NotReady,

    /// No admin is signed in.
    #[error("admin access required")]
    Forbidden,

    /// Product name left blank.
    #[error("product name is required")]
    MissingName,

    /// Price zero or negative.
    #[error("price must be greater than zero")]
    InvalidPrice,

    /// Banner title left blank.
    #[error("banner title is required")]
    MissingTitle,

    /// Banner without an image.
    #[error("banner image is required")]
    MissingImage,

    /// Row to edit no longer exists.
    #[error("not found: {0}")]
    NotFound(String),

    /// Backend request failed.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

impl AdminError {
    /// Whether the caller should be sent to the admin login screen.
    #[must_use]
    pub const fn needs_login(&self) -> bool {
        matches!(
            self,
            Self::Forbidden | Self::Backend(BackendError::Unauthorized(_))
        )
    }
}

/// Result type alias for `AdminError`.
pub type Result<T> = std::result::Result<T, AdminError>;
