//! Unified error handling.
//!
//! Each concern has its own error enum. `StorefrontError` wraps all of them
//! so a host application can use one `Result` type across the crate.

use thiserror::Error;

use mamiejago_core::RatingError;

use crate::auth::AuthError;
use crate::backend::BackendError;
use crate::cart::StorageError;
use crate::config::ConfigError;
use crate::order::OrderError;
use crate::reviews::ReviewError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Cart storage failed outside the cart store itself.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Order could not be sent.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Backend request failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Review submission rejected.
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    /// Star rating out of range.
    #[error("Rating error: {0}")]
    Rating(#[from] RatingError),
}

impl StorefrontError {
    /// Message safe to show to a customer.
    ///
    /// Backend and storage details stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Order(OrderError::EmptyCart) => "Keranjang masih kosong".to_string(),
            Self::Order(OrderError::MissingName) => "Nama tidak boleh kosong".to_string(),
            Self::Order(OrderError::InvalidPhone(_)) => "Nomor WhatsApp tidak valid".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Email atau password salah".to_string(),
                AuthError::UserAlreadyExists => "Email sudah terdaftar".to_string(),
                AuthError::MissingDisplayName => "Nama tidak boleh kosong".to_string(),
                AuthError::InvalidEmail(_) => "Email tidak valid".to_string(),
                AuthError::WeakPassword(_) => "Password terlalu lemah".to_string(),
                AuthError::Backend(_) => "Terjadi kesalahan, coba lagi".to_string(),
            },
            Self::Review(err) => err.to_string(),
            Self::Rating(_) => "Rating harus 1 sampai 5".to_string(),
            Self::Backend(BackendError::RateLimited(_)) => {
                "Terlalu banyak permintaan, coba lagi nanti".to_string()
            }
            Self::Storage(_) | Self::Backend(_) | Self::Config(_) => {
                "Terjadi kesalahan, coba lagi".to_string()
            }
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
