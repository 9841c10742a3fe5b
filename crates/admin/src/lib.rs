//! MamieJago admin console library.
//!
//! Menu, banner and review management for the MamieJago storefront.
//!
//! # Security
//!
//! Every write goes through the backend with the admin's own access token;
//! the backend's row level security is what actually enforces the
//! `user_roles` admin check. [`gate`] mirrors that check on the client so
//! non-admins are sent to the login screen before any request is made.
//!
//! # Example
//!
//! ```rust,ignore
//! use mamiejago_admin::AdminConsole;
//!
//! let identity = auth.identify(&session).await;
//! let console = AdminConsole::open(&auth, &session, &identity)?;
//! let stats = console.dashboard().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod banners;
pub mod dashboard;
pub mod error;
pub mod gate;
pub mod products;
pub mod reviews;

pub use error::{AdminError, Result};
pub use gate::{AccessDecision, AdminAccess, require_admin};

use mamiejago_storefront::auth::{AuthClient, AuthSession, AuthUser, Identity};
use mamiejago_storefront::backend::BackendClient;

/// Admin operations, bound to a signed-in admin.
#[derive(Debug, Clone)]
pub struct AdminConsole {
    backend: BackendClient,
    admin: AuthUser,
}

impl AdminConsole {
    /// Open the console for an admin session.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotReady` while the identity is loading and
    /// `AdminError::Forbidden` when the user is missing or not an admin.
    pub fn open(auth: &AuthClient, session: &AuthSession, identity: &Identity) -> Result<Self> {
        let admin = require_admin(identity)?;
        if admin.id != session.user.id {
            return Err(AdminError::Forbidden);
        }
        Ok(Self {
            backend: auth.backend_for(session),
            admin,
        })
    }

    /// The signed-in admin.
    #[must_use]
    pub const fn admin(&self) -> &AuthUser {
        &self.admin
    }

    /// Backend client acting as the admin.
    #[must_use]
    pub const fn backend(&self) -> &BackendClient {
        &self.backend
    }
}
