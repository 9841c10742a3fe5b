//! Admin access gate.
//!
//! Decides what the admin area shows for the current identity: a spinner
//! while the session loads, the login screen for anyone who is not an
//! admin, the console otherwise.

use mamiejago_storefront::auth::{AuthUser, Identity};

use crate::error::AdminError;

/// Outcome of checking an identity against the admin area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Session or role lookup still in flight.
    Loading,
    /// Not signed in, or signed in without the admin role.
    RedirectToLogin,
    /// Admin access granted.
    Granted(AuthUser),
}

/// Path of the admin login screen.
pub const LOGIN_PATH: &str = "/admin/login";

/// The admin area gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminAccess;

impl AdminAccess {
    #[must_use]
    pub fn check(identity: &Identity) -> AccessDecision {
        if identity.loading {
            return AccessDecision::Loading;
        }
        match &identity.user {
            Some(user) if identity.is_admin => AccessDecision::Granted(user.clone()),
            _ => AccessDecision::RedirectToLogin,
        }
    }
}

/// The admin user, or why there is none.
///
/// # Errors
///
/// Returns `AdminError::NotReady` while loading and `AdminError::Forbidden`
/// otherwise.
pub fn require_admin(identity: &Identity) -> Result<AuthUser, AdminError> {
    match AdminAccess::check(identity) {
        AccessDecision::Granted(user) => Ok(user),
        AccessDecision::Loading => Err(AdminError::NotReady),
        AccessDecision::RedirectToLogin => Err(AdminError::Forbidden),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mamiejago_core::{AppRole, UserId};

    use super::*;

    fn user() -> AuthUser {
        AuthUser {
            id: UserId::new("u1"),
            email: "owner@mamiejago.id".to_string(),
            display_name: Some("Owner".to_string()),
        }
    }

    #[test]
    fn test_loading_wins() {
        let identity = Identity {
            user: Some(user()),
            is_admin: true,
            loading: true,
        };
        assert_eq!(AdminAccess::check(&identity), AccessDecision::Loading);
        assert!(matches!(require_admin(&identity), Err(AdminError::NotReady)));
    }

    #[test]
    fn test_anonymous_redirects() {
        assert_eq!(
            AdminAccess::check(&Identity::anonymous()),
            AccessDecision::RedirectToLogin
        );
    }

    #[test]
    fn test_customer_redirects() {
        let identity = Identity::signed_in(user(), AppRole::User);
        assert_eq!(AdminAccess::check(&identity), AccessDecision::RedirectToLogin);
        assert!(matches!(require_admin(&identity), Err(AdminError::Forbidden)));
    }

    #[test]
    fn test_admin_granted() {
        let identity = Identity::signed_in(user(), AppRole::Admin);
        assert_eq!(AdminAccess::check(&identity), AccessDecision::Granted(user()));
        assert_eq!(require_admin(&identity).unwrap().id.as_str(), "u1");
    }

    #[test]
    fn test_admin_flag_without_user_redirects() {
        let identity = Identity {
            user: None,
            is_admin: true,
            loading: false,
        };
        assert_eq!(AdminAccess::check(&identity), AccessDecision::RedirectToLogin);
    }
}
