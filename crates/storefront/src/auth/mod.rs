//! Identity provider.
//!
//! Password accounts live in the backend auth service. Admin rights come from
//! a row in the `user_roles` table, which [`AuthClient::role_for`] looks up
//! with the user's own access token.

mod error;

pub use error::AuthError;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use mamiejago_core::{AppRole, UserId};

use crate::backend::{BackendClient, Query};

/// Minimum password length accepted by the auth service.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A signed-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
}

impl AuthUser {
    /// Name to greet the user with: the display name, else the email.
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// User object as returned by the auth API.
#[derive(Debug, Deserialize)]
struct UserRecord {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    display_name: Option<String>,
}

impl From<UserRecord> for AuthUser {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email.unwrap_or_default(),
            display_name: record
                .user_metadata
                .display_name
                .filter(|n| !n.trim().is_empty()),
        }
    }
}

/// Session returned by a successful sign-in.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: UserRecord,
}

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: SecretString,
    pub user: AuthUser,
}

impl From<TokenResponse> for AuthSession {
    fn from(token: TokenResponse) -> Self {
        Self {
            access_token: SecretString::from(token.access_token),
            user: token.user.into(),
        }
    }
}

/// Sign-up answers with a session when email confirmation is off, else with
/// the bare user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(UserRecord),
}

/// Result of a sign-up.
#[derive(Debug, Clone)]
pub enum SignUp {
    /// The account is active and signed in.
    Session(AuthSession),
    /// The account exists but the email must be verified first.
    ConfirmationRequired(AuthUser),
}

impl SignUp {
    #[must_use]
    pub const fn user(&self) -> &AuthUser {
        match self {
            Self::Session(session) => &session.user,
            Self::ConfirmationRequired(user) => user,
        }
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpData<'a>,
}

#[derive(Serialize)]
struct SignUpData<'a> {
    display_name: &'a str,
}

#[derive(Deserialize)]
struct RoleRow {
    role: AppRole,
}

/// The identity value exposed to the rest of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user: Option<AuthUser>,
    pub is_admin: bool,
    /// The session or the role lookup is still in flight.
    pub loading: bool,
}

impl Identity {
    /// Nothing known yet.
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            user: None,
            is_admin: false,
            loading: true,
        }
    }

    /// No one is signed in.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            user: None,
            is_admin: false,
            loading: false,
        }
    }

    #[must_use]
    pub fn signed_in(user: AuthUser, role: AppRole) -> Self {
        Self {
            user: Some(user),
            is_admin: role == AppRole::Admin,
            loading: false,
        }
    }

    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::loading()
    }
}

/// Client for password accounts and roles.
#[derive(Debug, Clone)]
pub struct AuthClient {
    backend: BackendClient,
}

impl AuthClient {
    #[must_use]
    pub const fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` for a malformed email and
    /// `AuthError::InvalidCredentials` when the backend rejects the pair.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = validate_email(email)?;

        let token: TokenResponse = self
            .backend
            .auth_post(
                "token",
                &[("grant_type", "password")],
                &Credentials {
                    email: &email,
                    password,
                },
            )
            .await
            .map_err(AuthError::from_sign_in)?;

        let session = AuthSession::from(token);
        info!(user_id = %session.user.id, "User signed in");
        Ok(session)
    }

    /// Create an account with a display name.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingDisplayName` for a blank name,
    /// `AuthError::InvalidEmail` or `AuthError::WeakPassword` for bad input,
    /// and `AuthError::UserAlreadyExists` when the email is taken.
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SignUp, AuthError> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(AuthError::MissingDisplayName);
        }
        let email = validate_email(email)?;
        validate_password(password)?;

        let response: SignUpResponse = self
            .backend
            .auth_post(
                "signup",
                &[],
                &SignUpBody {
                    email: &email,
                    password,
                    data: SignUpData { display_name },
                },
            )
            .await
            .map_err(AuthError::from_sign_up)?;

        let outcome = match response {
            SignUpResponse::Session(token) => SignUp::Session(token.into()),
            SignUpResponse::User(user) => SignUp::ConfirmationRequired(user.into()),
        };
        info!(user_id = %outcome.user().id, "User signed up");
        Ok(outcome)
    }

    /// End the session on the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self, session), fields(user_id = %session.user.id))]
    pub async fn sign_out(&self, session: &AuthSession) -> Result<(), AuthError> {
        self.backend
            .with_access_token(session.access_token.clone())
            .auth_post_empty("logout")
            .await?;
        Ok(())
    }

    /// Role of the session's user, [`AppRole::User`] unless an admin row
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    #[instrument(skip(self, session), fields(user_id = %session.user.id))]
    pub async fn role_for(&self, session: &AuthSession) -> Result<AppRole, AuthError> {
        let rows: Vec<RoleRow> = self
            .backend
            .with_access_token(session.access_token.clone())
            .select(
                &Query::table("user_roles")
                    .select("role")
                    .eq("user_id", &session.user.id)
                    .eq("role", AppRole::Admin),
            )
            .await?;

        Ok(if rows.iter().any(|r| r.role == AppRole::Admin) {
            AppRole::Admin
        } else {
            AppRole::User
        })
    }

    /// Resolve the identity for a session.
    ///
    /// A failed role lookup yields a non-admin identity.
    pub async fn identify(&self, session: &AuthSession) -> Identity {
        let role = match self.role_for(session).await {
            Ok(role) => role,
            Err(e) => {
                warn!(error = %e, user_id = %session.user.id, "Role lookup failed");
                AppRole::User
            }
        };
        Identity::signed_in(session.user.clone(), role)
    }

    /// Backend client acting as the session's user.
    #[must_use]
    pub fn backend_for(&self, session: &AuthSession) -> BackendClient {
        self.backend.with_access_token(session.access_token.clone())
    }
}

/// Trim and sanity-check an email address.
fn validate_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim();
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
    });

    if valid && !email.contains(char::is_whitespace) {
        Ok(email.to_lowercase())
    } else {
        Err(AuthError::InvalidEmail(email.to_string()))
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}
