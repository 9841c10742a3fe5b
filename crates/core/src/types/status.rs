//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Moderation filter for the review list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewFilter {
    #[default]
    All,
    /// Submitted but not yet approved.
    Pending,
    /// Visible on the public review feed.
    Approved,
}

impl ReviewFilter {
    /// The `is_approved` value this filter selects, or `None` for all rows.
    #[must_use]
    pub const fn approved(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Pending => Some(false),
            Self::Approved => Some(true),
        }
    }

    /// Label shown on the admin filter chip.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "Semua",
            Self::Pending => "Pending",
            Self::Approved => "Approved",
        }
    }
}

/// Application role stored in the backend `user_roles` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppRole {
    /// Full access to the admin console.
    Admin,
    /// Regular customer account.
    #[default]
    User,
}

impl std::fmt::Display for AppRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for AppRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid app role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_review_filter_approved() {
        assert_eq!(ReviewFilter::All.approved(), None);
        assert_eq!(ReviewFilter::Pending.approved(), Some(false));
        assert_eq!(ReviewFilter::Approved.approved(), Some(true));
    }

    #[test]
    fn test_app_role_roundtrip() {
        for role in [AppRole::Admin, AppRole::User] {
            assert_eq!(role.to_string().parse::<AppRole>().unwrap(), role);
        }
        assert!("viewer".parse::<AppRole>().is_err());
    }

    #[test]
    fn test_app_role_serde() {
        assert_eq!(serde_json::to_string(&AppRole::Admin).unwrap(), "\"admin\"");
    }
}
