//! User roles.

use serde::{Deserialize, Serialize};

/// Platform role with different permission levels.
///
/// Roles gate what a user may do on the dashboard: sellers manage their own
/// stores and products, admins additionally manage the category tree and
/// other stores. Authorization checks compare against this enum, never
/// against raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular customer account.
    #[default]
    User,
    /// Can create and manage their own stores and products.
    Seller,
    /// Full access to categories, stores, and platform settings.
    Admin,
}

impl Role {
    /// Whether this role may manage stores and products it owns.
    #[must_use]
    pub const fn can_sell(self) -> bool {
        matches!(self, Self::Seller | Self::Admin)
    }

    /// Whether this role may administer the platform.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Seller => write!(f, "seller"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "seller" => Ok(Self::Seller),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_permissions() {
        assert!(!Role::User.can_sell());
        assert!(Role::Seller.can_sell());
        assert!(Role::Admin.can_sell());
        assert!(!Role::Seller.is_admin());
        assert!(Role::Admin.is_admin());
    }

    #[test]
    fn test_roundtrip() {
        for role in [Role::User, Role::Seller, Role::Admin] {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("superuser".parse::<Role>().is_err());
    }
}
