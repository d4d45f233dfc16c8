//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Store lifecycle status.
///
/// New stores start as `Pending` until an admin activates them; only
/// `Active` stores appear on the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "store_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum StoreStatus {
    /// Awaiting admin review after onboarding.
    #[default]
    Pending,
    /// Visible and selling on the storefront.
    Active,
    /// Removed for policy violations.
    Banned,
    /// Voluntarily taken offline by the seller.
    Disabled,
}

impl std::fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Active => write!(f, "active"),
            Self::Banned => write!(f, "banned"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

impl std::str::FromStr for StoreStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "banned" => Ok(Self::Banned),
            "disabled" => Ok(Self::Disabled),
            _ => Err(format!("invalid store status: {s}")),
        }
    }
}
