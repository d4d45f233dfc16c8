//! Session-held data.

use serde::{Deserialize, Serialize};

use tangelo_core::{Role, UserId};

/// Keys under which values are stored in the tower-sessions session.
pub mod session_keys {
    /// The authenticated user ([`super::CurrentUser`]).
    pub const CURRENT_USER: &str = "current_user";
    /// The in-progress store onboarding wizard (`wizard::WizardState`).
    pub const STORE_WIZARD: &str = "store_wizard";
}

/// The authenticated user as stored in the session.
///
/// A trimmed copy of [`super::User`]; re-resolved from the database on
/// login, never trusted from request bodies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    /// Build the session representation of a user.
    #[must_use]
    pub fn from_user(user: &super::User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.as_str().to_owned(),
            role: user.role,
        }
    }
}
