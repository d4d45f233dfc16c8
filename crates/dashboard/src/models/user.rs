//! User account model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tangelo_core::{Email, Role, UserId};

/// A registered user account.
///
/// The password hash never leaves the database layer; see
/// `db::users::UserRepository::get_password_hash`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
