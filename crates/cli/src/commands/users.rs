//! User management commands.

use tangelo_core::{Email, Role};

use tangelo_dashboard::db::users::UserRepository;
use tangelo_dashboard::services::auth::hash_password;

use super::{CommandError, connect};

fn parse_role(role: &str) -> Result<Role, CommandError> {
    role.parse()
        .map_err(|_| CommandError::InvalidArgument(format!("unknown role '{role}'")))
}

/// Create an account with an explicit role.
///
/// # Errors
///
/// Returns an error for invalid input, a duplicate email, or database
/// failures.
pub async fn create(name: &str, email: &str, password: &str, role: &str) -> Result<(), CommandError> {
    let role = parse_role(role)?;
    let email = Email::parse(email)
        .map_err(|e| CommandError::InvalidArgument(format!("invalid email: {e}")))?;
    let password_hash = hash_password(password)?;

    let pool = connect().await?;
    let repo = UserRepository::new(&pool);
    let user = repo
        .create_with_password(name, &email, &password_hash, role)
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "Account created");
    Ok(())
}

/// Change an existing account's role.
///
/// # Errors
///
/// Returns an error if the account doesn't exist or the role is unknown.
pub async fn promote(email: &str, role: &str) -> Result<(), CommandError> {
    let role = parse_role(role)?;
    let email = Email::parse(email)
        .map_err(|e| CommandError::InvalidArgument(format!("invalid email: {e}")))?;

    let pool = connect().await?;
    let repo = UserRepository::new(&pool);
    let user = repo
        .get_by_email(&email)
        .await?
        .ok_or_else(|| CommandError::InvalidArgument(format!("no account for {email}")))?;

    repo.set_role(user.id, role).await?;
    tracing::info!(user_id = %user.id, role = %role, "Role updated");
    Ok(())
}
