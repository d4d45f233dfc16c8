//! Submission actions.
//!
//! The only place where validated input becomes a persisted record. Every
//! action runs the same precondition chain, short-circuiting on the first
//! failure:
//!
//! 1. caller authenticated
//! 2. caller authorized for the entity's required role
//! 3. required fields present (failures enumerate the missing names)
//! 4. full schema validation (failures carry field-level messages)
//! 5. uniqueness check against persisted records, excluding the record's
//!    own id on update (failures name the conflicting field)
//!
//! Nothing throws across the action boundary: repositories' errors are
//! folded into the returned [`ActionResult`], with the raw error logged
//! and captured server-side only.

pub mod categories;
pub mod products;
pub mod shipping;
pub mod stores;
pub mod subcategories;

use serde::Serialize;

use crate::db::{ConflictField, RepositoryError};
use crate::validate::FieldErrors;

pub use categories::{CategoryForm, upsert_category};
pub use products::{ProductForm, VariantForm, upsert_product};
pub use shipping::{ShippingRateForm, upsert_shipping_rate};
pub use stores::submit_store;
pub use subcategories::{SubcategoryForm, upsert_subcategory};

/// The outcome of a submission action.
///
/// Routes branch on `success`; everything a page needs to render the
/// outcome (status, message, the persisted record, an optional redirect
/// for slug changes) is carried here, and no error type crosses the
/// action boundary.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResult<T> {
    /// HTTP-equivalent status code (201, 200, 400, 401, 403, 404, 409, 500).
    pub status_code: u16,
    /// Whether the submission committed.
    pub success: bool,
    /// Human-readable outcome message.
    pub message: String,
    /// The persisted record on success.
    pub data: Option<T>,
    /// Where the client should navigate when a slug-derived URL changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl<T> ActionResult<T> {
    /// 201: a new record was created.
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: 201,
            success: true,
            message: message.into(),
            data: Some(data),
            redirect_url: None,
        }
    }

    /// 200: an existing record was updated.
    pub fn updated(data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            success: true,
            message: message.into(),
            data: Some(data),
            redirect_url: None,
        }
    }

    /// Attach a redirect target (slug-derived URL changed).
    #[must_use]
    pub fn with_redirect(mut self, url: impl Into<String>) -> Self {
        self.redirect_url = Some(url.into());
        self
    }

    /// 401: no authenticated user.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::failure(401, "You must be signed in to do that")
    }

    /// 403: authenticated but lacking the required role.
    ///
    /// Deliberately vague; the message never says which role would have
    /// been sufficient.
    #[must_use]
    pub fn forbidden() -> Self {
        Self::failure(403, "Unauthorized")
    }

    /// 400: required fields are absent. The message enumerates them.
    #[must_use]
    pub fn missing_fields(missing: &[&str]) -> Self {
        Self::failure(400, format!("Missing required fields: {}", missing.join(", ")))
    }

    /// 400: schema validation failed; field-level messages joined.
    #[must_use]
    pub fn invalid(errors: &FieldErrors) -> Self {
        Self::failure(400, errors.to_string())
    }

    /// 404: the record being updated no longer exists.
    #[must_use]
    pub fn not_found(entity: &str) -> Self {
        Self::failure(404, format!("{entity} not found"))
    }

    /// 409: a uniqueness check failed, naming the conflicting field.
    #[must_use]
    pub fn conflict(entity: &str, field: ConflictField) -> Self {
        Self::failure(409, format!("{entity} with this {field} already exists"))
    }

    /// 500: unexpected persistence failure. Generic message only; the
    /// real error was already logged server-side.
    #[must_use]
    pub fn internal() -> Self {
        Self::failure(500, "Something went wrong. Please try again.")
    }

    fn failure(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            success: false,
            message: message.into(),
            data: None,
            redirect_url: None,
        }
    }
}

/// Fold an unexpected repository error into a 500 result, logging and
/// capturing the detail server-side.
fn persistence_failure<T>(context: &str, error: &RepositoryError) -> ActionResult<T> {
    let event_id = sentry::capture_error(error);
    tracing::error!(error = %error, sentry_event_id = %event_id, "{context}");
    ActionResult::internal()
}

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_enumerates_names() {
        let result: ActionResult<()> = ActionResult::missing_fields(&["email", "phone"]);
        assert_eq!(result.status_code, 400);
        assert!(!result.success);
        assert_eq!(result.message, "Missing required fields: email, phone");
    }

    #[test]
    fn test_conflict_names_entity_and_field() {
        let result: ActionResult<()> = ActionResult::conflict("Category", ConflictField::Name);
        assert_eq!(result.status_code, 409);
        assert_eq!(result.message, "Category with this name already exists");
    }

    #[test]
    fn test_redirect_attachment() {
        let result = ActionResult::updated((), "ok").with_redirect("/dashboard/seller/stores/acme");
        assert_eq!(
            result.redirect_url.as_deref(),
            Some("/dashboard/seller/stores/acme")
        );
    }
}
