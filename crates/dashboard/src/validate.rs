//! Field-level validation.
//!
//! Validation happens twice: per step while the seller walks the wizard,
//! and once more over the whole draft inside the submission action. Both
//! paths go through the functions here so the rules cannot drift apart.

use rust_decimal::Decimal;

use tangelo_core::{Email, Phone, Slug};

use crate::models::{ShippingDefaults, StoreInput};
use crate::wizard::StoreDraft;

/// Default carrier label applied when the seller leaves the field blank.
pub const DEFAULT_SHIPPING_SERVICE: &str = "International shipping";
/// Default delivery window in days.
pub const DEFAULT_DELIVERY_MIN_DAYS: i32 = 7;
pub const DEFAULT_DELIVERY_MAX_DAYS: i32 = 31;
/// Default return policy text.
pub const DEFAULT_RETURN_POLICY: &str = "Returns accepted within 30 days of delivery.";

/// Fields a store draft must carry before submission.
pub const REQUIRED_STORE_FIELDS: &[&str] = &[
    "name",
    "description",
    "email",
    "phone",
    "logo_url",
    "cover_url",
];

/// A validation failure attached to one input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    /// Build a field error.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A collection of [`FieldError`]s, rendered inline next to inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// An empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Add an error for `field`.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Whether no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The recorded errors.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// The first message recorded for `field`, if any.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Convert into `Err(self)` unless empty.
    ///
    /// # Errors
    ///
    /// Returns `self` if any error was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{error}")?;
            first = false;
        }
        Ok(())
    }
}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

fn is_blank(value: Option<&String>) -> bool {
    value.is_none_or(|s| s.trim().is_empty())
}

/// Enumerate the required store fields absent from `draft`.
///
/// The returned names match [`REQUIRED_STORE_FIELDS`] order exactly.
#[must_use]
pub fn missing_store_fields(draft: &StoreDraft) -> Vec<&'static str> {
    let mut missing = Vec::new();
    for &field in REQUIRED_STORE_FIELDS {
        let absent = match field {
            "name" => is_blank(draft.name.as_ref()),
            "description" => is_blank(draft.description.as_ref()),
            "email" => is_blank(draft.email.as_ref()),
            "phone" => is_blank(draft.phone.as_ref()),
            "logo_url" => is_blank(draft.logo_url.as_ref()),
            "cover_url" => is_blank(draft.cover_url.as_ref()),
            _ => false,
        };
        if absent {
            missing.push(field);
        }
    }
    missing
}

/// Validate the basic-info step slice (name, description, slug, images).
///
/// # Errors
///
/// Returns every failing field with its message.
pub fn validate_store_basics(draft: &StoreDraft) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    match draft.name.as_deref().map(str::trim) {
        None | Some("") => errors.push("name", "Store name is required"),
        Some(name) if name.len() < 2 => errors.push("name", "Store name is too short"),
        Some(name) if name.len() > 80 => {
            errors.push("name", "Store name must be at most 80 characters");
        }
        Some(_) => {}
    }

    if is_blank(draft.description.as_ref()) {
        errors.push("description", "Description is required");
    }

    if let Some(slug) = draft.slug.as_deref().map(str::trim).filter(|s| !s.is_empty())
        && let Err(e) = Slug::parse(slug)
    {
        errors.push("slug", e.to_string());
    }

    if is_blank(draft.logo_url.as_ref()) {
        errors.push("logo_url", "A store logo is required");
    }
    if is_blank(draft.cover_url.as_ref()) {
        errors.push("cover_url", "A cover image is required");
    }

    errors.into_result()
}

/// Validate the contact step slice (email, phone).
///
/// # Errors
///
/// Returns every failing field with its message.
pub fn validate_store_contact(draft: &StoreDraft) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    match draft.email.as_deref().map(str::trim) {
        None | Some("") => errors.push("email", "Email is required"),
        Some(email) => {
            if let Err(e) = Email::parse(email) {
                errors.push("email", e.to_string());
            }
        }
    }

    match draft.phone.as_deref().map(str::trim) {
        None | Some("") => errors.push("phone", "Phone number is required"),
        Some(phone) => {
            if let Err(e) = Phone::parse(phone) {
                errors.push("phone", e.to_string());
            }
        }
    }

    errors.into_result()
}

/// Validate the shipping-policy step slice.
///
/// All fields are optional (defaults apply at submission), but anything
/// provided must be in range.
///
/// # Errors
///
/// Returns every failing field with its message.
pub fn validate_store_shipping(draft: &StoreDraft) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    for (field, value) in [
        ("fee_per_item", draft.fee_per_item),
        ("fee_additional_item", draft.fee_additional_item),
        ("fee_per_kg", draft.fee_per_kg),
        ("fee_fixed", draft.fee_fixed),
    ] {
        if let Some(fee) = value
            && fee < Decimal::ZERO
        {
            errors.push(field, "Fee cannot be negative");
        }
    }

    let min = draft.delivery_min_days;
    let max = draft.delivery_max_days;
    if let Some(min) = min
        && min < 1
    {
        errors.push("delivery_min_days", "Minimum delivery time must be at least 1 day");
    }
    if let Some(max) = max
        && max < 1
    {
        errors.push("delivery_max_days", "Maximum delivery time must be at least 1 day");
    }
    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        errors.push(
            "delivery_max_days",
            "Maximum delivery time cannot be earlier than the minimum",
        );
    }

    errors.into_result()
}

/// Validate a complete draft and convert it into a [`StoreInput`].
///
/// Assumes required-field presence was already reported via
/// [`missing_store_fields`]; presence failures still surface here as field
/// errors rather than panics.
///
/// # Errors
///
/// Returns every failing field with its message.
pub fn validate_store_draft(draft: &StoreDraft) -> Result<StoreInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    validate_store_basics(draft).unwrap_or_else(|e| {
        for error in e {
            errors.push(error.field, error.message);
        }
    });
    validate_store_contact(draft).unwrap_or_else(|e| {
        for error in e {
            errors.push(error.field, error.message);
        }
    });
    validate_store_shipping(draft).unwrap_or_else(|e| {
        for error in e {
            errors.push(error.field, error.message);
        }
    });
    errors.into_result()?;

    // Everything parsed below succeeded in the step validators above.
    let name = draft.name.as_deref().unwrap_or_default().trim().to_owned();
    let slug = match draft.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Slug::parse(raw),
        None => Slug::generate(&name),
    }
    .map_err(|e| {
        let mut errors = FieldErrors::new();
        errors.push("slug", e.to_string());
        errors
    })?;
    let email = Email::parse(draft.email.as_deref().unwrap_or_default().trim())
        .map_err(|e| single_error("email", e.to_string()))?;
    let phone = Phone::parse(draft.phone.as_deref().unwrap_or_default().trim())
        .map_err(|e| single_error("phone", e.to_string()))?;

    Ok(StoreInput {
        name,
        slug,
        description: draft.description.as_deref().unwrap_or_default().trim().to_owned(),
        email,
        phone,
        logo_url: draft.logo_url.clone().unwrap_or_default(),
        logo_public_id: draft.logo_public_id.clone().unwrap_or_default(),
        cover_url: draft.cover_url.clone().unwrap_or_default(),
        cover_public_id: draft.cover_public_id.clone().unwrap_or_default(),
        shipping: ShippingDefaults {
            shipping_service: draft
                .shipping_service
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SHIPPING_SERVICE.to_owned()),
            fee_per_item: draft.fee_per_item.unwrap_or(Decimal::ZERO),
            fee_additional_item: draft.fee_additional_item.unwrap_or(Decimal::ZERO),
            fee_per_kg: draft.fee_per_kg.unwrap_or(Decimal::ZERO),
            fee_fixed: draft.fee_fixed.unwrap_or(Decimal::ZERO),
            delivery_min_days: draft.delivery_min_days.unwrap_or(DEFAULT_DELIVERY_MIN_DAYS),
            delivery_max_days: draft.delivery_max_days.unwrap_or(DEFAULT_DELIVERY_MAX_DAYS),
            return_policy: draft
                .return_policy
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_RETURN_POLICY.to_owned()),
        },
    })
}

fn single_error(field: &'static str, message: String) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.push(field, message);
    errors
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::wizard::StoreDraft;

    fn complete_draft() -> StoreDraft {
        StoreDraft {
            name: Some("Acme Outdoors".to_string()),
            description: Some("Everything for the trail.".to_string()),
            slug: Some("acme-outdoors".to_string()),
            email: Some("store@acme.test".to_string()),
            phone: Some("+15551234567".to_string()),
            logo_url: Some("http://img/logo.png".to_string()),
            logo_public_id: Some("logos/acme".to_string()),
            cover_url: Some("http://img/cover.png".to_string()),
            cover_public_id: Some("covers/acme".to_string()),
            shipping_service: Some("Acme Post".to_string()),
            fee_per_item: Some(Decimal::new(250, 2)),
            fee_additional_item: Some(Decimal::new(100, 2)),
            fee_per_kg: Some(Decimal::ZERO),
            fee_fixed: Some(Decimal::ZERO),
            delivery_min_days: Some(5),
            delivery_max_days: Some(14),
            return_policy: Some("30 day returns".to_string()),
        }
    }

    #[test]
    fn test_missing_fields_empty_for_complete_draft() {
        assert!(missing_store_fields(&complete_draft()).is_empty());
    }

    #[test]
    fn test_missing_fields_names_absent_keys() {
        let draft = StoreDraft {
            email: None,
            ..complete_draft()
        };
        assert_eq!(missing_store_fields(&draft), vec!["email"]);

        let draft = StoreDraft {
            name: Some("   ".to_string()),
            phone: None,
            ..complete_draft()
        };
        assert_eq!(missing_store_fields(&draft), vec!["name", "phone"]);
    }

    #[test]
    fn test_missing_fields_empty_draft_lists_all() {
        assert_eq!(
            missing_store_fields(&StoreDraft::default()),
            REQUIRED_STORE_FIELDS.to_vec()
        );
    }

    #[test]
    fn test_basics_step_rejects_short_name() {
        let draft = StoreDraft {
            name: Some("A".to_string()),
            ..complete_draft()
        };
        let errors = validate_store_basics(&draft).unwrap_err();
        assert!(errors.message_for("name").unwrap().contains("too short"));
    }

    #[test]
    fn test_contact_step_reports_both_fields() {
        let draft = StoreDraft {
            email: Some("not-an-email".to_string()),
            phone: Some("abc".to_string()),
            ..complete_draft()
        };
        let errors = validate_store_contact(&draft).unwrap_err();
        assert!(errors.message_for("email").is_some());
        assert!(errors.message_for("phone").is_some());
    }

    #[test]
    fn test_shipping_step_rejects_inverted_window() {
        let draft = StoreDraft {
            delivery_min_days: Some(10),
            delivery_max_days: Some(3),
            ..complete_draft()
        };
        let errors = validate_store_shipping(&draft).unwrap_err();
        assert!(errors.message_for("delivery_max_days").is_some());
    }

    #[test]
    fn test_shipping_step_rejects_negative_fee() {
        let draft = StoreDraft {
            fee_per_item: Some(Decimal::NEGATIVE_ONE),
            ..complete_draft()
        };
        let errors = validate_store_shipping(&draft).unwrap_err();
        assert_eq!(errors.message_for("fee_per_item").unwrap(), "Fee cannot be negative");
    }

    #[test]
    fn test_full_validation_builds_input() {
        let input = validate_store_draft(&complete_draft()).unwrap();
        assert_eq!(input.name, "Acme Outdoors");
        assert_eq!(input.slug.as_str(), "acme-outdoors");
        assert_eq!(input.email.as_str(), "store@acme.test");
        assert_eq!(input.shipping.delivery_min_days, 5);
    }

    #[test]
    fn test_full_validation_generates_slug_from_name() {
        let draft = StoreDraft {
            slug: None,
            ..complete_draft()
        };
        let input = validate_store_draft(&draft).unwrap();
        assert_eq!(input.slug.as_str(), "acme-outdoors");
    }

    #[test]
    fn test_full_validation_lowercases_slug() {
        let draft = StoreDraft {
            slug: Some("Acme-Outdoors".to_string()),
            ..complete_draft()
        };
        let input = validate_store_draft(&draft).unwrap();
        assert_eq!(input.slug.as_str(), "acme-outdoors");
    }

    #[test]
    fn test_full_validation_applies_shipping_defaults() {
        let draft = StoreDraft {
            shipping_service: None,
            fee_per_item: None,
            delivery_min_days: None,
            delivery_max_days: None,
            return_policy: Some("  ".to_string()),
            ..complete_draft()
        };
        let input = validate_store_draft(&draft).unwrap();
        assert_eq!(input.shipping.shipping_service, DEFAULT_SHIPPING_SERVICE);
        assert_eq!(input.shipping.fee_per_item, Decimal::ZERO);
        assert_eq!(input.shipping.delivery_min_days, DEFAULT_DELIVERY_MIN_DAYS);
        assert_eq!(input.shipping.delivery_max_days, DEFAULT_DELIVERY_MAX_DAYS);
        assert_eq!(input.shipping.return_policy, DEFAULT_RETURN_POLICY);
    }

    #[test]
    fn test_full_validation_collects_errors_across_steps() {
        let draft = StoreDraft {
            name: Some("A".to_string()),
            email: Some("nope".to_string()),
            delivery_min_days: Some(0),
            ..complete_draft()
        };
        let errors = validate_store_draft(&draft).unwrap_err();
        assert!(errors.message_for("name").is_some());
        assert!(errors.message_for("email").is_some());
        assert!(errors.message_for("delivery_min_days").is_some());
    }
}
