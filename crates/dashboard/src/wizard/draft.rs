//! The in-progress store draft.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A partial store record accumulated across wizard steps.
///
/// Every field is optional: earlier steps may be incomplete while the
/// seller moves around, and only the final submission requires the full
/// set. Raw strings are kept as typed-in (email, phone, slug); parsing
/// into core types happens in `validate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    pub logo_public_id: Option<String>,
    pub cover_url: Option<String>,
    pub cover_public_id: Option<String>,
    pub shipping_service: Option<String>,
    pub fee_per_item: Option<Decimal>,
    pub fee_additional_item: Option<Decimal>,
    pub fee_per_kg: Option<Decimal>,
    pub fee_fixed: Option<Decimal>,
    pub delivery_min_days: Option<i32>,
    pub delivery_max_days: Option<i32>,
    pub return_policy: Option<String>,
}

/// A shallow patch over a [`StoreDraft`].
///
/// Same shape as the draft; `Some` fields overwrite, `None` fields leave
/// the draft untouched. Deserialized straight from step form bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDraftPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    pub logo_public_id: Option<String>,
    pub cover_url: Option<String>,
    pub cover_public_id: Option<String>,
    pub shipping_service: Option<String>,
    pub fee_per_item: Option<Decimal>,
    pub fee_additional_item: Option<Decimal>,
    pub fee_per_kg: Option<Decimal>,
    pub fee_fixed: Option<Decimal>,
    pub delivery_min_days: Option<i32>,
    pub delivery_max_days: Option<i32>,
    pub return_policy: Option<String>,
}

impl StoreDraftPatch {
    /// Drop empty-string fields.
    ///
    /// HTML forms post `""` for untouched inputs; an empty string must not
    /// clobber a value entered on an earlier visit to the step.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        fn drop_empty(slot: &mut Option<String>) {
            if slot.as_deref().is_some_and(|s| s.trim().is_empty()) {
                *slot = None;
            }
        }

        drop_empty(&mut self.name);
        drop_empty(&mut self.description);
        drop_empty(&mut self.slug);
        drop_empty(&mut self.email);
        drop_empty(&mut self.phone);
        drop_empty(&mut self.logo_url);
        drop_empty(&mut self.logo_public_id);
        drop_empty(&mut self.cover_url);
        drop_empty(&mut self.cover_public_id);
        drop_empty(&mut self.shipping_service);
        drop_empty(&mut self.return_policy);
        self
    }
}

impl StoreDraft {
    /// Shallow-merge `patch` into the draft.
    ///
    /// `Some` fields overwrite the current value; `None` fields are kept.
    pub fn apply(&mut self, patch: StoreDraftPatch) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = patch.$field {
                        self.$field = Some(value);
                    }
                )*
            };
        }

        merge!(
            name,
            description,
            slug,
            email,
            phone,
            logo_url,
            logo_public_id,
            cover_url,
            cover_public_id,
            shipping_service,
            fee_per_item,
            fee_additional_item,
            fee_per_kg,
            fee_fixed,
            delivery_min_days,
            delivery_max_days,
            return_policy,
        );
    }
}
