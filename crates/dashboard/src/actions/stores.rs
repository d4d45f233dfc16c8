//! Store submission action.

use tracing::instrument;

use tangelo_core::StoreId;

use crate::db::StoreRepository;
use crate::models::{CurrentUser, Store};
use crate::validate::{missing_store_fields, validate_store_draft};
use crate::wizard::StoreDraft;

use super::{ActionResult, persistence_failure};

/// Validate a completed wizard draft and commit it as a store.
///
/// `existing` switches between create (None) and update of an owned store.
/// Updates that change the store slug carry a `redirect_url` to the
/// store's new settings page.
#[instrument(skip(repo, user, draft), fields(existing = ?existing))]
pub async fn submit_store<R: StoreRepository>(
    repo: &R,
    user: Option<&CurrentUser>,
    draft: &StoreDraft,
    existing: Option<StoreId>,
) -> ActionResult<Store> {
    // 1. Authenticated
    let Some(user) = user else {
        return ActionResult::unauthorized();
    };
    // 2. Authorized
    if !user.role.can_sell() {
        return ActionResult::forbidden();
    }

    // 3. Required fields present
    let missing = missing_store_fields(draft);
    if !missing.is_empty() {
        return ActionResult::missing_fields(&missing);
    }

    // 4. Full schema validation
    let input = match validate_store_draft(draft) {
        Ok(input) => input,
        Err(errors) => return ActionResult::invalid(&errors),
    };

    // Updates must target a store the caller owns.
    let previous = match existing {
        Some(id) => match repo.get(id).await {
            Ok(Some(store)) if store.owner_id == user.id => Some(store),
            Ok(Some(_)) => return ActionResult::forbidden(),
            Ok(None) => return ActionResult::not_found("Store"),
            Err(e) => return persistence_failure("Failed to load store for update", &e),
        },
        None => None,
    };

    // 5. Uniqueness against persisted records, excluding our own row
    match repo
        .find_conflict(&input.name, &input.slug, &input.email, &input.phone, existing)
        .await
    {
        Ok(Some(field)) => return ActionResult::conflict("Store", field),
        Ok(None) => {}
        Err(e) => return persistence_failure("Store conflict check failed", &e),
    }

    match previous {
        None => match repo.insert(user.id, &input).await {
            Ok(store) => {
                ActionResult::created(store, "Store submitted and awaiting review")
            }
            Err(e) => persistence_failure("Store insert failed", &e),
        },
        Some(previous) => {
            let slug_changed = previous.slug != input.slug;
            match repo.update(previous.id, &input).await {
                Ok(store) => {
                    let result = ActionResult::updated(store, "Store settings saved");
                    if slug_changed {
                        let slug = &input.slug;
                        result.with_redirect(format!("/dashboard/seller/stores/{slug}/settings"))
                    } else {
                        result
                    }
                }
                Err(e) => persistence_failure("Store update failed", &e),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use tangelo_core::{Role, UserId};

    use super::super::testing::{MemoryStoreRepository, current_user};
    use super::*;

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
            fee_additional_item: Some(Decimal::ZERO),
            fee_per_kg: Some(Decimal::ZERO),
            fee_fixed: Some(Decimal::ZERO),
            delivery_min_days: Some(5),
            delivery_max_days: Some(14),
            return_policy: Some("30 day returns".to_string()),
        }
    }

    #[tokio::test]
    async fn test_rejects_unauthenticated() {
        let repo = MemoryStoreRepository::default();
        let result = submit_store(&repo, None, &complete_draft(), None).await;
        assert_eq!(result.status_code, 401);
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_rejects_plain_user_role() {
        let repo = MemoryStoreRepository::default();
        let user = current_user(1, Role::User);
        let result = submit_store(&repo, Some(&user), &complete_draft(), None).await;
        assert_eq!(result.status_code, 403);
        assert_eq!(result.message, "Unauthorized");
    }

    #[tokio::test]
    async fn test_missing_email_blocks_with_field_name() {
        let repo = MemoryStoreRepository::default();
        let user = current_user(1, Role::Seller);
        let draft = StoreDraft {
            email: None,
            ..complete_draft()
        };
        let result = submit_store(&repo, Some(&user), &draft, None).await;
        assert_eq!(result.status_code, 400);
        assert_eq!(result.message, "Missing required fields: email");
    }

    #[tokio::test]
    async fn test_create_persists_normalized_fields() {
        let repo = MemoryStoreRepository::default();
        let user = current_user(1, Role::Seller);
        let draft = StoreDraft {
            slug: Some("Acme-Outdoors".to_string()),
            ..complete_draft()
        };

        let result = submit_store(&repo, Some(&user), &draft, None).await;
        assert_eq!(result.status_code, 201);
        assert!(result.success);

        let store = result.data.unwrap();
        assert_eq!(store.name, "Acme Outdoors");
        assert_eq!(store.slug.as_str(), "acme-outdoors");
        assert_eq!(store.owner_id, UserId::new(1));

        // Round-trip: fetching by the returned id yields the same fields
        let fetched = repo.get_stored(store.id).unwrap();
        assert_eq!(fetched.name, store.name);
        assert_eq!(fetched.email, store.email);
    }

    #[tokio::test]
    async fn test_slug_conflict_names_slug() {
        let repo = MemoryStoreRepository::default();
        let user = current_user(1, Role::Seller);
        submit_store(&repo, Some(&user), &complete_draft(), None).await;

        // Different name/email/phone, same slug
        let draft = StoreDraft {
            name: Some("Totally Different".to_string()),
            email: Some("other@acme.test".to_string()),
            phone: Some("+15559876543".to_string()),
            ..complete_draft()
        };
        let result = submit_store(&repo, Some(&user), &draft, None).await;
        assert_eq!(result.status_code, 409);
        assert_eq!(result.message, "Store with this slug already exists");
    }

    #[tokio::test]
    async fn test_duplicate_submission_conflicts_on_name() {
        let repo = MemoryStoreRepository::default();
        let user = current_user(1, Role::Seller);

        let first = submit_store(&repo, Some(&user), &complete_draft(), None).await;
        assert_eq!(first.status_code, 201);

        let second = submit_store(&repo, Some(&user), &complete_draft(), None).await;
        assert_eq!(second.status_code, 409);
        assert_eq!(second.message, "Store with this name already exists");
    }

    #[tokio::test]
    async fn test_update_with_unchanged_values_is_idempotent() {
        let repo = MemoryStoreRepository::default();
        let user = current_user(1, Role::Seller);
        let created = submit_store(&repo, Some(&user), &complete_draft(), None)
            .await
            .data
            .unwrap();

        // Same values, excluding our own row from the conflict check
        let result = submit_store(&repo, Some(&user), &complete_draft(), Some(created.id)).await;
        assert_eq!(result.status_code, 200);
        assert!(result.success);
        assert!(result.redirect_url.is_none());
    }

    #[tokio::test]
    async fn test_update_slug_change_carries_redirect() {
        let repo = MemoryStoreRepository::default();
        let user = current_user(1, Role::Seller);
        let created = submit_store(&repo, Some(&user), &complete_draft(), None)
            .await
            .data
            .unwrap();

        let draft = StoreDraft {
            slug: Some("acme-gear".to_string()),
            ..complete_draft()
        };
        let result = submit_store(&repo, Some(&user), &draft, Some(created.id)).await;
        assert_eq!(result.status_code, 200);
        assert_eq!(
            result.redirect_url.as_deref(),
            Some("/dashboard/seller/stores/acme-gear/settings")
        );
    }

    #[tokio::test]
    async fn test_update_of_foreign_store_is_forbidden() {
        let repo = MemoryStoreRepository::default();
        let owner = current_user(1, Role::Seller);
        let created = submit_store(&repo, Some(&owner), &complete_draft(), None)
            .await
            .data
            .unwrap();

        let intruder = current_user(2, Role::Seller);
        let result = submit_store(&repo, Some(&intruder), &complete_draft(), Some(created.id)).await;
        assert_eq!(result.status_code, 403);
    }

    #[tokio::test]
    async fn test_update_of_missing_store_is_not_found() {
        let repo = MemoryStoreRepository::default();
        let user = current_user(1, Role::Seller);
        let result = submit_store(
            &repo,
            Some(&user),
            &complete_draft(),
            Some(StoreId::new(999)),
        )
        .await;
        assert_eq!(result.status_code, 404);
        assert_eq!(result.message, "Store not found");
    }
}
