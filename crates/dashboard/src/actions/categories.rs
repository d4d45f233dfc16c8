//! Category submission action.

use tracing::instrument;

use tangelo_core::{CategoryId, Slug};

use crate::db::CategoryRepository;
use crate::models::{Category, CategoryInput, CurrentUser};
use crate::validate::FieldErrors;

use super::{ActionResult, persistence_failure};

/// Raw category form input, as posted by the admin UI.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct CategoryForm {
    pub name: String,
    /// Optional; derived from `name` when blank.
    pub slug: Option<String>,
    pub image_url: String,
    pub image_public_id: String,
    #[serde(default)]
    pub featured: bool,
}

fn validate(form: &CategoryForm) -> Result<CategoryInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = form.name.trim();
    if name.is_empty() {
        errors.push("name", "Category name is required");
    } else if name.len() > 80 {
        errors.push("name", "Category name must be at most 80 characters");
    }

    let slug = match form.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Slug::parse(raw),
        None => Slug::generate(name),
    };
    let slug = match slug {
        Ok(slug) => Some(slug),
        Err(e) => {
            errors.push("slug", e.to_string());
            None
        }
    };

    errors.into_result()?;

    #[allow(clippy::unwrap_used)] // errors is empty, so slug parsed
    let slug = slug.unwrap();
    Ok(CategoryInput {
        name: name.to_owned(),
        slug,
        image_url: form.image_url.trim().to_owned(),
        image_public_id: form.image_public_id.trim().to_owned(),
        featured: form.featured,
    })
}

/// Validate admin category input and commit it.
///
/// `existing` switches between create (None) and update.
#[instrument(skip(repo, user, form), fields(name = %form.name, existing = ?existing))]
pub async fn upsert_category<R: CategoryRepository>(
    repo: &R,
    user: Option<&CurrentUser>,
    form: &CategoryForm,
    existing: Option<CategoryId>,
) -> ActionResult<Category> {
    // 1. Authenticated
    let Some(user) = user else {
        return ActionResult::unauthorized();
    };
    // 2. Authorized: the category tree is admin-owned
    if !user.role.is_admin() {
        return ActionResult::forbidden();
    }

    // 3. Required fields present
    let mut missing = Vec::new();
    if form.name.trim().is_empty() {
        missing.push("name");
    }
    if form.image_url.trim().is_empty() {
        missing.push("image_url");
    }
    if !missing.is_empty() {
        return ActionResult::missing_fields(&missing);
    }

    // 4. Schema validation
    let input = match validate(form) {
        Ok(input) => input,
        Err(errors) => return ActionResult::invalid(&errors),
    };

    // 5. Uniqueness, excluding our own row on update
    match repo.find_conflict(&input.name, &input.slug, existing).await {
        Ok(Some(field)) => return ActionResult::conflict("Category", field),
        Ok(None) => {}
        Err(e) => return persistence_failure("Category conflict check failed", &e),
    }

    match existing {
        None => match repo.insert(&input).await {
            Ok(category) => ActionResult::created(category, "Category created"),
            Err(e) => persistence_failure("Category insert failed", &e),
        },
        Some(id) => match repo.update(id, &input).await {
            Ok(category) => ActionResult::updated(category, "Category saved"),
            Err(crate::db::RepositoryError::NotFound) => ActionResult::not_found("Category"),
            Err(e) => persistence_failure("Category update failed", &e),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tangelo_core::Role;

    use super::super::testing::{MemoryCategoryRepository, current_user};
    use super::*;

    fn acme_form() -> CategoryForm {
        CategoryForm {
            name: "Acme".to_string(),
            slug: Some("acme".to_string()),
            image_url: "http://x/img.png".to_string(),
            image_public_id: "cat/acme".to_string(),
            featured: false,
        }
    }

    #[tokio::test]
    async fn test_seller_cannot_touch_categories() {
        let repo = MemoryCategoryRepository::default();
        let user = current_user(1, Role::Seller);
        let result = upsert_category(&repo, Some(&user), &acme_form(), None).await;
        assert_eq!(result.status_code, 403);
    }

    #[tokio::test]
    async fn test_create_succeeds_with_201() {
        let repo = MemoryCategoryRepository::default();
        let user = current_user(1, Role::Admin);
        let result = upsert_category(&repo, Some(&user), &acme_form(), None).await;
        assert_eq!(result.status_code, 201);
        assert!(result.success);

        let category = result.data.unwrap();
        assert_eq!(category.name, "Acme");
        assert_eq!(category.slug.as_str(), "acme");
        assert!(!category.featured);
    }

    #[tokio::test]
    async fn test_duplicate_name_fails_naming_name() {
        let repo = MemoryCategoryRepository::default();
        let user = current_user(1, Role::Admin);

        let first = upsert_category(&repo, Some(&user), &acme_form(), None).await;
        assert_eq!(first.status_code, 201);

        let second = upsert_category(&repo, Some(&user), &acme_form(), None).await;
        assert!(!second.success);
        assert_eq!(second.message, "Category with this name already exists");
    }

    #[tokio::test]
    async fn test_missing_fields_enumerated() {
        let repo = MemoryCategoryRepository::default();
        let user = current_user(1, Role::Admin);
        let form = CategoryForm {
            name: String::new(),
            image_url: String::new(),
            ..acme_form()
        };
        let result = upsert_category(&repo, Some(&user), &form, None).await;
        assert_eq!(result.status_code, 400);
        assert_eq!(result.message, "Missing required fields: name, image_url");
    }

    #[tokio::test]
    async fn test_slug_generated_from_name() {
        let repo = MemoryCategoryRepository::default();
        let user = current_user(1, Role::Admin);
        let form = CategoryForm {
            name: "Home & Garden".to_string(),
            slug: None,
            ..acme_form()
        };
        let result = upsert_category(&repo, Some(&user), &form, None).await;
        assert_eq!(result.data.unwrap().slug.as_str(), "home-garden");
    }

    #[tokio::test]
    async fn test_update_same_values_excludes_own_row() {
        let repo = MemoryCategoryRepository::default();
        let user = current_user(1, Role::Admin);
        let created = upsert_category(&repo, Some(&user), &acme_form(), None)
            .await
            .data
            .unwrap();

        let result = upsert_category(&repo, Some(&user), &acme_form(), Some(created.id)).await;
        assert_eq!(result.status_code, 200);
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_update_missing_category_is_not_found() {
        let repo = MemoryCategoryRepository::default();
        let user = current_user(1, Role::Admin);
        let result = upsert_category(
            &repo,
            Some(&user),
            &acme_form(),
            Some(CategoryId::new(404)),
        )
        .await;
        assert_eq!(result.status_code, 404);
    }
}
