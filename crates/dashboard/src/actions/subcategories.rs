//! Subcategory submission action.

use tracing::instrument;

use tangelo_core::{CategoryId, Slug, SubcategoryId};

use crate::db::{CategoryRepository, SubcategoryRepository};
use crate::models::{CurrentUser, Subcategory, SubcategoryInput};
use crate::validate::FieldErrors;

use super::{ActionResult, persistence_failure};

/// Raw subcategory form input, as posted by the admin UI.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct SubcategoryForm {
    pub category_id: Option<CategoryId>,
    pub name: String,
    /// Optional; derived from `name` when blank.
    pub slug: Option<String>,
    pub image_url: String,
    pub image_public_id: String,
    #[serde(default)]
    pub featured: bool,
}

fn validate(form: &SubcategoryForm, category_id: CategoryId) -> Result<SubcategoryInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = form.name.trim();
    if name.is_empty() {
        errors.push("name", "Subcategory name is required");
    } else if name.len() > 80 {
        errors.push("name", "Subcategory name must be at most 80 characters");
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
    Ok(SubcategoryInput {
        category_id,
        name: name.to_owned(),
        slug,
        image_url: form.image_url.trim().to_owned(),
        image_public_id: form.image_public_id.trim().to_owned(),
        featured: form.featured,
    })
}

/// Validate admin subcategory input and commit it.
///
/// Name/slug uniqueness is scoped to the parent category: two categories
/// may each contain a "Socks" subcategory.
#[instrument(skip(subcategories, categories, user, form), fields(name = %form.name, existing = ?existing))]
pub async fn upsert_subcategory<R: SubcategoryRepository, C: CategoryRepository>(
    subcategories: &R,
    categories: &C,
    user: Option<&CurrentUser>,
    form: &SubcategoryForm,
    existing: Option<SubcategoryId>,
) -> ActionResult<Subcategory> {
    // 1. Authenticated
    let Some(user) = user else {
        return ActionResult::unauthorized();
    };
    // 2. Authorized
    if !user.role.is_admin() {
        return ActionResult::forbidden();
    }

    // 3. Required fields present
    let mut missing = Vec::new();
    if form.category_id.is_none() {
        missing.push("category_id");
    }
    if form.name.trim().is_empty() {
        missing.push("name");
    }
    if form.image_url.trim().is_empty() {
        missing.push("image_url");
    }
    if !missing.is_empty() {
        return ActionResult::missing_fields(&missing);
    }
    let Some(category_id) = form.category_id else {
        return ActionResult::missing_fields(&["category_id"]);
    };

    // 4. Schema validation; the parent category must exist
    let input = match validate(form, category_id) {
        Ok(input) => input,
        Err(errors) => return ActionResult::invalid(&errors),
    };
    match categories.get(category_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return ActionResult::not_found("Category"),
        Err(e) => return persistence_failure("Parent category lookup failed", &e),
    }

    // 5. Uniqueness within the parent category
    match subcategories
        .find_conflict(category_id, &input.name, &input.slug, existing)
        .await
    {
        Ok(Some(field)) => return ActionResult::conflict("Subcategory", field),
        Ok(None) => {}
        Err(e) => return persistence_failure("Subcategory conflict check failed", &e),
    }

    match existing {
        None => match subcategories.insert(&input).await {
            Ok(subcategory) => ActionResult::created(subcategory, "Subcategory created"),
            Err(e) => persistence_failure("Subcategory insert failed", &e),
        },
        Some(id) => match subcategories.update(id, &input).await {
            Ok(subcategory) => ActionResult::updated(subcategory, "Subcategory saved"),
            Err(crate::db::RepositoryError::NotFound) => ActionResult::not_found("Subcategory"),
            Err(e) => persistence_failure("Subcategory update failed", &e),
        },
    }
}
