//! Product submission action.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use tracing::instrument;

use tangelo_core::{CategoryId, ProductId, Slug, StoreId, SubcategoryId};

use crate::db::{ProductRepository, StoreRepository};
use crate::models::{
    CurrentUser, Product, ProductInput, VariantImage, VariantInput, VariantSize, VariantSpec,
};
use crate::validate::FieldErrors;

use super::{ActionResult, persistence_failure};

/// Raw product form input, as posted by the seller UI.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ProductForm {
    pub store_id: Option<StoreId>,
    pub name: String,
    /// Optional; derived from `name` when blank.
    pub slug: Option<String>,
    pub description: String,
    pub brand: String,
    pub category_id: Option<CategoryId>,
    pub subcategory_id: Option<SubcategoryId>,
    #[serde(default)]
    pub variants: Vec<VariantForm>,
}

/// One variant group within a [`ProductForm`].
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct VariantForm {
    pub name: String,
    /// Optional; derived from the variant name when blank.
    pub slug: Option<String>,
    pub sku: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub images: Vec<VariantImage>,
    #[serde(default)]
    pub sizes: Vec<VariantSize>,
    #[serde(default)]
    pub specs: Vec<VariantSpec>,
}

/// Upper bound on the discount percentage of a size row.
const MAX_DISCOUNT: Decimal = Decimal::from_parts(99, 0, 0, false, 0);

fn validate_variant(variant: &VariantForm, errors: &mut FieldErrors) -> Option<VariantInput> {
    let name = variant.name.trim();
    if name.is_empty() {
        errors.push("variants", "Every variant needs a name");
        return None;
    }

    let slug = match variant.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Slug::parse(raw),
        None => Slug::generate(name),
    };
    let slug = match slug {
        Ok(slug) => slug,
        Err(e) => {
            errors.push("variants", format!("Variant '{name}': {e}"));
            return None;
        }
    };

    if variant.images.is_empty() {
        errors.push("variants", format!("Variant '{name}' needs at least one image"));
    }
    if variant.sizes.is_empty() {
        errors.push("variants", format!("Variant '{name}' needs at least one size"));
    }
    for size in &variant.sizes {
        if size.quantity < 0 {
            errors.push("variants", format!("Variant '{name}': quantity cannot be negative"));
        }
        if size.price <= Decimal::ZERO {
            errors.push("variants", format!("Variant '{name}': price must be positive"));
        }
        if size.discount < Decimal::ZERO || size.discount > MAX_DISCOUNT {
            errors.push(
                "variants",
                format!("Variant '{name}': discount must be between 0 and 99"),
            );
        }
    }

    Some(VariantInput {
        name: name.to_owned(),
        slug,
        sku: variant.sku.trim().to_owned(),
        keywords: variant.keywords.clone(),
        colors: variant.colors.clone(),
        images: variant.images.clone(),
        sizes: variant.sizes.clone(),
        specs: variant.specs.clone(),
    })
}

fn validate(form: &ProductForm) -> Result<ProductInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = form.name.trim();
    if name.len() > 120 {
        errors.push("name", "Product name must be at most 120 characters");
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

    let mut variants = Vec::with_capacity(form.variants.len());
    let mut seen_slugs = BTreeSet::new();
    for variant in &form.variants {
        if let Some(input) = validate_variant(variant, &mut errors) {
            if !seen_slugs.insert(input.slug.clone()) {
                errors.push(
                    "variants",
                    format!("Duplicate variant slug '{}' in product", input.slug),
                );
            }
            variants.push(input);
        }
    }

    errors.into_result()?;

    // Presence was checked by the caller, formats above.
    #[allow(clippy::unwrap_used)]
    let (store_id, slug, category_id, subcategory_id) = (
        form.store_id.unwrap(),
        slug.unwrap(),
        form.category_id.unwrap(),
        form.subcategory_id.unwrap(),
    );
    Ok(ProductInput {
        store_id,
        name: name.to_owned(),
        slug,
        description: form.description.trim().to_owned(),
        brand: form.brand.trim().to_owned(),
        category_id,
        subcategory_id,
        variants,
    })
}

/// Validate seller product input and commit the whole aggregate.
///
/// `existing` switches between create (None) and update; updates rewrite
/// the variant set wholesale inside one transaction.
#[instrument(skip(products, stores, user, form), fields(name = %form.name, existing = ?existing))]
pub async fn upsert_product<R: ProductRepository, S: StoreRepository>(
    products: &R,
    stores: &S,
    user: Option<&CurrentUser>,
    form: &ProductForm,
    existing: Option<ProductId>,
) -> ActionResult<Product> {
    // 1. Authenticated
    let Some(user) = user else {
        return ActionResult::unauthorized();
    };
    // 2. Authorized
    if !user.role.can_sell() {
        return ActionResult::forbidden();
    }

    // 3. Required fields present
    let mut missing = Vec::new();
    if form.store_id.is_none() {
        missing.push("store_id");
    }
    if form.name.trim().is_empty() {
        missing.push("name");
    }
    if form.description.trim().is_empty() {
        missing.push("description");
    }
    if form.brand.trim().is_empty() {
        missing.push("brand");
    }
    if form.category_id.is_none() {
        missing.push("category_id");
    }
    if form.subcategory_id.is_none() {
        missing.push("subcategory_id");
    }
    if form.variants.is_empty() {
        missing.push("variants");
    }
    if !missing.is_empty() {
        return ActionResult::missing_fields(&missing);
    }

    // The product must belong to a store the caller owns.
    #[allow(clippy::unwrap_used)] // presence checked above
    let store_id = form.store_id.unwrap();
    match stores.get(store_id).await {
        Ok(Some(store)) if store.owner_id == user.id => {}
        Ok(Some(_)) => return ActionResult::forbidden(),
        Ok(None) => return ActionResult::not_found("Store"),
        Err(e) => return persistence_failure("Store lookup failed", &e),
    }

    // 4. Schema validation
    let input = match validate(form) {
        Ok(input) => input,
        Err(errors) => return ActionResult::invalid(&errors),
    };

    // Updates must target a product of that same store.
    if let Some(id) = existing {
        match products.get(id).await {
            Ok(Some(product)) if product.store_id == store_id => {}
            Ok(Some(_)) => return ActionResult::forbidden(),
            Ok(None) => return ActionResult::not_found("Product"),
            Err(e) => return persistence_failure("Product lookup failed", &e),
        }
    }

    // 5. Uniqueness, excluding our own row on update
    match products.find_conflict(&input.slug, existing).await {
        Ok(Some(field)) => return ActionResult::conflict("Product", field),
        Ok(None) => {}
        Err(e) => return persistence_failure("Product conflict check failed", &e),
    }

    match existing {
        None => match products.insert(&input).await {
            Ok(product) => ActionResult::created(product, "Product created"),
            Err(e) => persistence_failure("Product insert failed", &e),
        },
        Some(id) => match products.update(id, &input).await {
            Ok(product) => ActionResult::updated(product, "Product saved"),
            Err(crate::db::RepositoryError::NotFound) => ActionResult::not_found("Product"),
            Err(e) => persistence_failure("Product update failed", &e),
        },
    }
}
