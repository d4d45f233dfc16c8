//! Category and subcategory models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tangelo_core::{CategoryId, Slug, SubcategoryId};

/// A top-level product category.
///
/// Name and slug are unique across all categories.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: Slug,
    pub image_url: String,
    pub image_public_id: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating or updating a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
    pub slug: Slug,
    pub image_url: String,
    pub image_public_id: String,
    pub featured: bool,
}

/// A subcategory nested under a [`Category`].
///
/// Name and slug are unique within the parent category, not globally.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub category_id: CategoryId,
    pub name: String,
    pub slug: Slug,
    pub image_url: String,
    pub image_public_id: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating or updating a subcategory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcategoryInput {
    pub category_id: CategoryId,
    pub name: String,
    pub slug: Slug,
    pub image_url: String,
    pub image_public_id: String,
    pub featured: bool,
}
