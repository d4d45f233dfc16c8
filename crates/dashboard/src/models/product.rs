//! Product and variant models.
//!
//! A product is an aggregate: the product row plus one or more variants,
//! each owning its ordered images, color list, size/price grid, and spec
//! table. Repositories load and persist the whole aggregate; there is no
//! partial variant update.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tangelo_core::{CategoryId, ProductId, Slug, StoreId, SubcategoryId, VariantId};

/// A product listed by a store.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    pub name: String,
    pub slug: Slug,
    pub description: String,
    pub brand: String,
    pub category_id: CategoryId,
    pub subcategory_id: SubcategoryId,
    pub variants: Vec<Variant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One sellable variant of a product (e.g., a colorway).
#[derive(Debug, Clone, Serialize)]
pub struct Variant {
    pub id: VariantId,
    pub name: String,
    pub slug: Slug,
    pub sku: String,
    pub keywords: Vec<String>,
    pub colors: Vec<String>,
    pub images: Vec<VariantImage>,
    pub sizes: Vec<VariantSize>,
    pub specs: Vec<VariantSpec>,
}

/// An image attached to a variant, ordered by `position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VariantImage {
    pub url: String,
    pub public_id: String,
    pub position: i32,
}

/// One size row of a variant: stock level and pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VariantSize {
    /// Size label (e.g., "M", "42", "One size").
    pub label: String,
    pub quantity: i32,
    pub price: Decimal,
    /// Discount percentage, 0-99.
    pub discount: Decimal,
}

/// One name/value specification row of a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VariantSpec {
    pub name: String,
    pub value: String,
}

/// Validated input for creating or updating a product aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub store_id: StoreId,
    pub name: String,
    pub slug: Slug,
    pub description: String,
    pub brand: String,
    pub category_id: CategoryId,
    pub subcategory_id: SubcategoryId,
    pub variants: Vec<VariantInput>,
}

/// Validated input for one variant within a [`ProductInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantInput {
    pub name: String,
    pub slug: Slug,
    pub sku: String,
    pub keywords: Vec<String>,
    pub colors: Vec<String>,
    pub images: Vec<VariantImage>,
    pub sizes: Vec<VariantSize>,
    pub specs: Vec<VariantSpec>,
}

impl VariantInput {
    /// Add a size row, returning its index.
    pub fn add_size(&mut self, size: VariantSize) -> usize {
        self.sizes.push(size);
        self.sizes.len() - 1
    }

    /// Remove the size row at `index` if it exists.
    pub fn remove_size(&mut self, index: usize) -> Option<VariantSize> {
        (index < self.sizes.len()).then(|| self.sizes.remove(index))
    }

    /// Replace the size row at `index`, returning the previous value.
    pub fn update_size(&mut self, index: usize, size: VariantSize) -> Option<VariantSize> {
        self.sizes
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, size))
    }

    /// Add a spec row, returning its index.
    pub fn add_spec(&mut self, spec: VariantSpec) -> usize {
        self.specs.push(spec);
        self.specs.len() - 1
    }

    /// Remove the spec row at `index` if it exists.
    pub fn remove_spec(&mut self, index: usize) -> Option<VariantSpec> {
        (index < self.specs.len()).then(|| self.specs.remove(index))
    }

    /// Add an image, appending it at the end of the ordering.
    pub fn add_image(&mut self, url: String, public_id: String) {
        let position = i32::try_from(self.images.len()).unwrap_or(i32::MAX);
        self.images.push(VariantImage {
            url,
            public_id,
            position,
        });
    }

    /// Remove the image at `index` and renumber the remaining positions.
    pub fn remove_image(&mut self, index: usize) -> Option<VariantImage> {
        if index >= self.images.len() {
            return None;
        }
        let removed = self.images.remove(index);
        for (i, image) in self.images.iter_mut().enumerate() {
            image.position = i32::try_from(i).unwrap_or(i32::MAX);
        }
        Some(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tangelo_core::Slug;

    fn variant() -> VariantInput {
        VariantInput {
            name: "Forest".to_string(),
            slug: Slug::parse("forest").unwrap(),
            sku: "SOCK-F".to_string(),
            keywords: vec![],
            colors: vec!["green".to_string()],
            images: vec![],
            sizes: vec![],
            specs: vec![],
        }
    }

    fn size(label: &str) -> VariantSize {
        VariantSize {
            label: label.to_string(),
            quantity: 5,
            price: Decimal::new(1999, 2),
            discount: Decimal::ZERO,
        }
    }

    #[test]
    fn test_size_rows_add_update_remove() {
        let mut v = variant();
        assert_eq!(v.add_size(size("S")), 0);
        assert_eq!(v.add_size(size("M")), 1);

        let replaced = v.update_size(0, size("XS")).unwrap();
        assert_eq!(replaced.label, "S");
        assert_eq!(v.sizes[0].label, "XS");

        let removed = v.remove_size(0).unwrap();
        assert_eq!(removed.label, "XS");
        assert_eq!(v.sizes.len(), 1);
        assert!(v.remove_size(5).is_none());
    }

    #[test]
    fn test_image_positions_renumbered_after_remove() {
        let mut v = variant();
        v.add_image("http://img/a.png".to_string(), "a".to_string());
        v.add_image("http://img/b.png".to_string(), "b".to_string());
        v.add_image("http://img/c.png".to_string(), "c".to_string());
        assert_eq!(v.images[2].position, 2);

        v.remove_image(0).unwrap();
        assert_eq!(v.images[0].public_id, "b");
        assert_eq!(v.images[0].position, 0);
        assert_eq!(v.images[1].position, 1);
    }

    #[test]
    fn test_spec_rows() {
        let mut v = variant();
        v.add_spec(VariantSpec {
            name: "Material".to_string(),
            value: "Merino".to_string(),
        });
        assert_eq!(v.specs.len(), 1);
        assert!(v.remove_spec(0).is_some());
        assert!(v.remove_spec(0).is_none());
    }
}
