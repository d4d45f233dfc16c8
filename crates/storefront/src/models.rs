//! Read-side view models for storefront pages.

use rust_decimal::Decimal;
use serde::Serialize;

use tangelo_core::{CategoryId, ProductId, Slug};

/// One navbar category with its subcategories.
#[derive(Debug, Clone, Serialize)]
pub struct NavCategory {
    pub id: CategoryId,
    pub name: String,
    pub slug: Slug,
    pub featured: bool,
    pub subcategories: Vec<NavSubcategory>,
}

/// One navbar subcategory entry.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct NavSubcategory {
    pub category_id: CategoryId,
    pub name: String,
    pub slug: Slug,
}

/// A product as shown on card grids (home, search, store pages).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub slug: Slug,
    pub brand: String,
    pub store_name: String,
    pub store_slug: Slug,
    /// First image of the first variant, if any.
    pub image_url: Option<String>,
    /// Cheapest size price across variants, if any size exists.
    pub price_from: Option<Decimal>,
}

/// Full product detail for the product page.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPage {
    pub id: ProductId,
    pub name: String,
    pub slug: Slug,
    pub description: String,
    pub brand: String,
    pub store_name: String,
    pub store_slug: Slug,
    pub variants: Vec<ProductPageVariant>,
}

/// One variant on the product page.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPageVariant {
    pub name: String,
    pub slug: Slug,
    pub colors: Vec<String>,
    pub images: Vec<String>,
    pub sizes: Vec<ProductPageSize>,
    pub specs: Vec<(String, String)>,
}

/// One size row on the product page.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductPageSize {
    pub label: String,
    pub quantity: i32,
    pub price: Decimal,
    pub discount: Decimal,
}

impl ProductPageSize {
    /// Price after discount, rounded to cents.
    #[must_use]
    pub fn discounted_price(&self) -> Decimal {
        if self.discount.is_zero() {
            return self.price;
        }
        let factor = (Decimal::ONE_HUNDRED - self.discount) / Decimal::ONE_HUNDRED;
        (self.price * factor).round_dp(2)
    }
}

/// A store header for the public store page.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StorePage {
    pub name: String,
    pub slug: Slug,
    pub description: String,
    pub logo_url: String,
    pub cover_url: String,
}
