//! In-memory repository implementations for action unit tests.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;

use chrono::Utc;
use rust_decimal::Decimal;

use tangelo_core::{
    CategoryId, Email, Phone, ProductId, Role, ShippingRateId, Slug, StoreId, StoreStatus,
    SubcategoryId, UserId, VariantId,
};

use crate::db::{
    CategoryRepository, ConflictField, ProductRepository, RepositoryError,
    ShippingRateRepository, StoreRepository, SubcategoryRepository,
};
use crate::models::{
    Category, CategoryInput, CurrentUser, Product, ProductInput, ShippingDefaults, ShippingRate,
    ShippingRateInput, Store, StoreInput, Subcategory, SubcategoryInput, Variant,
};

/// A session user for tests.
pub fn current_user(id: i32, role: Role) -> CurrentUser {
    CurrentUser {
        id: UserId::new(id),
        name: format!("user-{id}"),
        email: format!("user{id}@tangelo.test"),
        role,
    }
}

fn default_shipping() -> ShippingDefaults {
    ShippingDefaults {
        shipping_service: "International shipping".to_string(),
        fee_per_item: Decimal::ZERO,
        fee_additional_item: Decimal::ZERO,
        fee_per_kg: Decimal::ZERO,
        fee_fixed: Decimal::ZERO,
        delivery_min_days: 7,
        delivery_max_days: 31,
        return_policy: "Returns accepted within 30 days of delivery.".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStoreRepository {
    rows: Mutex<Vec<Store>>,
}

impl MemoryStoreRepository {
    /// Direct access for round-trip assertions.
    pub fn get_stored(&self, id: StoreId) -> Option<Store> {
        self.rows.lock().unwrap().iter().find(|s| s.id == id).cloned()
    }

    fn next_id(&self) -> StoreId {
        StoreId::new(i32::try_from(self.rows.lock().unwrap().len()).unwrap() + 1)
    }
}

/// Seed a minimal active store owned by `owner_id`.
pub fn seeded_store(repo: &MemoryStoreRepository, owner_id: i32, name: &str, slug: &str) -> Store {
    let now = Utc::now();
    let store = Store {
        id: repo.next_id(),
        owner_id: UserId::new(owner_id),
        name: name.to_string(),
        slug: Slug::parse(slug).unwrap(),
        description: format!("{name} store"),
        email: Email::parse(&format!("{slug}@tangelo.test")).unwrap(),
        phone: Phone::parse("+15550000000").unwrap(),
        logo_url: "http://img/logo.png".to_string(),
        logo_public_id: "logo".to_string(),
        cover_url: "http://img/cover.png".to_string(),
        cover_public_id: "cover".to_string(),
        status: StoreStatus::Active,
        featured: false,
        shipping: default_shipping(),
        created_at: now,
        updated_at: now,
    };
    repo.rows.lock().unwrap().push(store.clone());
    store
}

impl StoreRepository for MemoryStoreRepository {
    async fn get(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        Ok(self.get_stored(id))
    }

    async fn get_by_slug(&self, slug: &Slug) -> Result<Option<Store>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.slug == *slug)
            .cloned())
    }

    async fn list_for_owner(&self, owner_id: UserId) -> Result<Vec<Store>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_conflict(
        &self,
        name: &str,
        slug: &Slug,
        email: &Email,
        phone: &Phone,
        exclude: Option<StoreId>,
    ) -> Result<Option<ConflictField>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        for row in rows.iter().filter(|r| Some(r.id) != exclude) {
            if row.name.eq_ignore_ascii_case(name) {
                return Ok(Some(ConflictField::Name));
            }
            if row.slug == *slug {
                return Ok(Some(ConflictField::Slug));
            }
            if row.email.as_str().eq_ignore_ascii_case(email.as_str()) {
                return Ok(Some(ConflictField::Email));
            }
            if row.phone == *phone {
                return Ok(Some(ConflictField::Phone));
            }
        }
        Ok(None)
    }

    async fn insert(&self, owner_id: UserId, input: &StoreInput) -> Result<Store, RepositoryError> {
        let now = Utc::now();
        let store = Store {
            id: self.next_id(),
            owner_id,
            name: input.name.clone(),
            slug: input.slug.clone(),
            description: input.description.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            logo_url: input.logo_url.clone(),
            logo_public_id: input.logo_public_id.clone(),
            cover_url: input.cover_url.clone(),
            cover_public_id: input.cover_public_id.clone(),
            status: StoreStatus::Pending,
            featured: false,
            shipping: input.shipping.clone(),
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(store.clone());
        Ok(store)
    }

    async fn update(&self, id: StoreId, input: &StoreInput) -> Result<Store, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RepositoryError::NotFound)?;
        row.name = input.name.clone();
        row.slug = input.slug.clone();
        row.description = input.description.clone();
        row.email = input.email.clone();
        row.phone = input.phone.clone();
        row.logo_url = input.logo_url.clone();
        row.logo_public_id = input.logo_public_id.clone();
        row.cover_url = input.cover_url.clone();
        row.cover_public_id = input.cover_public_id.clone();
        row.shipping = input.shipping.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn set_status(&self, id: StoreId, status: StoreStatus) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RepositoryError::NotFound)?;
        row.status = status;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryCategoryRepository {
    rows: Mutex<Vec<Category>>,
}

/// Seed a category directly, bypassing the action.
pub fn seeded_category(repo: &MemoryCategoryRepository, name: &str, slug: &str) -> Category {
    let now = Utc::now();
    let mut rows = repo.rows.lock().unwrap();
    let category = Category {
        id: CategoryId::new(i32::try_from(rows.len()).unwrap() + 1),
        name: name.to_string(),
        slug: Slug::parse(slug).unwrap(),
        image_url: "http://img/cat.png".to_string(),
        image_public_id: "cat".to_string(),
        featured: false,
        created_at: now,
        updated_at: now,
    };
    rows.push(category.clone());
    category
}

impl CategoryRepository for MemoryCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn find_conflict(
        &self,
        name: &str,
        slug: &Slug,
        exclude: Option<CategoryId>,
    ) -> Result<Option<ConflictField>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        for row in rows.iter().filter(|r| Some(r.id) != exclude) {
            if row.name.eq_ignore_ascii_case(name) {
                return Ok(Some(ConflictField::Name));
            }
            if row.slug == *slug {
                return Ok(Some(ConflictField::Slug));
            }
        }
        Ok(None)
    }

    async fn insert(&self, input: &CategoryInput) -> Result<Category, RepositoryError> {
        let now = Utc::now();
        let mut rows = self.rows.lock().unwrap();
        let category = Category {
            id: CategoryId::new(i32::try_from(rows.len()).unwrap() + 1),
            name: input.name.clone(),
            slug: input.slug.clone(),
            image_url: input.image_url.clone(),
            image_public_id: input.image_public_id.clone(),
            featured: input.featured,
            created_at: now,
            updated_at: now,
        };
        rows.push(category.clone());
        Ok(category)
    }

    async fn update(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        row.name = input.name.clone();
        row.slug = input.slug.clone();
        row.image_url = input.image_url.clone();
        row.image_public_id = input.image_public_id.clone();
        row.featured = input.featured;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| c.id != id);
        if rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Subcategories
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemorySubcategoryRepository {
    rows: Mutex<Vec<Subcategory>>,
}

impl SubcategoryRepository for MemorySubcategoryRepository {
    async fn list(&self) -> Result<Vec<Subcategory>, RepositoryError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn list_for_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Subcategory>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: SubcategoryId) -> Result<Option<Subcategory>, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn find_conflict(
        &self,
        category_id: CategoryId,
        name: &str,
        slug: &Slug,
        exclude: Option<SubcategoryId>,
    ) -> Result<Option<ConflictField>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        for row in rows
            .iter()
            .filter(|r| r.category_id == category_id && Some(r.id) != exclude)
        {
            if row.name.eq_ignore_ascii_case(name) {
                return Ok(Some(ConflictField::Name));
            }
            if row.slug == *slug {
                return Ok(Some(ConflictField::Slug));
            }
        }
        Ok(None)
    }

    async fn insert(&self, input: &SubcategoryInput) -> Result<Subcategory, RepositoryError> {
        let now = Utc::now();
        let mut rows = self.rows.lock().unwrap();
        let subcategory = Subcategory {
            id: SubcategoryId::new(i32::try_from(rows.len()).unwrap() + 1),
            category_id: input.category_id,
            name: input.name.clone(),
            slug: input.slug.clone(),
            image_url: input.image_url.clone(),
            image_public_id: input.image_public_id.clone(),
            featured: input.featured,
            created_at: now,
            updated_at: now,
        };
        rows.push(subcategory.clone());
        Ok(subcategory)
    }

    async fn update(
        &self,
        id: SubcategoryId,
        input: &SubcategoryInput,
    ) -> Result<Subcategory, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RepositoryError::NotFound)?;
        row.category_id = input.category_id;
        row.name = input.name.clone();
        row.slug = input.slug.clone();
        row.image_url = input.image_url.clone();
        row.image_public_id = input.image_public_id.clone();
        row.featured = input.featured;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: SubcategoryId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| s.id != id);
        if rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryProductRepository {
    rows: Mutex<Vec<Product>>,
    next_variant_id: Mutex<i32>,
}

impl MemoryProductRepository {
    fn build_variants(&self, input: &ProductInput) -> Vec<Variant> {
        let mut next = self.next_variant_id.lock().unwrap();
        input
            .variants
            .iter()
            .map(|v| {
                *next += 1;
                Variant {
                    id: VariantId::new(*next),
                    name: v.name.clone(),
                    slug: v.slug.clone(),
                    sku: v.sku.clone(),
                    keywords: v.keywords.clone(),
                    colors: v.colors.clone(),
                    images: v.images.clone(),
                    sizes: v.sizes.clone(),
                    specs: v.specs.clone(),
                }
            })
            .collect()
    }
}

impl ProductRepository for MemoryProductRepository {
    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn list_for_store(&self, store_id: StoreId) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.store_id == store_id)
            .cloned()
            .collect())
    }

    async fn find_conflict(
        &self,
        slug: &Slug,
        exclude: Option<ProductId>,
    ) -> Result<Option<ConflictField>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .any(|r| Some(r.id) != exclude && r.slug == *slug)
            .then_some(ConflictField::Slug))
    }

    async fn insert(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let now = Utc::now();
        let variants = self.build_variants(input);
        let mut rows = self.rows.lock().unwrap();
        let product = Product {
            id: ProductId::new(i32::try_from(rows.len()).unwrap() + 1),
            store_id: input.store_id,
            name: input.name.clone(),
            slug: input.slug.clone(),
            description: input.description.clone(),
            brand: input.brand.clone(),
            category_id: input.category_id,
            subcategory_id: input.subcategory_id,
            variants,
            created_at: now,
            updated_at: now,
        };
        rows.push(product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let variants = self.build_variants(input);
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        row.name = input.name.clone();
        row.slug = input.slug.clone();
        row.description = input.description.clone();
        row.brand = input.brand.clone();
        row.category_id = input.category_id;
        row.subcategory_id = input.subcategory_id;
        row.variants = variants;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Shipping rates
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryShippingRateRepository {
    rows: Mutex<Vec<ShippingRate>>,
}

impl MemoryShippingRateRepository {
    /// Number of stored rates.
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

impl ShippingRateRepository for MemoryShippingRateRepository {
    async fn list_for_store(&self, store_id: StoreId) -> Result<Vec<ShippingRate>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.store_id == store_id)
            .cloned()
            .collect())
    }

    async fn get(
        &self,
        store_id: StoreId,
        country_code: &str,
    ) -> Result<Option<ShippingRate>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.store_id == store_id && r.country_code == country_code)
            .cloned())
    }

    async fn upsert(&self, input: &ShippingRateInput) -> Result<ShippingRate, RepositoryError> {
        let now = Utc::now();
        let mut rows = self.rows.lock().unwrap();

        if let Some(row) = rows
            .iter_mut()
            .find(|r| r.store_id == input.store_id && r.country_code == input.country_code)
        {
            row.country_name = input.country_name.clone();
            row.shipping_service = input.shipping_service.clone();
            row.fee_per_item = input.fee_per_item;
            row.fee_additional_item = input.fee_additional_item;
            row.fee_per_kg = input.fee_per_kg;
            row.fee_fixed = input.fee_fixed;
            row.delivery_min_days = input.delivery_min_days;
            row.delivery_max_days = input.delivery_max_days;
            row.return_policy = input.return_policy.clone();
            row.updated_at = now;
            return Ok(row.clone());
        }

        let rate = ShippingRate {
            id: ShippingRateId::new(i32::try_from(rows.len()).unwrap() + 1),
            store_id: input.store_id,
            country_code: input.country_code.clone(),
            country_name: input.country_name.clone(),
            shipping_service: input.shipping_service.clone(),
            fee_per_item: input.fee_per_item,
            fee_additional_item: input.fee_additional_item,
            fee_per_kg: input.fee_per_kg,
            fee_fixed: input.fee_fixed,
            delivery_min_days: input.delivery_min_days,
            delivery_max_days: input.delivery_max_days,
            return_policy: input.return_policy.clone(),
            created_at: now,
            updated_at: now,
        };
        rows.push(rate.clone());
        Ok(rate)
    }
}
