//! Domain models for the dashboard.

pub mod category;
pub mod product;
pub mod session;
pub mod shipping;
pub mod store;
pub mod user;

pub use category::{Category, CategoryInput, Subcategory, SubcategoryInput};
pub use product::{
    Product, ProductInput, Variant, VariantImage, VariantInput, VariantSize, VariantSpec,
};
pub use session::{CurrentUser, session_keys};
pub use shipping::{ShippingRate, ShippingRateInput};
pub use store::{ShippingDefaults, Store, StoreInput};
pub use user::User;
