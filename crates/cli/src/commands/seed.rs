//! Demo data seeding.
//!
//! Inserts a small category tree so a fresh environment has something to
//! render. Skips anything that already exists, so re-running is safe.

use tangelo_core::Slug;

use tangelo_dashboard::db::{CategoryRepository, PgCategoryRepository, SubcategoryRepository};
use tangelo_dashboard::db::{PgSubcategoryRepository, RepositoryError};
use tangelo_dashboard::models::{CategoryInput, SubcategoryInput};

use super::{CommandError, connect};

const CATEGORIES: &[(&str, &[&str])] = &[
    ("Apparel", &["Socks", "Jackets", "Hats"]),
    ("Outdoors", &["Tents", "Cookware"]),
    ("Home & Garden", &["Planters", "Lighting"]),
];

fn placeholder_image(slug: &str) -> String {
    format!("https://placehold.tangelomarket.dev/{slug}.png")
}

/// Seed the demo category tree.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails
/// for a reason other than the row already existing.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;
    let categories = PgCategoryRepository::new(&pool);
    let subcategories = PgSubcategoryRepository::new(&pool);

    for &(name, subs) in CATEGORIES {
        let slug = Slug::generate(name)
            .map_err(|e| CommandError::InvalidArgument(format!("bad seed name '{name}': {e}")))?;

        let category = match categories.find_conflict(name, &slug, None).await? {
            Some(_) => {
                tracing::info!(name, "Category already present, skipping");
                match categories
                    .list()
                    .await?
                    .into_iter()
                    .find(|c| c.slug == slug)
                {
                    Some(existing) => existing,
                    None => continue,
                }
            }
            None => {
                categories
                    .insert(&CategoryInput {
                        name: name.to_owned(),
                        slug: slug.clone(),
                        image_url: placeholder_image(slug.as_str()),
                        image_public_id: format!("seed/{slug}"),
                        featured: false,
                    })
                    .await?
            }
        };

        for &sub_name in subs {
            let sub_slug = Slug::generate(sub_name).map_err(|e| {
                CommandError::InvalidArgument(format!("bad seed name '{sub_name}': {e}"))
            })?;

            match subcategories
                .find_conflict(category.id, sub_name, &sub_slug, None)
                .await?
            {
                Some(_) => {
                    tracing::info!(name = sub_name, "Subcategory already present, skipping");
                }
                None => {
                    match subcategories
                        .insert(&SubcategoryInput {
                            category_id: category.id,
                            name: sub_name.to_owned(),
                            slug: sub_slug.clone(),
                            image_url: placeholder_image(sub_slug.as_str()),
                            image_public_id: format!("seed/{sub_slug}"),
                            featured: false,
                        })
                        .await
                    {
                        Ok(_) | Err(RepositoryError::Conflict(_)) => {}
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }
    }

    tracing::info!("Seed complete");
    Ok(())
}
