//! Dashboard landing page.

use askama::Template;
use axum::{extract::State, response::Html};
use tracing::instrument;

use crate::db::{PgStoreRepository, StoreRepository};
use crate::middleware::RequireAuth;
use crate::models::Store;
use crate::state::AppState;

use super::render;

/// Landing page template.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user_name: String,
    pub is_admin: bool,
    pub can_sell: bool,
    pub stores: Vec<Store>,
}

/// Role-aware landing page: admins see catalog management links, sellers
/// see their stores.
#[instrument(skip(user, state))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Html<String> {
    let stores = if user.role.can_sell() {
        let repo = PgStoreRepository::new(state.pool());
        match repo.list_for_owner(user.id).await {
            Ok(stores) => stores,
            Err(e) => {
                tracing::error!("Failed to list stores: {e}");
                vec![]
            }
        }
    } else {
        vec![]
    };

    render(&HomeTemplate {
        user_name: user.name.clone(),
        is_admin: user.role.is_admin(),
        can_sell: user.role.can_sell(),
        stores,
    })
}
