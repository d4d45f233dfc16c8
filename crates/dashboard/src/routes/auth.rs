//! Authentication route handlers.

use askama::Template;
use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{CurrentUser, session_keys};
use crate::services::auth::AuthService;
use crate::state::AppState;

use super::render;

/// Login form input.
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Registration form input.
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// Registration page template.
#[derive(Template)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

/// Login page handler.
pub async fn login_page() -> Html<String> {
    render(&LoginTemplate { error: None })
}

/// Login handler.
#[instrument(skip(state, session, input), fields(email = %input.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<LoginInput>,
) -> impl IntoResponse {
    let service = AuthService::new(state.pool());

    match service.login(&input.email, &input.password).await {
        Ok(user) => {
            let current = CurrentUser::from_user(&user);
            set_sentry_user(&current.id, Some(&current.email));
            if let Err(e) = session.insert(session_keys::CURRENT_USER, &current).await {
                tracing::error!("Failed to write session: {e}");
                return render(&LoginTemplate {
                    error: Some("Something went wrong. Please try again.".to_string()),
                })
                .into_response();
            }
            tracing::info!(user_id = %current.id, "User logged in");
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::debug!("Login rejected: {e}");
            render(&LoginTemplate {
                error: Some("Invalid email or password".to_string()),
            })
            .into_response()
        }
    }
}

/// Registration page handler.
pub async fn register_page() -> Html<String> {
    render(&RegisterTemplate { error: None })
}

/// Registration handler.
#[instrument(skip(state, session, input), fields(email = %input.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<RegisterInput>,
) -> impl IntoResponse {
    let service = AuthService::new(state.pool());

    match service
        .register(&input.name, &input.email, &input.password)
        .await
    {
        Ok(user) => {
            let current = CurrentUser::from_user(&user);
            set_sentry_user(&current.id, Some(&current.email));
            if let Err(e) = session.insert(session_keys::CURRENT_USER, &current).await {
                tracing::error!("Failed to write session: {e}");
                return render(&RegisterTemplate {
                    error: Some("Something went wrong. Please try again.".to_string()),
                })
                .into_response();
            }
            tracing::info!(user_id = %current.id, "User registered");
            Redirect::to("/").into_response()
        }
        Err(e) => render(&RegisterTemplate {
            error: Some(e.to_string()),
        })
        .into_response(),
    }
}

/// Logout handler.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> impl IntoResponse {
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to clear session: {e}");
    }
    clear_sentry_user();
    Redirect::to("/auth/login")
}
