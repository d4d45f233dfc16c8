//! Store onboarding wizard route handlers (seller).
//!
//! Every handler follows the same rhythm: restore the [`WizardState`]
//! from the session, mutate it, save it back, render or redirect. The
//! draft never touches the catalog tables until the final submit.

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::actions::submit_store;
use crate::db::PgStoreRepository;
use crate::middleware::RequireSeller;
use crate::state::AppState;
use crate::validate::{FieldErrors, missing_store_fields};
use crate::wizard::{STEP_COUNT, StoreDraft, StoreDraftPatch, WizardState, steps};

use super::render;

/// One row of the wizard progress rail.
pub struct StepView {
    pub ordinal: u8,
    pub title: &'static str,
    pub completed: bool,
    pub current: bool,
}

fn step_views(state: &WizardState) -> Vec<StepView> {
    steps()
        .iter()
        .map(|step| StepView {
            ordinal: step.ordinal,
            title: step.title,
            completed: state.is_completed(step.ordinal),
            current: step.ordinal == state.current_step(),
        })
        .collect()
}

/// Basic info step template.
#[derive(Template)]
#[template(path = "wizard/details.html")]
pub struct DetailsStepTemplate {
    pub progress: Vec<StepView>,
    pub draft: StoreDraft,
    pub errors: FieldErrors,
}

/// Contact step template.
#[derive(Template)]
#[template(path = "wizard/contact.html")]
pub struct ContactStepTemplate {
    pub progress: Vec<StepView>,
    pub draft: StoreDraft,
    pub errors: FieldErrors,
}

/// Shipping policy step template.
#[derive(Template)]
#[template(path = "wizard/shipping.html")]
pub struct ShippingStepTemplate {
    pub progress: Vec<StepView>,
    pub draft: StoreDraft,
    pub errors: FieldErrors,
}

/// Review step template.
#[derive(Template)]
#[template(path = "wizard/review.html")]
pub struct ReviewStepTemplate {
    pub progress: Vec<StepView>,
    pub draft: StoreDraft,
    pub missing: Vec<&'static str>,
    pub ready: bool,
    pub error: Option<String>,
}

fn render_step(state: &WizardState, errors: FieldErrors, error: Option<String>) -> Html<String> {
    let progress = step_views(state);
    let draft = state.data().clone();
    match state.current_step() {
        1 => render(&DetailsStepTemplate {
            progress,
            draft,
            errors,
        }),
        2 => render(&ContactStepTemplate {
            progress,
            draft,
            errors,
        }),
        3 => render(&ShippingStepTemplate {
            progress,
            draft,
            errors,
        }),
        _ => render(&ReviewStepTemplate {
            progress,
            missing: missing_store_fields(&draft),
            ready: state.ready_to_submit(),
            draft,
            error,
        }),
    }
}

fn step_url(ordinal: u8) -> String {
    format!("/dashboard/seller/stores/new/step/{ordinal}")
}

/// Raw step form body. One shape for all steps; each step's page only
/// posts its own fields. Numeric fields arrive as strings so a blank
/// input doesn't fail deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct StepForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    pub logo_public_id: Option<String>,
    pub cover_url: Option<String>,
    pub cover_public_id: Option<String>,
    pub shipping_service: Option<String>,
    pub fee_per_item: Option<String>,
    pub fee_additional_item: Option<String>,
    pub fee_per_kg: Option<String>,
    pub fee_fixed: Option<String>,
    pub delivery_min_days: Option<String>,
    pub delivery_max_days: Option<String>,
    pub return_policy: Option<String>,
}

fn parse_decimal(
    field: &'static str,
    raw: Option<String>,
    errors: &mut FieldErrors,
) -> Option<Decimal> {
    let raw = raw?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(field, "Enter a valid amount");
            None
        }
    }
}

fn parse_days(field: &'static str, raw: Option<String>, errors: &mut FieldErrors) -> Option<i32> {
    let raw = raw?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(field, "Enter a whole number of days");
            None
        }
    }
}

impl StepForm {
    /// Convert the raw body into a draft patch, collecting numeric parse
    /// failures as field errors. String fields always make it into the
    /// patch so typed-in text survives a failed validation round.
    pub(crate) fn into_patch(self) -> (StoreDraftPatch, FieldErrors) {
        let mut errors = FieldErrors::new();

        let patch = StoreDraftPatch {
            name: self.name,
            description: self.description,
            slug: self.slug,
            email: self.email,
            phone: self.phone,
            logo_url: self.logo_url,
            logo_public_id: self.logo_public_id,
            cover_url: self.cover_url,
            cover_public_id: self.cover_public_id,
            shipping_service: self.shipping_service,
            fee_per_item: parse_decimal("fee_per_item", self.fee_per_item, &mut errors),
            fee_additional_item: parse_decimal(
                "fee_additional_item",
                self.fee_additional_item,
                &mut errors,
            ),
            fee_per_kg: parse_decimal("fee_per_kg", self.fee_per_kg, &mut errors),
            fee_fixed: parse_decimal("fee_fixed", self.fee_fixed, &mut errors),
            delivery_min_days: parse_days("delivery_min_days", self.delivery_min_days, &mut errors),
            delivery_max_days: parse_days("delivery_max_days", self.delivery_max_days, &mut errors),
            return_policy: self.return_policy,
        }
        .normalized();

        (patch, errors)
    }
}

async fn load_state(session: &Session) -> WizardState {
    WizardState::load(session).await.unwrap_or_else(|e| {
        tracing::error!("Failed to restore wizard state: {e}");
        WizardState::default()
    })
}

async fn save_state(session: &Session, state: &WizardState) {
    if let Err(e) = state.save(session).await {
        tracing::error!("Failed to persist wizard state: {e}");
    }
}

/// Resume the wizard at its current step.
#[instrument(skip(_seller, session))]
pub async fn resume(RequireSeller(_seller): RequireSeller, session: Session) -> impl IntoResponse {
    let state = load_state(&session).await;
    Redirect::to(&step_url(state.current_step()))
}

/// Render one wizard step.
///
/// Jumping ahead of the first incomplete step is ignored; the page for
/// the pointer's actual position renders instead.
#[instrument(skip(_seller, session))]
pub async fn step_page(
    RequireSeller(_seller): RequireSeller,
    session: Session,
    Path(ordinal): Path<u8>,
) -> impl IntoResponse {
    let mut state = load_state(&session).await;
    state.jump_to(ordinal);
    save_state(&session, &state).await;

    if state.current_step() != ordinal.clamp(1, STEP_COUNT) {
        return Redirect::to(&step_url(state.current_step())).into_response();
    }
    render_step(&state, FieldErrors::new(), None).into_response()
}

/// Save a step's input and, if it validates, advance.
#[instrument(skip(_seller, session, form))]
pub async fn submit_step(
    RequireSeller(_seller): RequireSeller,
    session: Session,
    Path(ordinal): Path<u8>,
    Form(form): Form<StepForm>,
) -> impl IntoResponse {
    let mut state = load_state(&session).await;
    state.jump_to(ordinal);

    // Flush the input into the draft first so nothing typed is lost,
    // even when validation fails.
    let (patch, parse_errors) = form.into_patch();
    state.apply(patch);

    if !parse_errors.is_empty() {
        save_state(&session, &state).await;
        return render_step(&state, parse_errors, None).into_response();
    }

    match state.complete_current_step() {
        Ok(()) => {
            save_state(&session, &state).await;
            Redirect::to(&step_url(state.current_step())).into_response()
        }
        Err(errors) => {
            save_state(&session, &state).await;
            render_step(&state, errors, None).into_response()
        }
    }
}

/// Go back one step. Never blocked by validation.
#[instrument(skip(_seller, session))]
pub async fn back(RequireSeller(_seller): RequireSeller, session: Session) -> impl IntoResponse {
    let mut state = load_state(&session).await;
    state.retreat();
    save_state(&session, &state).await;
    Redirect::to(&step_url(state.current_step()))
}

/// Discard the draft and leave the wizard.
#[instrument(skip(_seller, session))]
pub async fn abandon(RequireSeller(_seller): RequireSeller, session: Session) -> impl IntoResponse {
    if let Err(e) = WizardState::clear(&session).await {
        tracing::error!("Failed to clear wizard state: {e}");
    }
    Redirect::to("/dashboard/seller/stores")
}

/// Final submission: hand the assembled draft to the submission action.
#[instrument(skip(seller, state, session))]
pub async fn submit(
    RequireSeller(seller): RequireSeller,
    State(state): State<AppState>,
    session: Session,
) -> impl IntoResponse {
    let mut wizard = load_state(&session).await;

    // Blocked before any persistence call when input steps are missing.
    if !wizard.ready_to_submit() {
        wizard.jump_to(wizard.first_incomplete_step());
        save_state(&session, &wizard).await;
        return render_step(&wizard, FieldErrors::new(), None).into_response();
    }

    let repo = PgStoreRepository::new(state.pool());
    let result = submit_store(&repo, Some(&seller), wizard.data(), None).await;

    if result.success {
        if let Err(e) = WizardState::clear(&session).await {
            tracing::error!("Failed to clear wizard state: {e}");
        }
        tracing::info!(status = result.status_code, "Store submitted");
        Redirect::to("/dashboard/seller/stores").into_response()
    } else {
        render_step(&wizard, FieldErrors::new(), Some(result.message)).into_response()
    }
}
