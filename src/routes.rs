//! REST endpoints driving the registration wizard.
//!
//! The routes are the event surface of the engine: every handler maps one
//! user action (advance, retreat, submit) or one read (status, step,
//! verify) onto the controller and coordinator.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::error::{SubmitError, WizardError};
use crate::submit::{SubmissionCoordinator, SubmitOutcome};
use crate::wizard::controller::WizardController;
use crate::wizard::store::AnswerValue;
use crate::{nav, verify};

/// Shared state for registration routes.
#[derive(Clone)]
pub struct RegistrationRouteState {
    pub controller: Arc<WizardController>,
    pub coordinator: Arc<SubmissionCoordinator>,
}

/// GET /api/registration/status
///
/// Current step, resolved major, and whether a submission is in flight.
async fn get_status(State(state): State<RegistrationRouteState>) -> impl IntoResponse {
    let step = state.controller.current_step().await;
    let major = state.controller.major().await;
    Json(serde_json::json!({
        "step": step,
        "major": major,
        "in_flight": state.coordinator.is_in_flight(),
        "last_failure": state.coordinator.last_failure().map(|e| e.to_string()),
    }))
}

/// GET /api/registration/step
///
/// The current step's form, rendered for the widget layer. 404 for steps
/// without a form (verification, submitted).
async fn get_step(State(state): State<RegistrationRouteState>) -> impl IntoResponse {
    match state.controller.step_view().await {
        Ok(Some(fields)) => Json(serde_json::json!({ "fields": fields })).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "The current step has no form"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Field registry lookup failed while rendering a step: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Internal error"})),
            )
                .into_response()
        }
    }
}

/// POST /api/registration/advance
///
/// Body: flat field→value map for the current step. 200 with the new step,
/// or 422 with field-level errors.
async fn post_advance(
    State(state): State<RegistrationRouteState>,
    Json(body): Json<BTreeMap<String, AnswerValue>>,
) -> impl IntoResponse {
    match state.controller.advance(body.into_iter().collect()).await {
        Ok(step) => Json(serde_json::json!({ "step": step })).into_response(),
        Err(WizardError::Validation(errors)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(serde_json::json!({ "errors": errors.errors })))
                .into_response()
        }
        Err(e) => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

/// POST /api/registration/retreat
async fn post_retreat(State(state): State<RegistrationRouteState>) -> impl IntoResponse {
    match state.controller.retreat().await {
        Ok(step) => Json(serde_json::json!({ "step": step })).into_response(),
        Err(e) => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

/// GET /api/registration/verify
///
/// The consolidated record, grouped by section. A lookup failure here is a
/// defect, not user input: log it and return 500.
async fn get_verify(State(state): State<RegistrationRouteState>) -> impl IntoResponse {
    let store = state.controller.store_snapshot().await;
    let major = state.controller.major().await;
    match verify::render(&store, major) {
        Ok(sections) => Json(serde_json::json!({
            "sections": sections,
            "back_path": major.map(|m| nav::step_path(m, crate::wizard::state::WizardStep::MajorQuestions)),
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Field registry lookup failed while rendering verification: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Internal error"})),
            )
                .into_response()
        }
    }
}

/// POST /api/registration/submit
async fn post_submit(State(state): State<RegistrationRouteState>) -> impl IntoResponse {
    match state.coordinator.submit(&state.controller).await {
        SubmitOutcome::Completed => Json(serde_json::json!({
            "status": "submitted",
            "path": nav::CONFIRMATION_PATH,
        }))
        .into_response(),
        SubmitOutcome::Suppressed => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": "A submission is already in flight"})),
        )
            .into_response(),
        SubmitOutcome::NotAtVerify => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": "Not at the verification step"})),
        )
            .into_response(),
        SubmitOutcome::Discarded => Json(serde_json::json!({"status": "discarded"})).into_response(),
        SubmitOutcome::Failed(e) => {
            let kind = match e {
                SubmitError::Network(_) => "network",
                SubmitError::Rejected { .. } => "rejected",
            };
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({"error": e.to_string(), "kind": kind})),
            )
                .into_response()
        }
    }
}

/// Build the registration REST routes.
pub fn registration_routes(state: RegistrationRouteState) -> Router {
    Router::new()
        .route("/api/registration/status", get(get_status))
        .route("/api/registration/step", get(get_step))
        .route("/api/registration/advance", post(post_advance))
        .route("/api/registration/retreat", post(post_retreat))
        .route("/api/registration/verify", get(get_verify))
        .route("/api/registration/submit", post(post_submit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
