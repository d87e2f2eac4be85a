//! Axum route handlers for the Promo API.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::promo::models::{GenerationRequest, PromoCard};
use crate::promo::results::{clear_results, load_results};
use crate::promo::submission::submit;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoListResponse {
    pub options: Vec<PromoCard>,
    pub generating: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub options: Vec<PromoCard>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

/// GET /api/v1/promos
///
/// Returns the last persisted result set as display cards.
pub async fn handle_list_promos(
    State(state): State<AppState>,
) -> Result<Json<PromoListResponse>, AppError> {
    let contents = load_results(state.store.as_ref()).await?;
    Ok(Json(PromoListResponse {
        options: PromoCard::from_contents(&contents),
        generating: state.submissions.is_generating(),
    }))
}

/// POST /api/v1/promos
///
/// Generates two options, replaces the persisted set, returns the new cards.
/// The submission runs on its own task, so a client disconnect does not cancel it.
pub async fn handle_generate_promos(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let submission = tokio::spawn(async move {
        submit(
            &state.submissions,
            &state.credentials,
            state.store.as_ref(),
            request,
        )
        .await
    });

    let contents = submission
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Submission task failed: {e}")))??;

    Ok(Json(GenerateResponse {
        options: PromoCard::from_contents(&contents),
        message: "Promo content generated successfully!".to_string(),
    }))
}

/// DELETE /api/v1/promos
pub async fn handle_clear_promos(
    State(state): State<AppState>,
) -> Result<Json<ClearResponse>, AppError> {
    clear_results(state.store.as_ref()).await?;
    Ok(Json(ClearResponse {
        message: "Generated content cleared".to_string(),
    }))
}
