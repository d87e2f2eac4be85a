use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::credentials::CredentialStatus;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCredentialRequest {
    pub api_key: String,
}

#[derive(Serialize)]
pub struct SetCredentialResponse {
    pub ready: bool,
    pub message: String,
}

/// GET /api/v1/credential
pub async fn handle_credential_status(
    State(state): State<AppState>,
) -> Result<Json<CredentialStatus>, AppError> {
    Ok(Json(state.credentials.status().await?))
}

/// PUT /api/v1/credential
pub async fn handle_set_credential(
    State(state): State<AppState>,
    Json(req): Json<SetCredentialRequest>,
) -> Result<Json<SetCredentialResponse>, AppError> {
    state.credentials.accept(&req.api_key).await?;
    Ok(Json(SetCredentialResponse {
        ready: true,
        message: "API key validated successfully".to_string(),
    }))
}
