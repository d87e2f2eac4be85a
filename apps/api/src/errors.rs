use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::promo::normalizer::NormalizeError;
use crate::store::StoreError;

pub const SAFETY_FILTER_MESSAGE: &str = "Content safety filter triggered. Try rephrasing your \
    description to be more professional and music-focused.";

/// Application-level error type. Every failure of a submission ends here.
/// `IntoResponse` renders one user-visible notification message; none of
/// these take the process down.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Gemini AI not initialized")]
    NotInitialized,

    #[error("Remote failure: {0}")]
    RemoteFailure(String),

    #[error("Safety filter triggered: {0}")]
    SafetyFilterTriggered(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] NormalizeError),

    #[error("A generation is already in progress")]
    GenerationInProgress,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        if e.is_safety_block() {
            AppError::SafetyFilterTriggered(e.to_string())
        } else {
            AppError::RemoteFailure(e.to_string())
        }
    }
}

impl AppError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::InvalidCredential(_) => (StatusCode::BAD_REQUEST, "INVALID_CREDENTIAL"),
            AppError::NotInitialized => (StatusCode::PRECONDITION_FAILED, "NOT_INITIALIZED"),
            AppError::RemoteFailure(_) => (StatusCode::BAD_GATEWAY, "REMOTE_FAILURE"),
            AppError::SafetyFilterTriggered(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "SAFETY_FILTER_TRIGGERED")
            }
            AppError::MalformedResponse(_) => (StatusCode::BAD_GATEWAY, "MALFORMED_RESPONSE"),
            AppError::GenerationInProgress => (StatusCode::CONFLICT, "GENERATION_IN_PROGRESS"),
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// The notification text shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::InvalidCredential(msg) => msg.clone(),
            AppError::NotInitialized => "Invalid API key".to_string(),
            AppError::RemoteFailure(msg) => format!("Failed to generate content: {msg}"),
            AppError::SafetyFilterTriggered(_) => SAFETY_FILTER_MESSAGE.to_string(),
            AppError::MalformedResponse(e) => format!("Failed to generate content: {e}"),
            AppError::GenerationInProgress => {
                "Already generating. Wait for the current request to finish.".to_string()
            }
            AppError::Storage(_) => "Could not save to local storage".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        match &self {
            AppError::Storage(e) => tracing::error!("Storage error: {e}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            AppError::RemoteFailure(msg) | AppError::SafetyFilterTriggered(msg) => {
                tracing::warn!("LLM error: {msg}")
            }
            AppError::MalformedResponse(e) => tracing::warn!("Malformed LLM reply: {e}"),
            _ => {}
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.user_message()
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safety_llm_error_maps_to_safety_variant() {
        let err: AppError = LlmError::Blocked {
            reason: "SAFETY".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::SafetyFilterTriggered(_)));
        assert_eq!(err.user_message(), SAFETY_FILTER_MESSAGE);
    }

    #[test]
    fn test_safety_marker_in_api_error_text_is_detected() {
        let err: AppError = LlmError::Api {
            status: 400,
            message: "Candidate was blocked due to SAFETY".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::SafetyFilterTriggered(_)));
    }

    #[test]
    fn test_other_llm_errors_are_remote_failures() {
        let err: AppError = LlmError::EmptyContent.into();
        assert!(matches!(err, AppError::RemoteFailure(_)));
        assert_eq!(err.status_and_code().0, StatusCode::BAD_GATEWAY);
        assert!(err.user_message().starts_with("Failed to generate content"));
    }

    #[test]
    fn test_normalize_errors_are_malformed_responses() {
        let err: AppError = NormalizeError::MissingField("hook").into();
        assert_eq!(err.status_and_code().1, "MALFORMED_RESPONSE");
        assert!(err.user_message().contains("hook"));
    }

    #[tokio::test]
    async fn test_response_body_carries_code_and_message() {
        let response = AppError::GenerationInProgress.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "GENERATION_IN_PROGRESS");
        assert!(body["error"]["message"].as_str().unwrap().contains("generating"));
    }
}
