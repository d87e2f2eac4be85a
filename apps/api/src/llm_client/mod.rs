//! LLM Client — the single point of entry for all Gemini API calls.
//!
//! No other module may call the generative-language API directly.
//! One request per call: there is no retry or backoff here.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

/// The model used for all generation calls.
pub const MODEL: &str = "gemini-pro";
const API_KEY_HEADER: &str = "x-goog-api-key";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Substring the service uses to mark safety-filter rejections.
const SAFETY_MARKER: &str = "SAFETY";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Invalid API key format")]
    InvalidKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response blocked: {reason}")]
    Blocked { reason: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// True when the failure reads like a safety-filter rejection.
    ///
    /// Matching on error text is best effort: the service does not promise a
    /// stable error format.
    pub fn is_safety_block(&self) -> bool {
        self.to_string().contains(SAFETY_MARKER)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    ///
    /// A blocked prompt, or a candidate stopped for safety with no text,
    /// becomes `LlmError::Blocked`.
    pub fn text(&self) -> Result<String, LlmError> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(LlmError::Blocked {
                reason: reason.to_string(),
            });
        }

        let candidate = self.candidates.first().ok_or(LlmError::EmptyContent)?;

        let text: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            return match candidate.finish_reason.as_deref() {
                Some(reason) if reason.contains(SAFETY_MARKER) => Err(LlmError::Blocked {
                    reason: reason.to_string(),
                }),
                _ => Err(LlmError::EmptyContent),
            };
        }

        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
    status: Option<String>,
}

/// Handle to the remote text-completion service, bound to one API key.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
}

impl LlmClient {
    /// Builds a client for `api_key`. Fails when the key cannot be sent as a
    /// request header (control characters, non-ASCII) or the HTTP client
    /// cannot be constructed.
    pub fn new(api_key: &str, api_base: &str) -> Result<Self, LlmError> {
        let mut key = HeaderValue::from_str(api_key).map_err(|_| LlmError::InvalidKey)?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            endpoint: generate_content_url(api_base),
        })
    }

    /// Sends one prompt and returns the raw text of the reply. No parsing.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let body: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &body.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        body.text()
    }
}

fn generate_content_url(api_base: &str) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent",
        api_base.trim_end_matches('/'),
        MODEL
    )
}

/// Pulls the service's error message out of an error body, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<GeminiError>(body) {
        Ok(e) => match e.error.status {
            Some(status) => format!("[{status}] {}", e.error.message),
            None => e.error.message,
        },
        Err(_) => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_rejects_key_with_control_characters() {
        let result = LlmClient::new("AIzaSyA-abc\ndefghijklmnopqrstu", "http://localhost");
        assert!(matches!(result, Err(LlmError::InvalidKey)));
    }

    #[test]
    fn test_client_accepts_plain_key() {
        assert!(LlmClient::new("AIzaSyA-abcdefghijklmnopqrstu", "http://localhost").is_ok());
    }

    #[test]
    fn test_generate_content_url_trims_trailing_slash() {
        assert_eq!(
            generate_content_url("https://example.test/"),
            "https://example.test/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let json = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "{\"hook\": "}, {"text": "\"hi\"}"}], "role": "model"},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 4}
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text().unwrap(), "{\"hook\": \"hi\"}");
    }

    #[test]
    fn test_blocked_prompt_is_safety_block() {
        let json = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let err = response.text().unwrap_err();
        assert!(matches!(err, LlmError::Blocked { .. }));
        assert!(err.is_safety_block());
    }

    #[test]
    fn test_safety_finish_without_text_is_blocked() {
        let json = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(response.text().unwrap_err().is_safety_block());
    }

    #[test]
    fn test_no_candidates_is_empty_content() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(response.text(), Err(LlmError::EmptyContent)));
    }

    #[test]
    fn test_api_error_message_parses_service_error() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(api_error_message(body), "[INVALID_ARGUMENT] API key not valid.");
        assert_eq!(api_error_message("gateway timeout"), "gateway timeout");
    }

    #[test]
    fn test_plain_api_error_is_not_safety_block() {
        let err = LlmError::Api {
            status: 500,
            message: "internal".to_string(),
        };
        assert!(!err.is_safety_block());
    }
}
