//! Content Generator — one prompt, one remote call, raw text back.
//!
//! `generate_options` runs two independent generations concurrently and
//! normalizes each reply. Either failure fails the pair.

use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::prompts::{EMOJI_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{LlmClient, LlmError};
use crate::promo::models::{GenerationRequest, PromoContent};
use crate::promo::normalizer::normalize;
use crate::promo::prompts::PROMO_PROMPT_TEMPLATE;

/// Fills the fixed prompt template with the form input.
pub fn build_prompt(request: &GenerationRequest) -> String {
    PROMO_PROMPT_TEMPLATE
        .replace("{emoji_instruction}", EMOJI_INSTRUCTION)
        .replace("{json_only_instruction}", JSON_ONLY_INSTRUCTION)
        .replace("{song_name}", request.song_name.trim())
        .replace("{description}", request.description.trim())
}

/// Sends the prompt once and returns the unparsed reply text.
pub async fn generate(llm: &LlmClient, request: &GenerationRequest) -> Result<String, LlmError> {
    let prompt = build_prompt(request);
    let raw = llm.generate_text(&prompt).await?;
    debug!("Raw promo reply: {} chars", raw.len());
    Ok(raw)
}

async fn generate_option(
    llm: &LlmClient,
    request: &GenerationRequest,
    option_number: usize,
) -> Result<PromoContent, AppError> {
    let raw = generate(llm, request).await?;
    let content = normalize(&raw)?;
    info!(
        "Option {} normalized: {} hashtags",
        option_number,
        content.hashtags.len()
    );
    Ok(content)
}

/// Produces both options for one submission, in order.
pub async fn generate_options(
    llm: &LlmClient,
    request: &GenerationRequest,
) -> Result<Vec<PromoContent>, AppError> {
    let (first, second) = tokio::try_join!(
        generate_option(llm, request, 1),
        generate_option(llm, request, 2)
    )?;
    Ok(vec![first, second])
}
