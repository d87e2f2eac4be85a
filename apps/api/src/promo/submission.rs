//! Submission boundary: one form submit from start to persisted results.
//!
//! Flow: claim gate → validate input → credential ready → generate both
//! options → persist → return. The gate is released on every exit path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::credentials::CredentialStore;
use crate::errors::AppError;
use crate::promo::generator::generate_options;
use crate::promo::models::{GenerationRequest, PromoContent};
use crate::promo::results::save_results;
use crate::store::KvStore;

/// Allows one submission at a time across the process.
#[derive(Clone, Default)]
pub struct SubmissionGate {
    generating: Arc<AtomicBool>,
}

/// Holding this means a submission is running. Dropping it clears the flag.
pub struct GenerationGuard {
    generating: Arc<AtomicBool>,
}

impl SubmissionGate {
    pub fn try_begin(&self) -> Option<GenerationGuard> {
        self.generating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GenerationGuard {
                generating: self.generating.clone(),
            })
    }

    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::Acquire)
    }
}

impl Drop for GenerationGuard {
    fn drop(&mut self) {
        self.generating.store(false, Ordering::Release);
    }
}

pub async fn submit(
    gate: &SubmissionGate,
    credentials: &CredentialStore,
    store: &dyn KvStore,
    request: GenerationRequest,
) -> Result<Vec<PromoContent>, AppError> {
    let _guard = gate.try_begin().ok_or(AppError::GenerationInProgress)?;

    let submission_id = Uuid::new_v4();
    async move {
        let llm = credentials.ensure_ready().await?;

        if !request.is_complete() {
            return Err(AppError::Validation("Please fill in all fields".to_string()));
        }

        info!("Generating promo options for '{}'", request.song_name.trim());
        let contents = generate_options(&llm, &request).await?;
        save_results(store, &contents).await?;
        info!("Persisted {} promo options", contents.len());

        Ok(contents)
    }
    .instrument(info_span!("submission", id = %submission_id))
    .await
}
