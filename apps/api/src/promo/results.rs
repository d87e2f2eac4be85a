//! Persistence of the last generated result set.
//!
//! Exactly one set is kept; saving replaces it wholesale.

use tracing::warn;

use crate::errors::AppError;
use crate::promo::models::PromoContent;
use crate::store::{KvStore, PROMO_CONTENTS_KEY};

pub async fn save_results(store: &dyn KvStore, contents: &[PromoContent]) -> Result<(), AppError> {
    let serialized = serde_json::to_string(contents)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize results: {e}")))?;
    store.set(PROMO_CONTENTS_KEY, &serialized).await?;
    Ok(())
}

/// Loads the persisted set. Unreadable data is logged and treated as empty.
pub async fn load_results(store: &dyn KvStore) -> Result<Vec<PromoContent>, AppError> {
    let Some(raw) = store.get(PROMO_CONTENTS_KEY).await? else {
        return Ok(Vec::new());
    };

    match serde_json::from_str(&raw) {
        Ok(contents) => Ok(contents),
        Err(e) => {
            warn!("Ignoring unreadable persisted results: {e}");
            Ok(Vec::new())
        }
    }
}

/// Removes generated content only; the credential is untouched.
pub async fn clear_results(store: &dyn KvStore) -> Result<(), AppError> {
    store.delete(PROMO_CONTENTS_KEY).await?;
    Ok(())
}
