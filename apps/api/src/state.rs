use std::sync::Arc;

use crate::credentials::CredentialStore;
use crate::promo::submission::SubmissionGate;
use crate::store::KvStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Key-value backend for the credential and the last result set.
    pub store: Arc<dyn KvStore>,
    /// Owns the only `LlmClient`; handlers borrow it per submission.
    pub credentials: Arc<CredentialStore>,
    pub submissions: SubmissionGate,
}
