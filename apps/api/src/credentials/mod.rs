//! Credential Store — owns the API key and the one live `LlmClient` built from it.
//!
//! The client handle lives here and is passed explicitly to whoever generates;
//! nothing else holds it.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::store::{KvStore, StoreError, CREDENTIAL_KEY};

pub mod handlers;

/// Keys shorter than this are rejected before any client is built.
pub const MIN_CREDENTIAL_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CredentialStatus {
    /// A client exists in this process.
    pub ready: bool,
    /// A key is persisted, whether or not it produced a client.
    pub stored: bool,
}

pub struct CredentialStore {
    store: Arc<dyn KvStore>,
    api_base: String,
    client: RwLock<Option<LlmClient>>,
}

impl CredentialStore {
    /// Reads the persisted key once and builds a client from it when it is usable.
    pub async fn load(store: Arc<dyn KvStore>, api_base: &str) -> Result<Self, StoreError> {
        let client = match store.get(CREDENTIAL_KEY).await? {
            Some(key) => match build_client(&key, api_base) {
                Ok(client) => {
                    info!("Loaded persisted API key (length: {})", key.chars().count());
                    Some(client)
                }
                Err(e) => {
                    warn!("Persisted API key is unusable: {e}");
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            store,
            api_base: api_base.to_string(),
            client: RwLock::new(client),
        })
    }

    /// Validates `value`, builds a client, persists the key, and makes the
    /// client current. On any failure nothing is persisted and the previous
    /// client (if any) stays in place.
    pub async fn accept(&self, value: &str) -> Result<(), AppError> {
        let client = build_client(value, &self.api_base)?;
        self.store.set(CREDENTIAL_KEY, value).await?;
        *self.client.write().await = Some(client);
        info!("API key accepted (length: {})", value.chars().count());
        Ok(())
    }

    /// `accept` reduced to a yes/no answer.
    pub async fn set_credential(&self, value: &str) -> bool {
        match self.accept(value).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Rejected API key: {e}");
                false
            }
        }
    }

    pub async fn is_ready(&self) -> bool {
        self.client.read().await.is_some()
    }

    pub async fn client(&self) -> Option<LlmClient> {
        self.client.read().await.clone()
    }

    /// Returns the current client, initializing one from the persisted key
    /// when this process has none yet.
    pub async fn ensure_ready(&self) -> Result<LlmClient, AppError> {
        if let Some(client) = self.client().await {
            return Ok(client);
        }

        let key = self
            .store
            .get(CREDENTIAL_KEY)
            .await?
            .ok_or(AppError::NotInitialized)?;
        let client = build_client(&key, &self.api_base).map_err(|_| AppError::NotInitialized)?;

        *self.client.write().await = Some(client.clone());
        Ok(client)
    }

    pub async fn status(&self) -> Result<CredentialStatus, StoreError> {
        Ok(CredentialStatus {
            ready: self.is_ready().await,
            stored: self.store.get(CREDENTIAL_KEY).await?.is_some(),
        })
    }
}

fn build_client(value: &str, api_base: &str) -> Result<LlmClient, AppError> {
    if value.chars().count() < MIN_CREDENTIAL_LEN {
        return Err(AppError::InvalidCredential(
            "Invalid API key format".to_string(),
        ));
    }
    LlmClient::new(value, api_base)
        .map_err(|e| AppError::InvalidCredential(format!("Failed to initialize API key: {e}")))
}
