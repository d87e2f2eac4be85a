//! Key-value persistence for the credential and the last generated result set.
//!
//! Every backend implements `KvStore`; `AppState` carries an `Arc<dyn KvStore>`
//! chosen at startup from `STORE_BACKEND`.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::{Config, StoreBackend};

pub mod file;
pub mod memory;
pub mod redis_store;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// Key holding the API credential.
pub const CREDENTIAL_KEY: &str = "gemini_api_key";
/// Key holding the JSON array of the last two generated options.
pub const PROMO_CONTENTS_KEY: &str = "promo_contents";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Background task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Opens the backend named in the configuration.
pub async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn KvStore>> {
    let store: Arc<dyn KvStore> = match config.store_backend {
        StoreBackend::File => {
            info!("Using file store at {}", config.store_path);
            Arc::new(FileStore::open(&config.store_path).await?)
        }
        StoreBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("REDIS_URL is required for the redis store"))?;
            info!("Using redis store");
            Arc::new(RedisStore::connect(url).await?)
        }
        StoreBackend::Memory => {
            info!("Using in-memory store; nothing survives a restart");
            Arc::new(MemoryStore::default())
        }
    };
    Ok(store)
}
