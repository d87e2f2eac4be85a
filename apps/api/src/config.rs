use anyhow::{bail, Context, Result};

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Which key-value backend holds the credential and the last result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    File,
    Redis,
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("STORE_BACKEND must be one of file, redis, memory (got '{other}')"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub store_backend: StoreBackend,
    pub store_path: String,
    pub redis_url: Option<String>,
    pub gemini_api_base: String,
    /// Offered to the credential store at startup when nothing is persisted yet.
    pub gemini_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let store_backend = StoreBackend::parse(
            &std::env::var("STORE_BACKEND").unwrap_or_else(|_| "file".to_string()),
        )?;
        let redis_url = optional_env("REDIS_URL");
        if store_backend == StoreBackend::Redis && redis_url.is_none() {
            bail!("Required environment variable 'REDIS_URL' is not set (STORE_BACKEND=redis)");
        }

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            store_backend,
            store_path: std::env::var("STORE_PATH")
                .unwrap_or_else(|_| "promo_store.json".to_string()),
            redis_url,
            gemini_api_base: optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parse_is_case_insensitive() {
        assert_eq!(StoreBackend::parse("Redis").unwrap(), StoreBackend::Redis);
        assert_eq!(StoreBackend::parse(" file ").unwrap(), StoreBackend::File);
        assert_eq!(StoreBackend::parse("MEMORY").unwrap(), StoreBackend::Memory);
    }

    #[test]
    fn test_store_backend_rejects_unknown() {
        let err = StoreBackend::parse("sqlite").unwrap_err();
        assert!(err.to_string().contains("sqlite"));
    }
}
