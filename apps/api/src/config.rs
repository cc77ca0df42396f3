use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub upload_dir: PathBuf,
    pub port: u16,
    pub token_ttl_hours: i64,
    pub max_upload_bytes: usize,
    pub bcrypt_cost: u32,
    pub cors_origin: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://jade_ai.db".to_string()),
            jwt_secret: require_env("JWT_SECRET")?,
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".to_string())
                .into(),
            port: parse_env("PORT", 8000)?,
            token_ttl_hours: parse_env("TOKEN_TTL_HOURS", 24)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            bcrypt_cost: parse_env("BCRYPT_COST", 10)?,
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|s| !s.is_empty()),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for in-process tests: in-memory database, cheap hashing.
    pub fn for_tests(upload_dir: PathBuf) -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "FAKE_JWT_SECRET_DO_NOT_USE".to_string(),
            upload_dir,
            port: 0,
            token_ttl_hours: 24,
            max_upload_bytes: 1024 * 1024,
            bcrypt_cost: 4,
            cors_origin: None,
            rust_log: "debug".to_string(),
        }
    }
}
