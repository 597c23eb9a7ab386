//! Process settings from the environment (`.env` honored).

use crate::error::ConfigError;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MODELS_PATH: &str = "models.json";
pub const DEFAULT_STORE_SCHEMA: &str = "public";
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Settings {
    /// Postgres URL; the in-memory store is used when unset.
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub models_path: String,
    /// Schema holding one table per collection.
    pub store_schema: String,
    pub body_limit_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: None,
            bind_addr: DEFAULT_BIND_ADDR.into(),
            models_path: DEFAULT_MODELS_PATH.into(),
            store_schema: DEFAULT_STORE_SCHEMA.into(),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl Settings {
    /// Load `.env` if present, then read `DATABASE_URL`, `BIND_ADDR`, `MODELS_PATH`, `STORE_SCHEMA`, `BODY_LIMIT_BYTES`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let body_limit_bytes = match lookup("BODY_LIMIT_BYTES") {
            Some(v) => v
                .parse()
                .map_err(|_| ConfigError::Load(format!("BODY_LIMIT_BYTES: invalid number '{}'", v)))?,
            None => defaults.body_limit_bytes,
        };
        Ok(Settings {
            database_url: lookup("DATABASE_URL").filter(|v| !v.is_empty()),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            models_path: lookup("MODELS_PATH").unwrap_or(defaults.models_path),
            store_schema: lookup("STORE_SCHEMA").unwrap_or(defaults.store_schema),
            body_limit_bytes,
        })
    }
}
