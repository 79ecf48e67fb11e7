use crate::error::AppError;
use config::{Config as Cfg, File};
use secrecy::Secret;
use serde::Deserialize;
use std::env;

/// Settings shared by every service, read from an optional `configuration`
/// file and `APP__*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let mut loaded: Config = config.try_deserialize()?;
        if loaded.otlp_endpoint.is_none() {
            loaded.otlp_endpoint = env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty());
        }
        Ok(loaded)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "prod"
    }
}

/// Which table store implementation a service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Rest,
    Memory,
}

impl StoreBackend {
    pub fn from_string(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "memory" => StoreBackend::Memory,
            _ => StoreBackend::Rest,
        }
    }
}

/// Connection settings for the remote table store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub url: String,
    pub key: Secret<String>,
}

impl StoreConfig {
    /// In-process store, used by tests and local runs without credentials.
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            url: String::new(),
            key: Secret::new(String::new()),
        }
    }

    /// Read `SUPABASE_URL` / `SUPABASE_KEY`. Both are required unless
    /// `STORE_BACKEND=memory`.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let backend = StoreBackend::from_string(&env::var("STORE_BACKEND").unwrap_or_default());
        if backend == StoreBackend::Memory {
            return Ok(Self::memory());
        }

        let url = non_empty_var("SUPABASE_URL");
        let key = non_empty_var("SUPABASE_KEY");
        match (url, key) {
            (Some(url), Some(key)) => Ok(Self {
                backend,
                url: url.trim_end_matches('/').to_string(),
                key: Secret::new(key),
            }),
            _ => Err(AppError::ConfigError(anyhow::anyhow!(
                "SUPABASE_URL and SUPABASE_KEY must be set"
            ))),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Read an environment variable, falling back to `default` outside
/// production. In production every key without a value is an error.
pub fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// Comma separated list, e.g. `CORS_ALLOWED_ORIGINS=http://a,http://b`.
pub fn get_list(key: &str) -> Vec<String> {
    env::var(key)
        .unwrap_or_default()
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Parse a port variable such as `CUSTOMER_SERVICE_PORT`.
pub fn get_port(key: &str, default: u16) -> Result<u16, AppError> {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => val.trim().parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} is not a valid port: {}", key, e))
        }),
        _ => Ok(default),
    }
}
