use service_core::config::{self as core_config, get_port, StoreConfig};
use service_core::error::AppError;

pub const DEFAULT_PORT: u16 = 8085;

#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    pub common: core_config::Config,
    pub port: u16,
    pub store: StoreConfig,
}

impl AnalyticsConfig {
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            common: core_config::Config::load()?,
            port: get_port("ANALYTICS_SERVICE_PORT", DEFAULT_PORT)?,
            store: StoreConfig::from_env()?,
        })
    }
}
