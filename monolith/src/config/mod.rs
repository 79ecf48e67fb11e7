use invoice_service::config::PdfBranding;
use notification_service::config::EmailConfig;
use service_core::config::{self as core_config, get_list, get_port, StoreConfig};
use service_core::error::AppError;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct MonolithConfig {
    pub common: core_config::Config,
    pub port: u16,
    /// `None` when the store credentials are missing; resource routes then
    /// answer 501 instead of failing startup.
    pub store: Option<StoreConfig>,
    pub branding: PdfBranding,
    pub email: EmailConfig,
    pub cors_origins: Vec<String>,
}

impl MonolithConfig {
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            common: core_config::Config::load()?,
            port: get_port("PORT", DEFAULT_PORT)?,
            store: StoreConfig::from_env().ok(),
            branding: PdfBranding::from_env()?,
            email: EmailConfig::from_env(),
            cors_origins: get_list("CORS_ALLOWED_ORIGINS"),
        })
    }
}
