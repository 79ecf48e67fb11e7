use secrecy::Secret;
use service_core::config::{self as core_config, get_port};
use service_core::error::AppError;
use std::env;

pub const DEFAULT_PORT: u16 = 8084;

pub const RESEND_API_URL: &str = "https://api.resend.com";
pub const MAILGUN_API_URL: &str = "https://api.mailgun.net";

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub common: core_config::Config,
    pub port: u16,
    pub email: EmailConfig,
}

/// Provider credentials. The first configured provider wins, Resend before
/// Mailgun; with neither set, messages are only logged.
#[derive(Debug, Clone, Default)]
pub struct EmailConfig {
    pub resend: Option<ResendConfig>,
    pub mailgun: Option<MailgunConfig>,
}

#[derive(Debug, Clone)]
pub struct ResendConfig {
    pub api_key: Secret<String>,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct MailgunConfig {
    pub api_key: Secret<String>,
    pub domain: String,
    pub base_url: String,
}

impl NotificationConfig {
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            common: core_config::Config::load()?,
            port: get_port("NOTIFICATION_SERVICE_PORT", DEFAULT_PORT)?,
            email: EmailConfig::from_env(),
        })
    }
}

impl EmailConfig {
    pub fn from_env() -> Self {
        let resend = optional_var("RESEND_API_KEY").map(|key| ResendConfig {
            api_key: Secret::new(key),
            base_url: base_url("RESEND_BASE_URL", RESEND_API_URL),
        });

        let mailgun = match (optional_var("MAILGUN_API_KEY"), optional_var("MAILGUN_DOMAIN")) {
            (Some(key), Some(domain)) => Some(MailgunConfig {
                api_key: Secret::new(key),
                domain,
                base_url: base_url("MAILGUN_BASE_URL", MAILGUN_API_URL),
            }),
            (Some(_), None) => {
                tracing::warn!("MAILGUN_API_KEY is set without MAILGUN_DOMAIN; Mailgun disabled");
                None
            }
            _ => None,
        };

        Self { resend, mailgun }
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn base_url(key: &str, default: &str) -> String {
    optional_var(key)
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}
