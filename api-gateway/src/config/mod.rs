use service_core::config::{self as core_config, get_list, get_port};
use service_core::error::AppError;
use std::env;

pub const DEFAULT_PORT: u16 = 8080;

/// Backend services behind the gateway: env prefix, default port and the
/// path prefixes each one owns.
pub const SERVICES: [(&str, u16, &[&str]); 5] = [
    ("CUSTOMER_SERVICE", 8082, &["/customers"]),
    ("INVOICE_SERVICE", 8081, &["/invoices", "/currency-rates"]),
    ("PAYMENT_SERVICE", 8083, &["/payments"]),
    ("ANALYTICS_SERVICE", 8085, &["/dashboard", "/analytics"]),
    ("NOTIFICATION_SERVICE", 8084, &["/notifications"]),
];

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub common: core_config::Config,
    pub port: u16,
    pub routes: Vec<ServiceRoute>,
    pub cors_origins: Vec<String>,
}

/// One path prefix and the base URL it forwards to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRoute {
    pub prefix: String,
    pub service: String,
    pub base_url: String,
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            common: core_config::Config::load()?,
            port: get_port("API_GATEWAY_PORT", DEFAULT_PORT)?,
            routes: routes_from_env()?,
            cors_origins: get_list("CORS_ALLOWED_ORIGINS"),
        })
    }
}

/// `http://<NAME>_HOST:<NAME>_PORT`, host defaulting to `localhost`.
pub fn service_url(name: &str, default_port: u16) -> Result<String, AppError> {
    let host = env::var(format!("{}_HOST", name))
        .ok()
        .filter(|h| !h.trim().is_empty())
        .unwrap_or_else(|| "localhost".to_string());
    let port = get_port(&format!("{}_PORT", name), default_port)?;
    Ok(format!("http://{}:{}", host.trim(), port))
}

pub fn routes_from_env() -> Result<Vec<ServiceRoute>, AppError> {
    let mut routes = Vec::new();
    for (name, default_port, prefixes) in SERVICES {
        let base_url = service_url(name, default_port)?;
        let service = name.to_ascii_lowercase().replace('_', "-");
        for prefix in prefixes {
            routes.push(ServiceRoute {
                prefix: prefix.to_string(),
                service: service.clone(),
                base_url: base_url.clone(),
            });
        }
    }
    Ok(routes)
}
