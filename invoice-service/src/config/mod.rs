use service_core::config::{self as core_config, get_env, get_port, StoreConfig};
use service_core::error::AppError;

pub const DEFAULT_PORT: u16 = 8081;

#[derive(Debug, Clone)]
pub struct InvoiceConfig {
    pub common: core_config::Config,
    pub port: u16,
    pub store: StoreConfig,
    pub branding: PdfBranding,
}

/// Issuer details printed on every invoice PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfBranding {
    pub company_name: String,
    pub tagline: String,
    pub website: String,
    pub email: String,
    pub phone: String,
}

impl Default for PdfBranding {
    fn default() -> Self {
        Self {
            company_name: "InvoicePro".to_string(),
            tagline: "Professional Invoicing Made Simple".to_string(),
            website: "www.invoicepro.com".to_string(),
            email: "billing@invoicepro.com".to_string(),
            phone: "+62 812 3456 7890".to_string(),
        }
    }
}

impl PdfBranding {
    /// `PDF_COMPANY_NAME`, `PDF_TAGLINE`, `PDF_WEBSITE`, `PDF_EMAIL` and
    /// `PDF_PHONE`, each optional.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        Ok(Self {
            company_name: get_env("PDF_COMPANY_NAME", Some(&defaults.company_name), false)?,
            tagline: get_env("PDF_TAGLINE", Some(&defaults.tagline), false)?,
            website: get_env("PDF_WEBSITE", Some(&defaults.website), false)?,
            email: get_env("PDF_EMAIL", Some(&defaults.email), false)?,
            phone: get_env("PDF_PHONE", Some(&defaults.phone), false)?,
        })
    }
}

impl InvoiceConfig {
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            common: core_config::Config::load()?,
            port: get_port("INVOICE_SERVICE_PORT", DEFAULT_PORT)?,
            store: StoreConfig::from_env()?,
            branding: PdfBranding::from_env()?,
        })
    }
}
