pub mod metrics;
pub mod providers;

pub use metrics::init_metrics;
pub use providers::{EmailMessage, EmailProvider, ProviderError};
