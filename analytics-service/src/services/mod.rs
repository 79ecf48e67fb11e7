pub mod metrics;
pub mod reports;
pub mod repository;

pub use metrics::init_metrics;
pub use repository::AnalyticsRepository;
