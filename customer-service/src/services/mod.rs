pub mod metrics;
pub mod repository;

pub use metrics::init_metrics;
pub use repository::CustomerRepository;
