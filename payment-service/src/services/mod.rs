pub mod metrics;
pub mod recording;
pub mod repository;

pub use metrics::init_metrics;
pub use recording::record_payment;
pub use repository::PaymentRepository;
