pub mod metrics;
pub mod proxy;
pub mod routing;

pub use metrics::init_metrics;
pub use proxy::Proxy;
pub use routing::RouteTable;
