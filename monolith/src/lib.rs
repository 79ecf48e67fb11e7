pub mod config;
pub mod startup;

pub use startup::{router, Application};
