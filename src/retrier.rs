#[path = "retrier/config.rs"]
mod config;

#[path = "retrier/wrapper.rs"]
mod wrapper;

pub use config::RetrierConfig;
pub use wrapper::Retrier;
