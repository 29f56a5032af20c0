//! Retry a job a bounded number of times, sleeping before every attempt.
//!
//! A [`Retrier`] holds three settings: the attempt budget (`max_retry`), the
//! delay before the first attempt (`retry_delay`) and the amount added to
//! the delay after each failure (`extra_delay`). The job's own error type is
//! returned untouched once the budget is spent.
//!
//! ```rust,no_run
//! use retrier::Retrier;
//!
//! # async fn fetch() -> Result<String, std::io::Error> { Ok(String::new()) }
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let retrier = Retrier::new(5, 200, 100)?;
//! let body = retrier.retry(|| fetch()).await?;
//! # let _ = body;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod sleep;

mod retrier;

#[cfg(feature = "logging")]
pub mod logging;

pub use error::{ConfigOption, RetrierError};
pub use retrier::{Retrier, RetrierConfig};
pub use sleep::{sleep, Sleeper, TokioSleeper};
