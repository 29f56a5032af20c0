use std::fmt;
use std::future::{self, Future};
use std::sync::Arc;

use crate::error::RetrierError;
use crate::sleep::{Sleeper, TokioSleeper};

use super::config::RetrierConfig;

/// Runs a job until it succeeds or its attempt budget is spent, sleeping
/// before every attempt.
///
/// The delay starts at `retry_delay` and grows by `extra_delay` after each
/// failed attempt. Each call snapshots the config when it starts, so setters
/// called afterwards only affect later calls.
#[derive(Clone)]
pub struct Retrier {
    cfg: RetrierConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for Retrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retrier")
            .field("cfg", &self.cfg)
            .field("sleeper", &"<sleeper>")
            .finish()
    }
}

impl Default for Retrier {
    fn default() -> Self {
        Self::from_config(RetrierConfig::default())
    }
}

impl Retrier {
    /// Creates a retrier, validating `max_retry`, `retry_delay` and
    /// `extra_delay` in that order.
    pub fn new(max_retry: i64, retry_delay: i64, extra_delay: i64) -> Result<Self, RetrierError> {
        Ok(Self::from_config(RetrierConfig::new(
            max_retry,
            retry_delay,
            extra_delay,
        )?))
    }

    pub fn from_config(cfg: RetrierConfig) -> Self {
        Self {
            cfg,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replaces the delay primitive waited on before each attempt.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn config(&self) -> &RetrierConfig {
        &self.cfg
    }

    pub fn set_max_retry(&mut self, max_retry: i64) -> Result<(), RetrierError> {
        self.cfg.set_max_retry(max_retry)
    }

    pub fn set_retry_delay(&mut self, retry_delay: i64) -> Result<(), RetrierError> {
        self.cfg.set_retry_delay(retry_delay)
    }

    pub fn set_extra_delay(&mut self, extra_delay: i64) -> Result<(), RetrierError> {
        self.cfg.set_extra_delay(extra_delay)
    }

    pub fn max_retry(&self) -> u32 {
        self.cfg.max_retry()
    }

    pub fn retry_delay(&self) -> u64 {
        self.cfg.retry_delay()
    }

    pub fn extra_delay(&self) -> u64 {
        self.cfg.extra_delay()
    }

    /// Retries an asynchronous job.
    ///
    /// Resolves with the first successful value, or with the error of the
    /// last attempt once `max_retry` attempts have failed. Earlier errors are
    /// discarded. The returned future does not borrow the retrier.
    pub fn retry<F, Fut, T, E>(&self, mut job: F) -> impl Future<Output = Result<T, E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let cfg = self.cfg;
        let sleeper = Arc::clone(&self.sleeper);

        async move {
            let max_retry = cfg.max_retry();
            let extra_delay = cfg.extra_delay();
            let mut delay = cfg.retry_delay();
            let mut attempt = 1u32;

            loop {
                sleeper.sleep(delay).await;

                match job().await {
                    Ok(value) => return Ok(value),
                    Err(_) if attempt < max_retry => {
                        delay = delay.saturating_add(extra_delay);
                        log::debug!(
                            "attempt {attempt}/{max_retry} failed, retrying in {delay}ms"
                        );
                        attempt += 1;
                    }
                    Err(err) => {
                        log::debug!("attempt {attempt}/{max_retry} failed, giving up");
                        return Err(err);
                    }
                }
            }
        }
    }

    /// Retries a synchronous job. Sleeps between attempts are still
    /// asynchronous.
    pub fn retry_sync<F, T, E>(&self, mut job: F) -> impl Future<Output = Result<T, E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        self.retry(move || future::ready(job()))
    }
}

#[cfg(test)]
#[path = "wrapper_tests.rs"]
mod tests;
