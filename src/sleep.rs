use std::time::Duration;

use async_trait::async_trait;

/// Waits for `delay_ms` milliseconds.
///
/// Never fails. A delay that is zero or negative completes immediately
/// without registering a timer.
pub async fn sleep(delay_ms: i64) {
    let Ok(delay_ms) = u64::try_from(delay_ms) else {
        return;
    };
    if delay_ms == 0 {
        return;
    }
    log::trace!("sleeping for {delay_ms}ms");
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
}

/// The delay primitive a [`Retrier`](crate::Retrier) waits on before each attempt.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay_ms: u64);
}

/// Default [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay_ms: u64) {
        sleep(i64::try_from(delay_ms).unwrap_or(i64::MAX)).await;
    }
}
