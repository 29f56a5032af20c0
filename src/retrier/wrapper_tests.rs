use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::*;

#[derive(Default)]
struct RecordingSleeper {
    delays: Mutex<Vec<u64>>,
}

impl RecordingSleeper {
    fn delays(&self) -> Vec<u64> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay_ms: u64) {
        self.delays.lock().unwrap().push(delay_ms);
    }
}

fn recording(retrier: Retrier) -> (Retrier, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::default());
    (retrier.with_sleeper(sleeper.clone()), sleeper)
}

#[tokio::test]
async fn succeeding_job_runs_once() {
    let (retrier, sleeper) = recording(Retrier::default());
    let mut calls = 0;

    let result = retrier
        .retry(|| {
            calls += 1;
            async { Ok::<_, String>("value") }
        })
        .await;

    assert_eq!(result, Ok("value"));
    assert_eq!(calls, 1);
    assert_eq!(sleeper.delays(), vec![500]);
}

#[tokio::test]
async fn failing_job_exhausts_budget_and_returns_last_error() {
    let (retrier, sleeper) = recording(Retrier::new(4, 100, 50).unwrap());
    let mut calls = 0;

    let result = retrier
        .retry(|| {
            calls += 1;
            let attempt = calls;
            async move { Err::<(), _>(format!("attempt {attempt}")) }
        })
        .await;

    assert_eq!(result, Err("attempt 4".to_string()));
    assert_eq!(calls, 4);
    assert_eq!(sleeper.delays(), vec![100, 150, 200, 250]);
}

#[tokio::test]
async fn second_attempt_succeeds_with_grown_delay() {
    let (retrier, sleeper) = recording(Retrier::new(3, 500, 500).unwrap());
    let mut calls = 0;

    let result = retrier
        .retry(|| {
            calls += 1;
            let outcome = if calls == 1 { Err("message") } else { Ok("value") };
            async move { outcome }
        })
        .await;

    assert_eq!(result, Ok("value"));
    assert_eq!(calls, 2);
    assert_eq!(sleeper.delays(), vec![500, 1000]);
}

#[tokio::test]
async fn sync_job_follows_same_loop() {
    let (retrier, sleeper) = recording(Retrier::default());
    let mut calls = 0;

    let result: Result<(), &str> = retrier
        .retry_sync(|| {
            calls += 1;
            Err("message")
        })
        .await;

    assert_eq!(result, Err("message"));
    assert_eq!(calls, 3);
    assert_eq!(sleeper.delays(), vec![500, 500, 500]);
}

#[tokio::test]
async fn single_attempt_budget_never_retries() {
    let (retrier, sleeper) = recording(Retrier::new(1, 10, 10).unwrap());
    let mut calls = 0;

    let result = retrier
        .retry_sync(|| {
            calls += 1;
            Err::<(), _>("boom")
        })
        .await;

    assert_eq!(result, Err("boom"));
    assert_eq!(calls, 1);
    assert_eq!(sleeper.delays(), vec![10]);
}

#[tokio::test]
async fn setters_after_call_start_do_not_affect_it() {
    let (mut retrier, sleeper) = recording(Retrier::new(3, 10, 10).unwrap());

    let call = retrier.retry_sync(|| Err::<(), _>("fail"));
    retrier.set_max_retry(1).unwrap();
    retrier.set_extra_delay(1000).unwrap();

    assert_eq!(call.await, Err("fail"));
    assert_eq!(sleeper.delays(), vec![10, 20, 30]);
    assert_eq!(retrier.max_retry(), 1);
    assert_eq!(retrier.extra_delay(), 1000);
}

#[test]
fn failed_setter_keeps_previous_value() {
    let mut retrier = Retrier::default();

    let err = retrier.set_max_retry(0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The 'maxRetry' option must be an integer greater than 0"
    );
    assert_eq!(retrier.max_retry(), 3);

    retrier.set_max_retry(5).unwrap();
    assert_eq!(retrier.max_retry(), 5);
}

#[test]
fn constructor_rejects_invalid_values() {
    let err = Retrier::new(3, 500, -1).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The 'extraDelay' option must be an integer greater than or equal 0"
    );
}
