use super::*;
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug)]
enum FakeError {
    Transient,
    Timeout,
    Fatal,
}

impl Display for FakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Retryable for FakeError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Transient)
    }

    fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

fn fast() -> RetryPolicy {
    RetryPolicy {
        initial_delay_ms: 1,
        max_delay_ms: 2,
        max_jitter_ms: 0,
        ..RetryPolicy::default()
    }
}

#[test]
fn backoff_doubles_and_caps() {
    let p = RetryPolicy::default();
    assert_eq!(p.base_delay(0), Duration::from_millis(1000));
    assert_eq!(p.base_delay(1), Duration::from_millis(2000));
    assert_eq!(p.base_delay(2), Duration::from_millis(4000));
    assert_eq!(p.base_delay(10), Duration::from_millis(30_000));
    assert_eq!(p.base_delay(80), Duration::from_millis(30_000));
}

#[test]
fn jitter_stays_within_bound() {
    let p = RetryPolicy::default();
    for _ in 0..50 {
        let d = p.delay(0);
        assert!(d >= Duration::from_millis(1000));
        assert!(d <= Duration::from_millis(2000));
    }
}

#[tokio::test]
async fn transient_errors_are_retried_until_success() {
    let calls = AtomicU32::new(0);
    let counter = &calls;
    let out: Result<u32, FakeError> = with_retry(&fast(), "op", || async move {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        if n < 2 { Err(FakeError::Transient) } else { Ok(n) }
    })
    .await;
    assert_eq!(out.unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn attempts_are_bounded() {
    let calls = AtomicU32::new(0);
    let counter = &calls;
    let out: Result<(), FakeError> = with_retry(&fast(), "op", || async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(FakeError::Transient)
    })
    .await;
    assert!(out.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn fatal_and_timeout_errors_fail_fast_by_default() {
    for timeout in [false, true] {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let out: Result<(), FakeError> = with_retry(&fast(), "op", || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(if timeout { FakeError::Timeout } else { FakeError::Fatal })
        })
        .await;
        assert!(out.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1, "timeout={timeout}");
    }
}

#[tokio::test]
async fn timeouts_retry_when_opted_in() {
    let policy = RetryPolicy {
        retry_on_timeout: true,
        ..fast()
    };
    let calls = AtomicU32::new(0);
    let counter = &calls;
    let out: Result<(), FakeError> = with_retry(&policy, "op", || async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(FakeError::Timeout)
    })
    .await;
    assert!(out.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}
