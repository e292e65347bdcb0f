use crate::utils::error::{CheckError, Result};
use std::future::Future;
use std::time::{Duration, Instant};

/// 輪詢退避參數
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub deadline: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
            multiplier: 2.0,
            deadline: Duration::from_secs(15),
        }
    }
}

impl PollPolicy {
    /// 不等待，只試一次；測試對 mock server 使用
    pub fn immediate() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 1.0,
            deadline: Duration::ZERO,
        }
    }

    fn next_delay(&self, current: Duration) -> Duration {
        Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// 反覆呼叫 `op` 直到回傳 `Ok(Some(_))`。
///
/// `Ok(None)` 代表資源尚未就緒，依退避策略等待後重試；`Err` 立即中止。
/// 超過 `deadline` 仍未就緒時回傳 `NotQueryableError`。第一次呼叫不等待。
pub async fn poll_until<T, F, Fut>(policy: &PollPolicy, resource: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let started = Instant::now();
    let mut delay = policy.initial_delay.min(policy.max_delay);
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        if let Some(value) = op().await? {
            tracing::debug!("⏱️ {} ready after {} attempt(s)", resource, attempts);
            return Ok(value);
        }

        let elapsed = started.elapsed();
        if elapsed >= policy.deadline {
            return Err(CheckError::NotQueryableError {
                user_list_id: resource.to_string(),
                attempts,
                elapsed,
            });
        }

        let sleep_for = delay.min(policy.deadline - elapsed);
        tracing::debug!(
            "⏱️ {} not ready (attempt {}), retrying in {:?}",
            resource,
            attempts,
            sleep_for
        );
        tokio::time::sleep(sleep_for).await;
        delay = policy.next_delay(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(deadline_ms: u64) -> PollPolicy {
        PollPolicy {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            multiplier: 2.0,
            deadline: Duration::from_millis(deadline_ms),
        }
    }

    #[tokio::test]
    async fn test_ready_on_first_attempt() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let value = poll_until(&PollPolicy::immediate(), "42", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some("ready"))
        })
        .await
        .unwrap();

        assert_eq!(value, "ready");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ready_on_third_attempt() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let value = poll_until(&fast_policy(5_000), "42", move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(if n >= 3 { Some(n) } else { None })
        })
        .await
        .unwrap();

        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_never_ready_hits_deadline() {
        let err = poll_until(&fast_policy(20), "42", || async { Ok(None::<()>) })
            .await
            .unwrap_err();

        match err {
            CheckError::NotQueryableError {
                user_list_id,
                attempts,
                elapsed,
            } => {
                assert_eq!(user_list_id, "42");
                assert!(attempts >= 2);
                assert!(elapsed >= Duration::from_millis(20));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_immediate_policy_tries_once() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = poll_until(&PollPolicy::immediate(), "42", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(None::<()>)
        })
        .await;

        assert!(matches!(
            result,
            Err(CheckError::NotQueryableError { attempts: 1, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_error_aborts_without_retry() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = poll_until(&fast_policy(5_000), "42", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<Option<()>, _>(CheckError::ConfigError {
                message: "boom".to_string(),
            })
        })
        .await;

        assert!(matches!(result, Err(CheckError::ConfigError { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delay_is_capped() {
        let policy = fast_policy(100);
        let d = policy.next_delay(Duration::from_millis(3));
        assert_eq!(d, Duration::from_millis(4));
    }

    #[test]
    fn test_non_finite_multiplier_falls_back_to_max_delay() {
        let policy = PollPolicy {
            multiplier: f64::NAN,
            ..fast_policy(100)
        };
        assert_eq!(policy.next_delay(Duration::from_millis(1)), policy.max_delay);
    }
}
