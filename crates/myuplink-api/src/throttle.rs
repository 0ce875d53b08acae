// Request throttle and serialization gate.
//
// Every outbound request holds a `ThrottlePermit` for its whole lifetime.
// Acquiring a permit takes the single gate lock, then sleeps until the
// next-allowed instant. Dropping the permit records `now + delay`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::{Instant, sleep_until};
use tracing::debug;

#[derive(Debug)]
struct GateState {
    next_allowed: Instant,
}

/// Minimum-delay rate limiter combined with a one-at-a-time gate.
///
/// Clones share the same gate, so all clones of an `ApiClient` are spaced
/// against each other.
#[derive(Debug, Clone)]
pub struct Throttle {
    state: Arc<Mutex<GateState>>,
    delay: Duration,
}

impl Throttle {
    /// The first acquisition is admitted immediately.
    pub fn new(delay: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(GateState {
                next_allowed: Instant::now(),
            })),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait for the gate and the throttle delay.
    ///
    /// Cancel-safe: if this future is dropped before it resolves, the gate
    /// is released and the next-allowed instant is left untouched.
    pub async fn acquire(&self) -> ThrottlePermit {
        let guard = Arc::clone(&self.state).lock_owned().await;

        let next_allowed = guard.next_allowed;
        let now = Instant::now();
        if next_allowed > now {
            debug!(
                "delaying request by {:.3}s due to throttle",
                (next_allowed - now).as_secs_f64()
            );
            sleep_until(next_allowed).await;
        }

        ThrottlePermit {
            guard,
            delay: self.delay,
        }
    }

    /// Instant before which no new request will be sent.
    ///
    /// Waits for an in-flight request to finish first.
    pub async fn next_allowed(&self) -> Instant {
        self.state.lock().await.next_allowed
    }
}

/// Held while a request is in flight. Dropping it releases the gate.
#[derive(Debug)]
pub struct ThrottlePermit {
    guard: OwnedMutexGuard<GateState>,
    delay: Duration,
}

impl Drop for ThrottlePermit {
    fn drop(&mut self) {
        self.guard.next_allowed = Instant::now() + self.delay;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_secs(5);

    #[tokio::test(start_paused = true)]
    async fn first_acquire_is_immediate() {
        let throttle = Throttle::new(DELAY);
        let start = Instant::now();
        drop(throttle.acquire().await);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn back_to_back_requests_are_spaced() {
        let throttle = Throttle::new(DELAY);
        let start = Instant::now();

        drop(throttle.acquire().await);
        drop(throttle.acquire().await);
        assert_eq!(start.elapsed(), DELAY);

        drop(throttle.acquire().await);
        assert_eq!(start.elapsed(), DELAY * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_counts_from_release_not_acquire() {
        let throttle = Throttle::new(DELAY);
        let start = Instant::now();

        let permit = throttle.acquire().await;
        tokio::time::advance(Duration::from_secs(2)).await;
        drop(permit);

        assert_eq!(throttle.next_allowed().await, start + Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_wait_leaves_timestamp_untouched() {
        let throttle = Throttle::new(DELAY);
        let start = Instant::now();
        drop(throttle.acquire().await);

        let timed_out = tokio::time::timeout(Duration::from_secs(1), throttle.acquire()).await;
        assert!(timed_out.is_err());

        assert_eq!(throttle.next_allowed().await, start + DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_get_cumulative_spacing() {
        let throttle = Throttle::new(DELAY);
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..3 {
            let throttle = throttle.clone();
            handles.push(tokio::spawn(async move {
                let _permit = throttle.acquire().await;
                Instant::now()
            }));
        }

        let mut admitted = Vec::new();
        for handle in handles {
            admitted.push(handle.await.unwrap() - start);
        }
        admitted.sort();

        assert_eq!(admitted, vec![Duration::ZERO, DELAY, DELAY * 2]);
    }
}
