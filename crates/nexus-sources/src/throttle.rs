use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Minimum spacing between consecutive requests to one catalog.
///
/// Callers queue on the mutex (FIFO) so no request is dropped; each one
/// waits out whatever is left of the interval since the previous dispatch.
pub struct RequestThrottle {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RequestThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval,
        }
    }

    /// Wait if necessary, then record this dispatch
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_throttle_spacing() {
        let throttle = RequestThrottle::new(Duration::from_millis(500));
        let start = Instant::now();

        throttle.wait().await;
        let first_elapsed = start.elapsed();

        throttle.wait().await;
        let second_elapsed = start.elapsed();

        throttle.wait().await;
        let third_elapsed = start.elapsed();

        assert!(first_elapsed < Duration::from_millis(100));
        assert!(second_elapsed >= Duration::from_millis(500));
        assert!(third_elapsed >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_queue() {
        let throttle = Arc::new(RequestThrottle::new(Duration::from_millis(1000)));
        let start = Instant::now();

        let waits = (0..3).map(|_| {
            let throttle = throttle.clone();
            async move {
                throttle.wait().await;
                start.elapsed()
            }
        });
        let mut finished = futures::future::join_all(waits).await;
        finished.sort();

        assert!(finished[0] < Duration::from_millis(100));
        assert!(finished[1] >= Duration::from_millis(1000));
        assert!(finished[2] >= Duration::from_millis(2000));
    }
}
