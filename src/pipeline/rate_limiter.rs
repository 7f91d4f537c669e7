use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, Semaphore};

#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub requests_per_min: Option<u64>,
    pub concurrency: Option<u32>,
}

/// Shared request limiter for remote collaborators that impose a minimum
/// spacing between calls. Clones share one bucket, so the spacing holds
/// globally across any number of workers.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    limits: Limits,
    // spacing bucket: time of last refill and the current tokens,
    // capacity 1 so requests are evenly spaced rather than bursty
    tokens: Mutex<(f64, Instant)>,
    sem: Option<Semaphore>,
}

impl RateLimiter {
    pub fn new(limits: Limits) -> Self {
        let sem = limits.concurrency.map(|c| Semaphore::new(c as usize));
        Self {
            inner: Arc::new(Inner {
                limits,
                tokens: Mutex::new((1.0, Instant::now())),
                sem,
            }),
        }
    }

    /// Convenience constructor for a strict minimum interval between
    /// requests, the shape the geocoding collaborator requires.
    pub fn with_min_interval(interval: Duration) -> Self {
        let secs = interval.as_secs_f64().max(0.001);
        Self::new(Limits {
            requests_per_min: Some((60.0 / secs).round().max(1.0) as u64),
            concurrency: None,
        })
    }

    // Acquire permission for one request. Awaits as needed.
    pub async fn acquire(&self) {
        let _permit = if let Some(sem) = &self.inner.sem {
            Some(sem.acquire().await.expect("semaphore closed"))
        } else {
            None
        };

        let Some(rpm) = self.inner.limits.requests_per_min.filter(|r| *r > 0) else {
            return;
        };
        let refill_rate = rpm as f64 / 60.0; // tokens per second

        loop {
            let mut guard = self.inner.tokens.lock().await;
            let (ref mut tokens, ref mut last) = *guard;
            let now = Instant::now();
            let elapsed = now.duration_since(*last).as_secs_f64();
            *tokens = (*tokens + elapsed * refill_rate).min(1.0);
            *last = now;
            if *tokens >= 1.0 {
                *tokens -= 1.0;
                return;
            }
            let need = 1.0 - *tokens;
            let secs = need / refill_rate;
            drop(guard);
            tokio::time::sleep(Duration::from_secs_f64(secs.max(0.001))).await;
        }
    }
}
