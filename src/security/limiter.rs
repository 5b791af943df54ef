//! Per-tool rate limiting.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::error::{BridgeError, Result};

/// Minimum spacing between calls to the same tool.
const MIN_INTERVAL: Duration = Duration::from_millis(1000);

/// Tracks the last allowed call per tool and refuses calls that arrive
/// inside the minimum interval. A refused call does not move the
/// window; the tool stays usable at the originally scheduled time.
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<HashMap<String, Instant>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    /// Limiter with the standard interval.
    pub fn new() -> Self {
        Self::with_interval(MIN_INTERVAL)
    }

    /// Limiter with a custom interval.
    pub fn with_interval(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(HashMap::new()),
        }
    }

    /// Check and stamp one call for `tool`.
    pub async fn check(&self, tool: &str) -> Result<()> {
        let mut last_call = self.last_call.lock().await;
        let now = Instant::now();

        if let Some(last) = last_call.get(tool) {
            if now.duration_since(*last) < self.min_interval {
                return Err(BridgeError::RateLimited(tool.to_string()));
            }
        }

        last_call.insert(tool.to_string(), now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_second_immediate_call_is_limited() {
        let limiter = RateLimiter::with_interval(Duration::from_secs(3600));
        limiter.check("claudeus_wp_content__get_posts").await.unwrap();

        let err = limiter
            .check("claudeus_wp_content__get_posts")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded for tool: claudeus_wp_content__get_posts"
        );
    }

    #[tokio::test]
    async fn test_tools_are_limited_independently() {
        let limiter = RateLimiter::with_interval(Duration::from_secs(3600));
        limiter.check("claudeus_wp_content__get_posts").await.unwrap();
        limiter.check("claudeus_wp_content__get_pages").await.unwrap();
    }

    #[tokio::test]
    async fn test_zero_interval_never_limits() {
        let limiter = RateLimiter::with_interval(Duration::ZERO);
        for _ in 0..5 {
            limiter.check("claudeus_wp_shop__get_products").await.unwrap();
        }
    }
}
