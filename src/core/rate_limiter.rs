use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use teloxide::types::UserId;

use crate::core::config;

/// Per-user cooldown tracker.
///
/// Stores the time of the last *accepted* request of every user. A request
/// inside the cooldown window is rejected without touching the stored time,
/// so hammering the bot does not extend the wait.
#[derive(Debug)]
pub struct RateLimiter {
    /// Last accepted request per user
    last_accepted: DashMap<UserId, Instant>,
    /// Minimum time between two accepted requests
    cooldown: Duration,
}

impl RateLimiter {
    /// Creates a limiter with the default cooldown (10 seconds).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tubelift::core::rate_limiter::RateLimiter;
    ///
    /// let limiter = RateLimiter::new();
    /// ```
    pub fn new() -> Self {
        Self::with_cooldown(config::rate_limit::cooldown())
    }

    /// Creates a limiter with a custom cooldown.
    pub fn with_cooldown(cooldown: Duration) -> Self {
        Self {
            last_accepted: DashMap::new(),
            cooldown,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Checks whether `user` may start a request at `now` and, if so, records it.
    ///
    /// Returns `true` when the request is accepted. Acceptance starts the next
    /// cooldown window immediately, whatever happens to the download afterwards.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::{Duration, Instant};
    /// use teloxide::types::UserId;
    /// use tubelift::core::rate_limiter::RateLimiter;
    ///
    /// let limiter = RateLimiter::with_cooldown(Duration::from_secs(10));
    /// let t0 = Instant::now();
    /// assert!(limiter.check_and_record(UserId(1), t0));
    /// assert!(!limiter.check_and_record(UserId(1), t0 + Duration::from_secs(3)));
    /// assert!(limiter.check_and_record(UserId(1), t0 + Duration::from_secs(10)));
    /// ```
    pub fn check_and_record(&self, user: UserId, now: Instant) -> bool {
        match self.last_accepted.entry(user) {
            Entry::Occupied(mut entry) => {
                if now.saturating_duration_since(*entry.get()) < self.cooldown {
                    return false;
                }
                entry.insert(now);
                true
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
        }
    }

    /// Time left until `user` may send the next request, if any.
    pub fn remaining(&self, user: UserId, now: Instant) -> Option<Duration> {
        let last = *self.last_accepted.get(&user)?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.cooldown {
            Some(self.cooldown - elapsed)
        } else {
            None
        }
    }

    /// Drops entries whose cooldown has already elapsed.
    ///
    /// An expired entry and a missing entry behave identically, so sweeping
    /// only bounds memory. Returns the number of removed entries.
    pub fn sweep_expired(&self, now: Instant) -> usize {
        let before = self.last_accepted.len();
        self.last_accepted
            .retain(|_, last| now.saturating_duration_since(*last) < self.cooldown);
        before.saturating_sub(self.last_accepted.len())
    }

    /// Number of tracked users
    pub fn tracked_users(&self) -> usize {
        self.last_accepted.len()
    }

    /// Runs `sweep_expired` every `interval` for the lifetime of the process.
    pub fn spawn_cleanup_task(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick fires immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = self.sweep_expired(Instant::now());
                if removed > 0 {
                    log::debug!(
                        "Rate limiter sweep removed {} expired entries ({} left)",
                        removed,
                        self.tracked_users()
                    );
                }
            }
        })
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::from_secs(10);

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_first_request_is_accepted() {
        let limiter = RateLimiter::with_cooldown(COOLDOWN);
        assert!(limiter.check_and_record(UserId(42), Instant::now()));
        assert_eq!(limiter.tracked_users(), 1);
    }

    #[test]
    fn test_rejection_does_not_reset_window() {
        let limiter = RateLimiter::with_cooldown(COOLDOWN);
        let t0 = Instant::now();
        assert!(limiter.check_and_record(UserId(1), t0));
        assert!(!limiter.check_and_record(UserId(1), t0 + secs(3)));
        assert!(!limiter.check_and_record(UserId(1), t0 + secs(9)));
        // Measured from t0, not from the rejected attempts
        assert!(limiter.check_and_record(UserId(1), t0 + secs(10)));
        assert!(!limiter.check_and_record(UserId(1), t0 + secs(19)));
        assert!(limiter.check_and_record(UserId(1), t0 + secs(20)));
    }

    #[test]
    fn test_users_are_independent() {
        let limiter = RateLimiter::with_cooldown(COOLDOWN);
        let t0 = Instant::now();
        assert!(limiter.check_and_record(UserId(1), t0));
        assert!(limiter.check_and_record(UserId(2), t0 + secs(1)));
        assert!(!limiter.check_and_record(UserId(1), t0 + secs(2)));
    }

    #[test]
    fn test_remaining() {
        let limiter = RateLimiter::with_cooldown(COOLDOWN);
        let t0 = Instant::now();
        assert_eq!(limiter.remaining(UserId(7), t0), None);
        limiter.check_and_record(UserId(7), t0);
        assert_eq!(limiter.remaining(UserId(7), t0 + secs(3)), Some(secs(7)));
        assert_eq!(limiter.remaining(UserId(7), t0 + secs(10)), None);
    }

    #[test]
    fn test_sweep_keeps_active_windows() {
        let limiter = RateLimiter::with_cooldown(COOLDOWN);
        let t0 = Instant::now();
        limiter.check_and_record(UserId(1), t0);
        limiter.check_and_record(UserId(2), t0 + secs(8));

        assert_eq!(limiter.sweep_expired(t0 + secs(12)), 1);
        assert_eq!(limiter.tracked_users(), 1);
        // User 2 is still cooling down after the sweep
        assert!(!limiter.check_and_record(UserId(2), t0 + secs(12)));
        // User 1 behaves as a fresh user
        assert!(limiter.check_and_record(UserId(1), t0 + secs(12)));
    }

    #[tokio::test]
    async fn test_cleanup_task_sweeps() {
        let limiter = Arc::new(RateLimiter::with_cooldown(Duration::from_millis(10)));
        limiter.check_and_record(UserId(1), Instant::now());

        let handle = Arc::clone(&limiter).spawn_cleanup_task(Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(120)).await;
        handle.abort();

        assert_eq!(limiter.tracked_users(), 0);
    }
}
