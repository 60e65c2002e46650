use std::{
    sync::atomic::{AtomicU32, AtomicU64, Ordering},
    time::{Duration, Instant},
};

use crate::{LimitPolicy, RateLimitError, Tier};

/// Marks a limiter that has not seen a request yet
const NO_WINDOW: u64 = u64::MAX;

/// Fixed-window request counter owned by one service instance
///
/// The window opens on the first request and is reset by the first check
/// that arrives more than one window after it opened. Requests are counted
/// when admitted, not when they complete, so a burst straddling a window
/// boundary can admit up to twice the nominal limit.
///
/// The check and the increment are separate atomic operations. Concurrent
/// callers on the same instance can all pass the check before any of them
/// increments, admitting more than the limit. Callers that need a hard
/// ceiling must serialize their checks.
#[derive(Debug)]
pub struct WindowLimiter {
    policy: LimitPolicy,
    window: Duration,
    origin: Instant,
    /// Nanoseconds after `origin` at which the current window opened
    window_start: AtomicU64,
    request_count: AtomicU32,
}

impl WindowLimiter {
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

    /// Create a limiter with the one-minute window
    pub fn new(policy: LimitPolicy) -> Self {
        Self {
            policy,
            window: Self::DEFAULT_WINDOW,
            origin: Instant::now(),
            window_start: AtomicU64::new(NO_WINDOW),
            request_count: AtomicU32::new(0),
        }
    }

    /// Create a limiter with a custom window length
    pub fn with_window(policy: LimitPolicy, window: Duration) -> Result<Self, RateLimitError> {
        if window.is_zero() {
            return Err(RateLimitError::Config("rate limit window must be > 0".to_string()));
        }

        Ok(Self {
            window,
            ..Self::new(policy)
        })
    }

    /// Admit or reject one request for `tier`
    pub fn check(&self, tier: Tier) -> Result<(), RateLimitError> {
        self.check_at(tier, Instant::now())
    }

    /// Admit or reject one request for `tier` as of `now`
    pub fn check_at(&self, tier: Tier, now: Instant) -> Result<(), RateLimitError> {
        let now = nanos(now.saturating_duration_since(self.origin));
        let window = nanos(self.window);

        let start = self.window_start.load(Ordering::Acquire);
        if start == NO_WINDOW || now.saturating_sub(start) > window {
            tracing::trace!(?tier, "rate limit window reset");
            self.request_count.store(0, Ordering::Release);
            self.window_start.store(now, Ordering::Release);
        }

        let count = self.request_count.load(Ordering::Acquire);

        if let Some(limit) = self.policy.limit_for(tier)
            && count >= limit
        {
            let elapsed = now.saturating_sub(self.window_start.load(Ordering::Acquire));
            let remaining = Duration::from_nanos(window.saturating_sub(elapsed));

            return Err(RateLimitError::Exceeded {
                tier,
                limit,
                retry_after: (remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)).max(1),
            });
        }

        self.request_count.fetch_add(1, Ordering::AcqRel);

        Ok(())
    }

    /// Requests admitted in the current window
    pub fn request_count(&self) -> u32 {
        self.request_count.load(Ordering::Acquire)
    }

    pub const fn policy(&self) -> &LimitPolicy {
        &self.policy
    }
}

fn nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(NO_WINDOW - 1)
}
