//! Header-driven request budget.

use std::time::Duration;

use reqwest::header::HeaderMap;
use tokio::time::Instant;

const USED: &str = "x-ratelimit-used";
const REMAINING: &str = "x-ratelimit-remaining";
const RESET: &str = "x-ratelimit-reset";

/// Tracks Reddit's `x-ratelimit-*` budget for one session.
///
/// Until a response carries the headers the budget is unknown and no delay
/// is imposed. Once fewer than one request remains, callers wait until the
/// window resets.
///
/// # Example
///
/// ```
/// use reddit_rs::client::RateLimiter;
/// use reqwest::header::{HeaderMap, HeaderValue};
///
/// let mut limiter = RateLimiter::new();
/// assert!(limiter.delay_before_next_call().is_zero());
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-ratelimit-used", HeaderValue::from_static("10"));
/// headers.insert("x-ratelimit-remaining", HeaderValue::from_static("590.0"));
/// headers.insert("x-ratelimit-reset", HeaderValue::from_static("300"));
/// limiter.observe(&headers);
/// assert_eq!(limiter.remaining(), Some(590.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    used: Option<u64>,
    remaining: Option<f64>,
    reset_at: Option<Instant>,
    last_cost: Option<u64>,
}

impl RateLimiter {
    /// An empty limiter with unknown budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the budget from a response's headers.
    ///
    /// Responses without a parseable `x-ratelimit-remaining` leave the state
    /// untouched.
    pub fn observe(&mut self, headers: &HeaderMap) {
        let Some(remaining) = header_value::<f64>(headers, REMAINING) else {
            return;
        };

        let used = header_value::<u64>(headers, USED);
        if let (Some(now), Some(before)) = (used, self.used) {
            self.last_cost = Some(now.saturating_sub(before));
        }

        self.remaining = Some(remaining);
        if used.is_some() {
            self.used = used;
        }
        // Negative, non-finite or out-of-range resets are ignored.
        if let Some(reset_at) = header_value::<f64>(headers, RESET)
            .and_then(|reset| Duration::try_from_secs_f64(reset).ok())
            .and_then(|reset| Instant::now().checked_add(reset))
        {
            self.reset_at = Some(reset_at);
        }

        tracing::trace!(
            used = ?self.used,
            remaining,
            "rate limit budget updated"
        );
    }

    /// How long to wait before the next request may be sent.
    pub fn delay_before_next_call(&self) -> Duration {
        match (self.remaining, self.reset_at) {
            (Some(remaining), Some(reset_at)) if remaining < 1.0 => {
                reset_at.saturating_duration_since(Instant::now())
            }
            _ => Duration::ZERO,
        }
    }

    /// Requests used in the current window, if known.
    pub fn used(&self) -> Option<u64> {
        self.used
    }

    /// Requests remaining in the current window, if known.
    pub fn remaining(&self) -> Option<f64> {
        self.remaining
    }

    /// When the current window resets, if known.
    pub fn reset_at(&self) -> Option<Instant> {
        self.reset_at
    }

    /// Budget consumed by the most recent call.
    pub fn last_cost(&self) -> Option<u64> {
        self.last_cost
    }
}

fn header_value<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
