//! Progressive request throttling policy

use chrono::{DateTime, Duration, Utc};

/// Decision returned by the throttle policy for a prospective request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleDecision {
    /// Whether the request may proceed now
    pub allowed: bool,
    /// Seconds left to wait when not allowed (0 when allowed)
    pub waiting_seconds: u64,
    /// Earliest instant the request is accepted; `None` for a first request
    pub next_allowed_at: Option<DateTime<Utc>>,
}

/// Pure throttling policy over an ordered wait-interval table
///
/// The wait for the Nth request (1-based) is `table[min(N - 1, len - 1)]`
/// seconds measured from the previous request. The policy holds no state;
/// the request history it is judged against lives in the request store.
#[derive(Debug, Clone)]
pub struct ThrottlePolicy {
    waiting_periods: Vec<u64>,
}

impl ThrottlePolicy {
    /// Creates a policy over the given wait table; an empty table degrades
    /// to no throttling
    pub fn new(waiting_periods: Vec<u64>) -> Self {
        let waiting_periods = if waiting_periods.is_empty() {
            vec![0]
        } else {
            waiting_periods
        };
        Self { waiting_periods }
    }

    /// Wait in seconds required before the request with the given 1-based
    /// generation sequence
    pub fn wait_for_sequence(&self, generation_sequence: u32) -> u64 {
        let index = (generation_sequence.saturating_sub(1) as usize)
            .min(self.waiting_periods.len() - 1);
        self.waiting_periods[index]
    }

    /// Judges whether request number `generation_sequence` may proceed at
    /// `now`, given when the previous request was made
    pub fn check(
        &self,
        generation_sequence: u32,
        last_request_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> ThrottleDecision {
        let Some(last_request_at) = last_request_at else {
            return ThrottleDecision {
                allowed: true,
                waiting_seconds: 0,
                next_allowed_at: None,
            };
        };

        let wait = self.wait_for_sequence(generation_sequence);
        let next_allowed_at = last_request_at + Duration::seconds(wait as i64);
        // Round the remaining wait up so a caller is never told to retry
        // a moment too early.
        let remaining_ms = (next_allowed_at - now).num_milliseconds().max(0);
        let remaining = ((remaining_ms + 999) / 1000) as u64;

        ThrottleDecision {
            allowed: now >= next_allowed_at,
            waiting_seconds: remaining,
            next_allowed_at: Some(next_allowed_at),
        }
    }
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self::new(vg_shared::config::otp::DEFAULT_WAITING_PERIODS.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_follows_table_and_clamps_at_last_entry() {
        let policy = ThrottlePolicy::default();
        let expected = [0, 5, 30, 300, 1800, 3600, 3600, 3600];
        for (n, want) in (1u32..=8).zip(expected) {
            assert_eq!(policy.wait_for_sequence(n), want, "request {}", n);
        }
    }

    #[test]
    fn first_request_is_always_allowed() {
        let policy = ThrottlePolicy::default();
        let decision = policy.check(1, None, Utc::now());
        assert!(decision.allowed);
        assert_eq!(decision.waiting_seconds, 0);
        assert!(decision.next_allowed_at.is_none());
    }

    #[test]
    fn second_request_waits_five_seconds() {
        let policy = ThrottlePolicy::default();
        let now = Utc::now();

        let immediate = policy.check(2, Some(now), now);
        assert!(!immediate.allowed);
        assert_eq!(immediate.waiting_seconds, 5);
        assert_eq!(immediate.next_allowed_at, Some(now + Duration::seconds(5)));

        let later = policy.check(2, Some(now), now + Duration::seconds(5));
        assert!(later.allowed);
        assert_eq!(later.waiting_seconds, 0);
    }

    #[test]
    fn waiting_seconds_counts_down() {
        let policy = ThrottlePolicy::default();
        let now = Utc::now();
        let decision = policy.check(4, Some(now), now + Duration::seconds(100));
        assert!(!decision.allowed);
        assert_eq!(decision.waiting_seconds, 200);
    }

    #[test]
    fn empty_table_means_no_throttling() {
        let policy = ThrottlePolicy::new(Vec::new());
        let now = Utc::now();
        assert!(policy.check(7, Some(now), now).allowed);
    }
}
