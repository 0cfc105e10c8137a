//! Identifier and timestamp provider.
//!
//! Every entity in the crate is keyed by a random v4 UUID and stamped with
//! an RFC 3339 UTC timestamp at millisecond precision. Timestamps come from
//! a [`Clock`] that clamps to the last issued instant, so a wall-clock step
//! backwards (NTP adjustment, VM resume) never produces an out-of-order
//! stamp. Fixed-width formatting means lexicographic order of stamps equals
//! chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Mint a fresh globally-unique identifier.
#[must_use]
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Monotonically non-decreasing wall-clock source.
///
/// `now_iso` never returns a stamp lexicographically smaller than one it
/// returned before. Equal stamps are possible (two calls within the same
/// millisecond, or while clamped); callers that need a total order break
/// ties by insertion order.
#[derive(Debug, Default)]
pub struct Clock {
    last: Option<DateTime<Utc>>,
}

impl Clock {
    /// Create a clock with no issued stamps yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Current UTC time as an RFC 3339 string, `2026-08-06T09:41:07.312Z`.
    pub fn now_iso(&mut self) -> String {
        let mut now = Utc::now();
        if let Some(last) = self.last {
            if now < last {
                now = last;
            }
        }
        self.last = Some(now);
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, new_id};
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_across_many_draws() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(new_id()), "duplicate id generated");
        }
    }

    #[test]
    fn stamps_are_fixed_width_utc() {
        let stamp = Clock::new().now_iso();
        assert_eq!(stamp.len(), 24, "unexpected stamp: {stamp}");
        assert!(stamp.ends_with('Z'));
        assert_eq!(&stamp[10..11], "T");
    }

    #[test]
    fn stamps_never_decrease() {
        let mut clock = Clock::new();
        let mut prev = clock.now_iso();
        for _ in 0..1_000 {
            let next = clock.now_iso();
            assert!(next >= prev, "{next} < {prev}");
            prev = next;
        }
    }

    #[test]
    fn clamp_holds_after_backwards_step() {
        // Force the clamp by pre-seeding `last` far in the future.
        let mut clock = Clock {
            last: Some(chrono::Utc::now() + chrono::Duration::hours(1)),
        };
        let first = clock.now_iso();
        let second = clock.now_iso();
        assert_eq!(first, second, "clamped stamps should repeat, not regress");
    }
}
