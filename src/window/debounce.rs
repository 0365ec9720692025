use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::window::handle::{WindowHandle, WindowQuery};
use crate::window::op::OpKind;

/// What a debounced operation is aimed at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DebounceTarget {
    Window(WindowHandle),
    Query(WindowQuery),
    Global,
}

pub type DebounceKey = (OpKind, DebounceTarget);

/// Suppresses an operation when an identical one ran less than its interval
/// ago. Suppressed calls are not recorded, so the interval is measured from
/// the last call that was let through.
#[derive(Debug, Default)]
pub struct RateLimiter {
    last: HashMap<DebounceKey, Instant>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(&mut self, key: DebounceKey, interval: Duration) -> bool {
        self.allow_at(key, interval, Instant::now())
    }

    pub fn allow_at(&mut self, key: DebounceKey, interval: Duration, now: Instant) -> bool {
        if interval.is_zero() {
            return true;
        }
        if let Some(prev) = self.last.get(&key) {
            if now.saturating_duration_since(*prev) < interval {
                return false;
            }
        }
        self.last.insert(key, now);
        true
    }

    /// Drop the record for `key`, so the next call is let through.
    pub fn forget(&mut self, key: &DebounceKey) {
        self.last.remove(key);
    }
}
