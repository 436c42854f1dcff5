//! Per-identity cooldown computed from a client-held timestamp
//!
//! The gateway keeps no per-user state between requests: the caller
//! presents the timestamp of its last admitted attempt and receives the
//! updated value back with each response. Enforcement therefore rests on
//! the caller returning the token unchanged; a client that drops or
//! rewrites it defeats the cooldown. Known limitation of the token-bearer
//! design, kept as-is.

use std::time::Duration;

/// Outcome of a cooldown check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownDecision {
    Allowed,
    Blocked { wait_secs: u64 },
}

/// Stateless cooldown window
#[derive(Debug, Clone, Copy)]
pub struct CooldownGate {
    window: Duration,
}

impl CooldownGate {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }

    /// Check a caller's last admitted attempt against the window. The
    /// remaining wait is reported in whole seconds, rounded up, and never
    /// exceeds the window length even for timestamps claiming to be in the
    /// future.
    pub fn check(&self, last_request_ms: Option<i64>, now_ms: i64) -> CooldownDecision {
        let window_ms = self.window_ms();
        if window_ms == 0 {
            return CooldownDecision::Allowed;
        }

        let Some(last) = last_request_ms else {
            return CooldownDecision::Allowed;
        };

        let elapsed = now_ms - last;
        if elapsed >= window_ms {
            return CooldownDecision::Allowed;
        }

        let remaining = window_ms - elapsed.max(0);
        let wait_secs = ((remaining + 999) / 1000) as u64;
        CooldownDecision::Blocked { wait_secs }
    }
}
