use crate::config::RateLimitConfig;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// Sliding-window per-client admission gate.
///
/// Each key maps to the instants of its admitted requests inside the
/// trailing window. The window boundary trails "now" continuously, so a
/// burst that fills the limit at t=0 only fully recovers at t=window, not
/// at the next minute boundary.
///
/// Prune-check-append runs as one unit under the map mutex; concurrent
/// requests on the same key can never observe a stale count and
/// over-admit. No I/O happens while the lock is held.
#[derive(Default)]
pub struct RateLimiter {
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Admission check against the current instant.
    pub fn allow(&self, key: &str, cfg: &RateLimitConfig) -> bool {
        self.allow_at(key, cfg, Instant::now())
    }

    /// Admission check at an explicit instant. Never fails: an unknown key
    /// counts as zero prior requests. Denial does not record the attempt.
    pub fn allow_at(&self, key: &str, cfg: &RateLimitConfig, now: Instant) -> bool {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let window = windows.entry(key.to_string()).or_default();
        while window
            .front()
            .is_some_and(|&t| now.saturating_duration_since(t) >= cfg.window)
        {
            window.pop_front();
        }
        if window.len() >= cfg.max_requests as usize {
            return false;
        }
        window.push_back(now);
        true
    }

    /// Drops keys whose windows have fully expired. Driven by a background
    /// interval task so key cardinality stays bounded by active clients.
    pub fn sweep(&self, cfg: &RateLimitConfig) {
        self.sweep_at(cfg, Instant::now());
    }

    pub fn sweep_at(&self, cfg: &RateLimitConfig, now: Instant) {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        windows.retain(|_, window| {
            while window
                .front()
                .is_some_and(|&t| now.saturating_duration_since(t) >= cfg.window)
            {
                window.pop_front();
            }
            !window.is_empty()
        });
    }

    #[must_use]
    pub fn tracked_keys(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
