use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use serde::Serialize;

/// Per-component formatter health statistics.
///
/// Shared across concurrent dispatches and kept across formatter reloads.
#[derive(Debug, Default)]
pub struct FormatterStats {
    call_count: AtomicU64,
    failure_count: AtomicU64,
    fallback_count: AtomicU64,
    total_latency_us: AtomicU64,
}

impl FormatterStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, latency: Duration) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.total_latency_us
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self, latency: Duration) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.failure_count.fetch_add(1, Ordering::Relaxed);
        self.total_latency_us
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);
    }

    /// An exchange was rendered without a custom formatter.
    pub fn record_fallback(&self) {
        self.fallback_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Custom formatter invocations, successful or not.
    pub fn calls(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> u64 {
        self.fallback_count.load(Ordering::Relaxed)
    }

    pub fn avg_latency(&self) -> Duration {
        let calls = self.call_count.load(Ordering::Relaxed);
        if calls == 0 {
            return Duration::ZERO;
        }
        let total = self.total_latency_us.load(Ordering::Relaxed);
        Duration::from_micros(total / calls)
    }

    pub fn snapshot(&self) -> FormatterStatsSnapshot {
        FormatterStatsSnapshot {
            calls: self.calls(),
            failures: self.failures(),
            fallbacks: self.fallbacks(),
            avg_latency_us: self.avg_latency().as_micros() as u64,
        }
    }
}

/// Point-in-time copy of [`FormatterStats`], for status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatterStatsSnapshot {
    pub calls: u64,
    pub failures: u64,
    pub fallbacks: u64,
    pub avg_latency_us: u64,
}
