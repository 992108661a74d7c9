//! Routing telemetry
//!
//! Aggregate counters live in [`Telemetry`]; per-adapter stats live on the
//! registry entries. [`TelemetrySnapshot`] is the detached copy handed to
//! callers.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::adapter::AdapterStatus;

/// Recent latency samples kept per adapter.
pub const LATENCY_WINDOW_SIZE: usize = 256;

/// Bounded window of recent latency samples
#[derive(Debug, Clone)]
pub struct LatencyWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl Default for LatencyWindow {
    fn default() -> Self {
        Self::new(LATENCY_WINDOW_SIZE)
    }
}

impl LatencyWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.min(LATENCY_WINDOW_SIZE)),
            capacity,
        }
    }

    pub fn push(&mut self, latency_ms: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(latency_ms);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// p50 / p95 / max over the window, `None` when empty
    pub fn summary(&self) -> Option<LatencySummary> {
        if self.samples.is_empty() {
            return None;
        }
        let mut sorted: Vec<f64> = self.samples.iter().copied().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Some(LatencySummary {
            samples: sorted.len(),
            p50_ms: percentile(&sorted, 50),
            p95_ms: percentile(&sorted, 95),
            max_ms: sorted[sorted.len() - 1],
        })
    }
}

/// Compute the p-th percentile from a sorted, non-empty slice.
fn percentile(sorted: &[f64], p: usize) -> f64 {
    let idx = (p * sorted.len() / 100).min(sorted.len() - 1);
    sorted[idx]
}

/// Latency distribution over the recent window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    pub samples: usize,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub max_ms: f64,
}

/// Process-wide aggregate counters
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Telemetry {
    pub total_requests: u64,
    pub success_count: u64,
    pub error_count: u64,
    /// Successful dispatches per adapter
    pub routing_decisions: BTreeMap<String, u64>,
}

impl Telemetry {
    pub fn record_success(&mut self, adapter: &str, track_decisions: bool) {
        self.total_requests += 1;
        self.success_count += 1;
        if track_decisions {
            *self.routing_decisions.entry(adapter.to_string()).or_insert(0) += 1;
        }
    }

    pub fn record_failure(&mut self) {
        self.total_requests += 1;
        self.error_count += 1;
    }
}

/// Per-adapter view in a telemetry snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterStatsSnapshot {
    pub request_count: u64,
    pub error_count: u64,
    /// EMA latency rounded to two decimals
    pub avg_latency_ms: f64,
    /// `None` until the adapter has served a request
    pub success_rate_percent: Option<f64>,
    pub status: AdapterStatus,
    pub priority: f64,
    pub capabilities: BTreeSet<String>,
    pub latency: Option<LatencySummary>,
}

/// Detached copy of router telemetry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub total_requests: u64,
    pub success_count: u64,
    pub error_count: u64,
    /// `None` until the router has completed a request
    pub success_rate_percent: Option<f64>,
    pub routing_decisions: BTreeMap<String, u64>,
    pub adapter_stats: BTreeMap<String, AdapterStatsSnapshot>,
    pub frequency_hz: u32,
}

/// `part / whole` as a percentage rounded to two decimals, `None` if `whole` is zero
pub(crate) fn percent(part: u64, whole: u64) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(round2(part as f64 / whole as f64 * 100.0))
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_evicts_oldest() {
        let mut window = LatencyWindow::new(3);
        for ms in [1.0, 2.0, 3.0, 4.0] {
            window.push(ms);
        }
        assert_eq!(window.len(), 3);
        let summary = window.summary().unwrap();
        assert_eq!(summary.max_ms, 4.0);
        assert_eq!(summary.p50_ms, 3.0);
    }

    #[test]
    fn test_empty_window_has_no_summary() {
        let window = LatencyWindow::default();
        assert!(window.is_empty());
        assert!(window.summary().is_none());
    }

    #[test]
    fn test_percentiles() {
        let mut window = LatencyWindow::default();
        for ms in 1..=100 {
            window.push(ms as f64);
        }
        let summary = window.summary().unwrap();
        assert_eq!(summary.samples, 100);
        assert_eq!(summary.p50_ms, 51.0);
        assert_eq!(summary.p95_ms, 96.0);
        assert_eq!(summary.max_ms, 100.0);
    }

    #[test]
    fn test_percent_guards_zero() {
        assert_eq!(percent(1, 0), None);
        assert_eq!(percent(2, 3), Some(66.67));
        assert_eq!(percent(3, 3), Some(100.0));
    }

    #[test]
    fn test_counters() {
        let mut telemetry = Telemetry::default();
        telemetry.record_success("litert", true);
        telemetry.record_success("litert", false);
        telemetry.record_failure();
        assert_eq!(telemetry.total_requests, 3);
        assert_eq!(telemetry.success_count, 2);
        assert_eq!(telemetry.error_count, 1);
        assert_eq!(telemetry.routing_decisions.get("litert"), Some(&1));
    }
}
