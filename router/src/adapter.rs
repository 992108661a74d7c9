//! Adapter contract and registry
//!
//! Adapters are the backends that actually process tasks. The router only
//! knows them through [`Processor`]; everything else here is metadata and
//! rolling health the router keeps per registration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::error::{ProcessError, RouterError, RouterResult};
use crate::task::Task;
use crate::telemetry::LatencyWindow;

/// Weight of the previous average in the latency EMA.
pub const EMA_HISTORY_WEIGHT: f64 = 0.8;

/// Weight of the newest sample in the latency EMA.
pub const EMA_SAMPLE_WEIGHT: f64 = 0.2;

/// Processing backend registered with the router.
///
/// A returned error is the only failure signal; the router never inspects
/// the returned value.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Processor: Send + Sync {
    /// Process a normalized task
    async fn process(&self, task: &Task) -> Result<Value, ProcessError>;
}

/// Whether an adapter may be selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterStatus {
    #[default]
    Active,
    Inactive,
}

impl std::fmt::Display for AdapterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

/// Registration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterOptions {
    /// Relative weight for weighted selection
    pub priority: f64,
    /// Informational capability tags
    pub capabilities: BTreeSet<String>,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            priority: 1.0,
            capabilities: BTreeSet::new(),
        }
    }
}

impl AdapterOptions {
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }
}

/// Rolling dispatch statistics for one adapter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdapterStats {
    /// Successful plus failed dispatches
    pub request_count: u64,
    pub error_count: u64,
    /// Exponential moving average of observed latency
    pub avg_latency_ms: f64,
    /// Latency samples folded into the average
    pub latency_observations: u64,
}

impl AdapterStats {
    /// Record one dispatch outcome.
    ///
    /// The first latency seeds the average; later ones blend 80% old, 20% new.
    pub fn record(&mut self, latency_ms: f64, success: bool) {
        self.record_outcome(success);
        self.observe_latency(latency_ms);
    }

    /// Count one dispatch without touching the latency average
    pub fn record_outcome(&mut self, success: bool) {
        self.request_count += 1;
        if !success {
            self.error_count += 1;
        }
    }

    /// Fold one latency sample into the moving average
    pub fn observe_latency(&mut self, latency_ms: f64) {
        if self.latency_observations == 0 {
            self.avg_latency_ms = latency_ms;
        } else {
            self.avg_latency_ms =
                self.avg_latency_ms * EMA_HISTORY_WEIGHT + latency_ms * EMA_SAMPLE_WEIGHT;
        }
        self.latency_observations += 1;
    }

    /// Fraction of dispatches that succeeded, `None` before the first one
    pub fn success_rate(&self) -> Option<f64> {
        if self.request_count == 0 {
            None
        } else {
            Some((self.request_count - self.error_count) as f64 / self.request_count as f64)
        }
    }
}

/// One registered adapter
pub(crate) struct AdapterEntry {
    pub handler: Arc<dyn Processor>,
    pub priority: f64,
    pub capabilities: BTreeSet<String>,
    pub status: AdapterStatus,
    pub stats: AdapterStats,
    pub latencies: LatencyWindow,
    /// Bumped on every (re-)registration; in-flight results for an older
    /// generation are not written back.
    pub generation: u64,
}

impl AdapterEntry {
    fn new(handler: Arc<dyn Processor>, options: AdapterOptions, generation: u64) -> Self {
        Self {
            generation,
            handler,
            priority: options.priority,
            capabilities: options.capabilities,
            status: AdapterStatus::Active,
            stats: AdapterStats::default(),
            latencies: LatencyWindow::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AdapterStatus::Active
    }

    pub fn reset_stats(&mut self) {
        self.stats = AdapterStats::default();
        self.latencies.clear();
    }
}

/// Adapter registrations keyed by name, iterated in registration order
#[derive(Default)]
pub(crate) struct AdapterRegistry {
    entries: HashMap<String, AdapterEntry>,
    order: Vec<String>,
    generations: u64,
}

impl AdapterRegistry {
    /// Insert or replace a registration. Returns `true` if an earlier
    /// registration (and its stats) was overwritten.
    pub fn register(
        &mut self,
        name: &str,
        handler: Arc<dyn Processor>,
        options: AdapterOptions,
    ) -> RouterResult<bool> {
        if name.trim().is_empty() {
            return Err(RouterError::invalid_adapter(name, "name must not be empty"));
        }
        if !options.priority.is_finite() || options.priority < 0.0 {
            return Err(RouterError::invalid_adapter(
                name,
                format!("priority must be a finite non-negative number, got {}", options.priority),
            ));
        }

        self.generations += 1;
        let entry = AdapterEntry::new(handler, options, self.generations);
        let replaced = self
            .entries
            .insert(name.to_string(), entry)
            .is_some();
        if !replaced {
            self.order.push(name.to_string());
        }
        Ok(replaced)
    }

    pub fn get(&self, name: &str) -> Option<&AdapterEntry> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AdapterEntry> {
        self.entries.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Registrations in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AdapterEntry)> {
        self.order
            .iter()
            .filter_map(|name| self.entries.get(name).map(|e| (name.as_str(), e)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AdapterEntry> {
        self.entries.values_mut()
    }

    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Keep only candidates that are registered and active, preserving order
    pub fn filter_available(&self, candidates: &[String]) -> Vec<String> {
        candidates
            .iter()
            .filter(|name| self.get(name).is_some_and(AdapterEntry::is_active))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn noop() -> Arc<dyn Processor> {
        let mut mock = MockProcessor::new();
        mock.expect_process().returning(|_| Ok(Value::Null));
        Arc::new(mock)
    }

    #[test]
    fn test_ema_sequence() {
        let mut stats = AdapterStats::default();
        stats.record(10.0, true);
        assert_eq!(stats.avg_latency_ms, 10.0);
        stats.record(20.0, true);
        assert!((stats.avg_latency_ms - 12.0).abs() < 1e-9);
        stats.record(30.0, true);
        assert!((stats.avg_latency_ms - (0.8 * 12.0 + 0.2 * 30.0)).abs() < 1e-9);
        assert_eq!(stats.request_count, 3);
        assert_eq!(stats.error_count, 0);
    }

    #[test]
    fn test_failure_counts() {
        let mut stats = AdapterStats::default();
        assert_eq!(stats.success_rate(), None);
        stats.record(5.0, true);
        stats.record(5.0, false);
        assert_eq!(stats.request_count, 2);
        assert_eq!(stats.error_count, 1);
        assert_eq!(stats.success_rate(), Some(0.5));
    }

    #[test]
    fn test_outcome_without_latency() {
        let mut stats = AdapterStats::default();
        stats.record_outcome(false);
        assert_eq!(stats.request_count, 1);
        assert_eq!(stats.error_count, 1);
        assert_eq!(stats.latency_observations, 0);
        assert_eq!(stats.avg_latency_ms, 0.0);
    }

    #[test]
    fn test_register_rejects_empty_name() {
        let mut registry = AdapterRegistry::default();
        let err = registry
            .register("", noop(), AdapterOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAdapter);
    }

    #[test]
    fn test_register_rejects_bad_priority() {
        let mut registry = AdapterRegistry::default();
        for bad in [-1.0, f64::NAN] {
            let err = registry
                .register("gemini", noop(), AdapterOptions::default().with_priority(bad))
                .unwrap_err();
            assert_eq!(err.adapter(), Some("gemini"));
        }
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_reregister_overwrites_and_keeps_order() {
        let mut registry = AdapterRegistry::default();
        registry.register("a", noop(), AdapterOptions::default()).unwrap();
        registry.register("b", noop(), AdapterOptions::default()).unwrap();
        registry.get_mut("a").unwrap().stats.record(10.0, true);

        let replaced = registry
            .register("a", noop(), AdapterOptions::default().with_priority(4.0))
            .unwrap();
        assert!(replaced);
        assert_eq!(registry.names(), vec!["a", "b"]);
        let entry = registry.get("a").unwrap();
        assert_eq!(entry.priority, 4.0);
        assert_eq!(entry.stats.request_count, 0);
    }

    #[test]
    fn test_reregister_bumps_generation() {
        let mut registry = AdapterRegistry::default();
        registry.register("a", noop(), AdapterOptions::default()).unwrap();
        registry.register("b", noop(), AdapterOptions::default()).unwrap();
        let before = registry.get("a").unwrap().generation;

        registry.register("a", noop(), AdapterOptions::default()).unwrap();
        let after = registry.get("a").unwrap().generation;
        assert_ne!(before, after);
        assert_ne!(after, registry.get("b").unwrap().generation);
    }

    #[test]
    fn test_filter_available() {
        let mut registry = AdapterRegistry::default();
        registry.register("a", noop(), AdapterOptions::default()).unwrap();
        registry.register("b", noop(), AdapterOptions::default()).unwrap();
        registry.get_mut("b").unwrap().status = AdapterStatus::Inactive;

        let candidates = vec!["c".to_string(), "b".to_string(), "a".to_string()];
        assert_eq!(registry.filter_available(&candidates), vec!["a"]);
    }
}
