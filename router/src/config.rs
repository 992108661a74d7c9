//! Router configuration
//!
//! Loaded from defaults, a TOML file, and `NGI_ROUTER_*` environment
//! overrides. Runtime changes go through [`ConfigUpdate`], which is
//! validated as a whole before anything is applied.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{RouterError, RouterResult};

/// Smallest accepted `default_latency_threshold_ms`.
pub const MIN_LATENCY_THRESHOLD_MS: f64 = 10.0;

/// Default latency requirement applied to tasks that omit one.
pub const DEFAULT_LATENCY_THRESHOLD_MS: f64 = 100.0;

/// Latency requirement below which AR workflows count as latency-critical.
pub const DEFAULT_LOW_LATENCY_THRESHOLD_MS: f64 = 50.0;

/// Default routing history capacity.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Algorithm used to pick one adapter from the filtered candidate list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingStrategy {
    /// Success-rate and latency scoring
    #[default]
    Adaptive,
    /// Global request counter modulo candidate count
    #[serde(alias = "round_robin")]
    RoundRobin,
    /// Priority-weighted random draw
    Weighted,
}

impl std::fmt::Display for RoutingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Adaptive => write!(f, "adaptive"),
            Self::RoundRobin => write!(f, "round-robin"),
            Self::Weighted => write!(f, "weighted"),
        }
    }
}

impl FromStr for RoutingStrategy {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adaptive" => Ok(Self::Adaptive),
            "round-robin" | "round_robin" | "roundrobin" => Ok(Self::RoundRobin),
            "weighted" => Ok(Self::Weighted),
            other => Err(RouterError::config(
                "routing_strategy",
                format!("unknown strategy '{}'", other),
            )),
        }
    }
}

/// Process-wide router configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// Latency requirement (ms) given to tasks that do not declare one
    pub default_latency_threshold_ms: f64,
    /// AR workflows declaring a requirement below this take the
    /// lowest-latency override under adaptive routing
    pub low_latency_threshold_ms: f64,
    /// Selection strategy
    pub routing_strategy: RoutingStrategy,
    /// Enables the AR lowest-latency override
    pub ar_workflow_optimization: bool,
    /// Record per-adapter stats, decision counts and history
    pub enable_telemetry: bool,
    /// Routing history ring-buffer size (0 disables history)
    pub history_capacity: usize,
    /// Reported verbatim in status and telemetry
    pub frequency_hz: u32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_latency_threshold_ms: DEFAULT_LATENCY_THRESHOLD_MS,
            low_latency_threshold_ms: DEFAULT_LOW_LATENCY_THRESHOLD_MS,
            routing_strategy: RoutingStrategy::default(),
            ar_workflow_optimization: true,
            enable_telemetry: true,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            frequency_hz: 963,
        }
    }
}

impl RouterConfig {
    /// Parse a config from TOML; missing fields take their defaults.
    pub fn from_toml_str(input: &str) -> RouterResult<Self> {
        toml::from_str(input).map_err(|e| RouterError::config("toml", e.to_string()))
    }

    /// Load a config file.
    pub fn from_file(path: impl AsRef<Path>) -> RouterResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RouterError::config("path", format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply `NGI_ROUTER_STRATEGY`, `NGI_ROUTER_LATENCY_THRESHOLD_MS` and
    /// `NGI_ROUTER_TELEMETRY` overrides from the process environment.
    pub fn apply_env(self) -> RouterResult<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(mut self, lookup: F) -> RouterResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(strategy) = lookup("NGI_ROUTER_STRATEGY") {
            self.routing_strategy = strategy.parse()?;
        }
        if let Some(threshold) = lookup("NGI_ROUTER_LATENCY_THRESHOLD_MS") {
            self.default_latency_threshold_ms = threshold.trim().parse().map_err(|_| {
                RouterError::config(
                    "default_latency_threshold_ms",
                    format!("'{}' is not a number", threshold),
                )
            })?;
        }
        if let Some(flag) = lookup("NGI_ROUTER_TELEMETRY") {
            self.enable_telemetry = parse_flag(&flag).ok_or_else(|| {
                RouterError::config("enable_telemetry", format!("'{}' is not a boolean", flag))
            })?;
        }
        Ok(self)
    }

    /// Check static invariants.
    pub fn validate(&self) -> RouterResult<()> {
        let threshold = self.default_latency_threshold_ms;
        if !threshold.is_finite() || threshold < MIN_LATENCY_THRESHOLD_MS {
            return Err(RouterError::config(
                "default_latency_threshold_ms",
                format!(
                    "{} is below the minimum of {}ms",
                    threshold, MIN_LATENCY_THRESHOLD_MS
                ),
            ));
        }
        let low = self.low_latency_threshold_ms;
        if !low.is_finite() || low <= 0.0 {
            return Err(RouterError::config(
                "low_latency_threshold_ms",
                format!("{} must be a positive number of milliseconds", low),
            ));
        }
        Ok(())
    }

    /// Produce the config that results from `update`, validated as a whole.
    pub fn merged(&self, update: &ConfigUpdate) -> RouterResult<Self> {
        let mut next = self.clone();
        if let Some(v) = update.default_latency_threshold_ms {
            next.default_latency_threshold_ms = v;
        }
        if let Some(v) = update.low_latency_threshold_ms {
            next.low_latency_threshold_ms = v;
        }
        if let Some(v) = update.routing_strategy {
            next.routing_strategy = v;
        }
        if let Some(v) = update.ar_workflow_optimization {
            next.ar_workflow_optimization = v;
        }
        if let Some(v) = update.enable_telemetry {
            next.enable_telemetry = v;
        }
        next.validate()?;
        Ok(next)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Partial runtime update. Unknown fields are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ConfigUpdate {
    #[serde(alias = "default_latency_threshold_ms", alias = "defaultLatencyThreshold")]
    pub default_latency_threshold_ms: Option<f64>,
    #[serde(alias = "low_latency_threshold_ms")]
    pub low_latency_threshold_ms: Option<f64>,
    #[serde(alias = "routing_strategy")]
    pub routing_strategy: Option<RoutingStrategy>,
    #[serde(alias = "ar_workflow_optimization")]
    pub ar_workflow_optimization: Option<bool>,
    #[serde(alias = "enable_telemetry")]
    pub enable_telemetry: Option<bool>,
}

impl ConfigUpdate {
    /// Parse an update from JSON.
    pub fn from_json(input: &str) -> RouterResult<Self> {
        serde_json::from_str(input).map_err(|e| RouterError::config("update", e.to_string()))
    }

    pub fn with_strategy(mut self, strategy: RoutingStrategy) -> Self {
        self.routing_strategy = Some(strategy);
        self
    }

    pub fn with_latency_threshold(mut self, ms: f64) -> Self {
        self.default_latency_threshold_ms = Some(ms);
        self
    }

    pub fn with_telemetry(mut self, enabled: bool) -> Self {
        self.enable_telemetry = Some(enabled);
        self
    }
}
