//! Task descriptors and normalization
//!
//! A [`TaskDescriptor`] is what callers hand to the router. It is borrowed,
//! never mutated; routing works on the owned [`Task`] produced by
//! [`TaskDescriptor::normalize`], which fills in defaults.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::DEFAULT_LOW_LATENCY_THRESHOLD_MS;
use crate::error::{RouterError, RouterResult};

/// Task type used when the descriptor names none.
pub const DEFAULT_TASK_TYPE: &str = "default";

/// Caller-declared urgency. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Normal,
    High,
}

/// Router input as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskDescriptor {
    /// Task category (`vision`, `text`, `ar_workflow`, ...)
    #[serde(rename = "type", alias = "taskType", alias = "task_type")]
    pub task_type: Option<String>,
    /// Opaque payload forwarded to the adapter
    #[serde(alias = "input")]
    pub data: Value,
    /// Upper latency bound the caller wants honored
    #[serde(alias = "latencyRequirement", alias = "latency_requirement_ms")]
    pub latency_requirement_ms: Option<f64>,
    #[serde(alias = "image_count")]
    pub image_count: u32,
    #[serde(alias = "requires_detailed_analysis")]
    pub requires_detailed_analysis: bool,
    #[serde(alias = "complex_reasoning")]
    pub complex_reasoning: bool,
    pub priority: TaskPriority,
    pub params: Map<String, Value>,
    pub metadata: Map<String, Value>,
}

impl TaskDescriptor {
    /// Create a descriptor for `task_type` with a payload
    pub fn new(task_type: impl Into<String>, data: Value) -> Self {
        Self {
            task_type: Some(task_type.into()),
            data,
            ..Default::default()
        }
    }

    /// Parse a descriptor from JSON
    pub fn from_json(input: &str) -> RouterResult<Self> {
        serde_json::from_str(input).map_err(|e| RouterError::invalid_task(e.to_string()))
    }

    pub fn with_latency_requirement(mut self, ms: f64) -> Self {
        self.latency_requirement_ms = Some(ms);
        self
    }

    pub fn with_image_count(mut self, count: u32) -> Self {
        self.image_count = count;
        self
    }

    pub fn with_detailed_analysis(mut self) -> Self {
        self.requires_detailed_analysis = true;
        self
    }

    pub fn with_complex_reasoning(mut self) -> Self {
        self.complex_reasoning = true;
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Build the owned task the router works on.
    ///
    /// `default_latency_ms` fills a missing latency requirement. A declared
    /// requirement must be finite and positive. The task is classified
    /// against the default low-latency threshold; see
    /// [`Task::with_low_latency_threshold`].
    pub fn normalize(&self, default_latency_ms: f64) -> RouterResult<Task> {
        let task_type = match self.task_type.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => DEFAULT_TASK_TYPE.to_string(),
        };

        let latency_requirement_ms = match self.latency_requirement_ms {
            Some(ms) if !ms.is_finite() || ms <= 0.0 => {
                return Err(RouterError::invalid_task(format!(
                    "latency requirement must be a positive number of milliseconds, got {}",
                    ms
                )));
            }
            Some(ms) => ms,
            None => default_latency_ms,
        };

        Ok(Task {
            task_type,
            data: self.data.clone(),
            latency_requirement_ms,
            latency_critical: latency_requirement_ms < DEFAULT_LOW_LATENCY_THRESHOLD_MS,
            image_count: self.image_count,
            requires_detailed_analysis: self.requires_detailed_analysis,
            complex_reasoning: self.complex_reasoning,
            priority: self.priority,
            params: self.params.clone(),
            metadata: self.metadata.clone(),
        })
    }
}

/// Normalized task, as seen by heuristics and adapters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_type: String,
    pub data: Value,
    pub latency_requirement_ms: f64,
    /// Latency requirement is under the router's low-latency threshold
    #[serde(default)]
    pub latency_critical: bool,
    pub image_count: u32,
    pub requires_detailed_analysis: bool,
    pub complex_reasoning: bool,
    pub priority: TaskPriority,
    pub params: Map<String, Value>,
    pub metadata: Map<String, Value>,
}

impl Task {
    /// Reclassify against a configured low-latency threshold
    pub fn with_low_latency_threshold(mut self, threshold_ms: f64) -> Self {
        self.latency_critical = self.latency_requirement_ms < threshold_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_normalize_applies_defaults() {
        let descriptor = TaskDescriptor::default();
        let task = descriptor.normalize(100.0).unwrap();
        assert_eq!(task.task_type, "default");
        assert_eq!(task.latency_requirement_ms, 100.0);
        assert_eq!(task.image_count, 0);
        assert_eq!(task.priority, TaskPriority::Normal);
    }

    #[test]
    fn test_normalize_keeps_declared_values() {
        let descriptor = TaskDescriptor::new("ar_workflow", json!({"frame": 1}))
            .with_latency_requirement(20.0)
            .with_image_count(2);
        let task = descriptor.normalize(100.0).unwrap();
        assert_eq!(task.task_type, "ar_workflow");
        assert_eq!(task.latency_requirement_ms, 20.0);
        assert_eq!(task.data, json!({"frame": 1}));
        // caller's descriptor untouched
        assert_eq!(descriptor.latency_requirement_ms, Some(20.0));
    }

    #[test]
    fn test_latency_critical_follows_threshold() {
        let task = TaskDescriptor::new("ar_workflow", Value::Null)
            .with_latency_requirement(40.0)
            .normalize(100.0)
            .unwrap();
        assert!(task.latency_critical);
        assert!(!task.clone().with_low_latency_threshold(30.0).latency_critical);
        assert!(task.with_low_latency_threshold(45.0).latency_critical);
    }

    #[test]
    fn test_blank_type_falls_back() {
        let descriptor = TaskDescriptor::new("  ", Value::Null);
        assert_eq!(descriptor.normalize(100.0).unwrap().task_type, "default");
    }

    #[test]
    fn test_bad_latency_rejected() {
        for bad in [0.0, -5.0, f64::INFINITY] {
            let err = TaskDescriptor::new("text", Value::Null)
                .with_latency_requirement(bad)
                .normalize(100.0)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidTask);
        }
    }

    #[test]
    fn test_json_aliases() {
        let descriptor = TaskDescriptor::from_json(
            r#"{"taskType": "vision", "input": {"images": ["a.jpg"]},
                "latencyRequirement": 30, "imageCount": 7,
                "requiresDetailedAnalysis": true, "priority": "high"}"#,
        )
        .unwrap();
        assert_eq!(descriptor.task_type.as_deref(), Some("vision"));
        assert_eq!(descriptor.data, json!({"images": ["a.jpg"]}));
        assert_eq!(descriptor.latency_requirement_ms, Some(30.0));
        assert_eq!(descriptor.image_count, 7);
        assert!(descriptor.requires_detailed_analysis);
        assert_eq!(descriptor.priority, TaskPriority::High);
    }

    #[test]
    fn test_invalid_json() {
        let err = TaskDescriptor::from_json("{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTask);
    }
}
