//! Bounded routing history
//!
//! Observability only: the router never reads it back to make decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// One completed `route()` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub task_type: String,
    pub adapter: String,
    pub latency_ms: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Ring buffer of the most recent routing records
#[derive(Debug, Clone)]
pub struct RoutingHistory {
    records: VecDeque<RoutingRecord>,
    capacity: usize,
}

impl RoutingHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity,
        }
    }

    /// Append a record, evicting the oldest when full
    pub fn push(&mut self, record: RoutingRecord) {
        if self.capacity == 0 {
            return;
        }
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Oldest-first copy of the retained records
    pub fn to_vec(&self) -> Vec<RoutingRecord> {
        self.records.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(adapter: &str) -> RoutingRecord {
        RoutingRecord {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            task_type: "text".to_string(),
            adapter: adapter.to_string(),
            latency_ms: 1.0,
            success: true,
            error: None,
        }
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = RoutingHistory::new(2);
        history.push(record("a"));
        history.push(record("b"));
        history.push(record("c"));

        let adapters: Vec<String> = history.to_vec().into_iter().map(|r| r.adapter).collect();
        assert_eq!(adapters, vec!["b", "c"]);
    }

    #[test]
    fn test_zero_capacity_disables_history() {
        let mut history = RoutingHistory::new(0);
        history.push(record("a"));
        assert!(history.is_empty());
    }

    #[test]
    fn test_error_field_skipped_when_absent() {
        let json = serde_json::to_value(record("a")).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["success"], true);
    }
}
