//! Candidate derivation
//!
//! Maps a task type to a pure function returning a ranked list of adapter
//! names (earlier = preferred). Heuristics see only the task, never adapter
//! runtime state; availability and stats are applied later by the router.
//!
//! # Standard table
//!
//! ```text
//! Task type    | Condition                                  | Candidates
//! -------------|--------------------------------------------|------------------------------------
//! vision       | image_count > 5 or detailed analysis       | glm-4.6v, jina-vlm
//! vision       | otherwise                                  | jina-vlm, glm-4.6v
//! text         | -                                          | gemini, glm-4.6v
//! ar_workflow  | latency critical                           | litert, glm-4.6v, jina-vlm
//! ar_workflow  | otherwise                                  | glm-4.6v, litert
//! edge         | -                                          | litert, jina-vlm
//! multimodal   | complex reasoning                          | gemini, glm-4.6v, jina-vlm
//! multimodal   | otherwise                                  | glm-4.6v, jina-vlm, gemini
//! default      | any unrecognized type                      | gemini, glm-4.6v, jina-vlm, litert
//! ```
//!
//! A task is latency critical when its requirement is under the router's
//! `low_latency_threshold_ms` (50ms by default), the same value that
//! triggers the AR override.

use std::collections::HashMap;
use std::sync::Arc;

use crate::task::{Task, DEFAULT_TASK_TYPE};

/// Vision-language model with detailed image analysis
pub const GLM_46V: &str = "glm-4.6v";
/// Visual embedding and retrieval model
pub const JINA_VLM: &str = "jina-vlm";
/// On-device low-latency runtime
pub const LITERT: &str = "litert";
/// General-purpose language and reasoning model
pub const GEMINI: &str = "gemini";

/// Task type whose low-latency requests get the lowest-latency override.
pub const AR_WORKFLOW: &str = "ar_workflow";

/// Vision tasks with more images than this prefer detailed analysis.
pub const DETAILED_ANALYSIS_IMAGE_COUNT: u32 = 5;

/// Ranked candidate list for a task
pub type Heuristic = Arc<dyn Fn(&Task) -> Vec<String> + Send + Sync>;

/// Task-type to heuristic mapping with a mandatory `default` entry
#[derive(Clone)]
pub struct HeuristicTable {
    rules: HashMap<String, Heuristic>,
    fallback: Heuristic,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl HeuristicTable {
    /// Table with only a fallback heuristic
    pub fn new<F>(fallback: F) -> Self
    where
        F: Fn(&Task) -> Vec<String> + Send + Sync + 'static,
    {
        Self {
            rules: HashMap::new(),
            fallback: Arc::new(fallback),
        }
    }

    /// The built-in multimodal routing table
    pub fn standard() -> Self {
        Self::new(|_| names(&[GEMINI, GLM_46V, JINA_VLM, LITERT]))
            .with_rule("vision", |task| {
                if task.image_count > DETAILED_ANALYSIS_IMAGE_COUNT
                    || task.requires_detailed_analysis
                {
                    names(&[GLM_46V, JINA_VLM])
                } else {
                    names(&[JINA_VLM, GLM_46V])
                }
            })
            .with_rule("text", |_| names(&[GEMINI, GLM_46V]))
            .with_rule(AR_WORKFLOW, |task| {
                if task.latency_critical {
                    names(&[LITERT, GLM_46V, JINA_VLM])
                } else {
                    names(&[GLM_46V, LITERT])
                }
            })
            .with_rule("edge", |_| names(&[LITERT, JINA_VLM]))
            .with_rule("multimodal", |task| {
                if task.complex_reasoning {
                    names(&[GEMINI, GLM_46V, JINA_VLM])
                } else {
                    names(&[GLM_46V, JINA_VLM, GEMINI])
                }
            })
    }

    /// Add or replace the heuristic for `task_type`.
    ///
    /// Registering `"default"` replaces the fallback.
    pub fn with_rule<F>(mut self, task_type: &str, heuristic: F) -> Self
    where
        F: Fn(&Task) -> Vec<String> + Send + Sync + 'static,
    {
        if task_type == DEFAULT_TASK_TYPE {
            self.fallback = Arc::new(heuristic);
        } else {
            self.rules.insert(task_type.to_string(), Arc::new(heuristic));
        }
        self
    }

    /// Whether `task_type` has its own rule
    pub fn handles(&self, task_type: &str) -> bool {
        self.rules.contains_key(task_type)
    }

    /// Ranked candidates for `task`, falling back to the default rule
    pub fn candidates(&self, task: &Task) -> Vec<String> {
        match self.rules.get(&task.task_type) {
            Some(rule) => rule(task),
            None => (self.fallback)(task),
        }
    }
}

impl Default for HeuristicTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for HeuristicTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<&String> = self.rules.keys().collect();
        types.sort();
        f.debug_struct("HeuristicTable")
            .field("task_types", &types)
            .finish_non_exhaustive()
    }
}
