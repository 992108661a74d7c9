//! Simulated adapters
//!
//! Stand-ins for the four NGI backends. Each sleeps for a random latency in
//! its configured range and can fail at a configured rate. They return
//! canned JSON; nothing leaves the process.

use async_trait::async_trait;
use ngi_router::heuristics::{GEMINI, GLM_46V, JINA_VLM, LITERT};
use ngi_router::{AdapterOptions, ProcessError, Processor, Task};
use rand::Rng;
use serde_json::{json, Value};
use std::time::Duration;

/// A backend that only pretends to do work
#[derive(Debug, Clone)]
pub struct SimulatedAdapter {
    pub name: &'static str,
    pub model: &'static str,
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
    /// Probability (0.0–1.0) that a call fails
    pub failure_rate: f64,
    pub priority: f64,
    pub capabilities: &'static [&'static str],
}

impl SimulatedAdapter {
    /// Vision-language model, detailed image analysis
    pub fn glm_46v() -> Self {
        Self {
            name: GLM_46V,
            model: "glm-4.6v",
            min_latency_ms: 30,
            max_latency_ms: 80,
            failure_rate: 0.0,
            priority: 2.0,
            capabilities: &[
                "image_analysis",
                "visual_question_answering",
                "image_captioning",
                "multimodal_reasoning",
                "object_detection",
                "scene_understanding",
            ],
        }
    }

    /// Visual embeddings and cross-modal retrieval
    pub fn jina_vlm() -> Self {
        Self {
            name: JINA_VLM,
            model: "jina-clip-v1",
            min_latency_ms: 20,
            max_latency_ms: 40,
            failure_rate: 0.0,
            priority: 3.0,
            capabilities: &[
                "visual_embeddings",
                "text_embeddings",
                "image_search",
                "cross_modal_retrieval",
                "semantic_similarity",
                "visual_clustering",
            ],
        }
    }

    /// On-device runtime for real-time and AR inference
    pub fn litert() -> Self {
        Self {
            name: LITERT,
            model: "litert-mobilenet",
            min_latency_ms: 15,
            max_latency_ms: 25,
            failure_rate: 0.0,
            priority: 1.0,
            capabilities: &[
                "real_time_inference",
                "edge_deployment",
                "ar_workflows",
                "object_detection",
                "image_classification",
                "pose_estimation",
                "segmentation",
            ],
        }
    }

    /// General language and reasoning model
    pub fn gemini() -> Self {
        Self {
            name: GEMINI,
            model: "gemini-pro",
            min_latency_ms: 80,
            max_latency_ms: 120,
            failure_rate: 0.0,
            priority: 2.0,
            capabilities: &[
                "text_generation",
                "multimodal_understanding",
                "function_calling",
                "tool_orchestration",
                "complex_reasoning",
                "code_generation",
                "long_context",
            ],
        }
    }

    /// All four backends
    pub fn standard_set() -> Vec<Self> {
        vec![Self::glm_46v(), Self::jina_vlm(), Self::litert(), Self::gemini()]
    }

    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate;
        self
    }

    /// Failure rate usable as a probability; NaN counts as never failing
    fn failure_probability(&self) -> f64 {
        if self.failure_rate.is_nan() {
            0.0
        } else {
            self.failure_rate.clamp(0.0, 1.0)
        }
    }

    /// Registration options matching this backend
    pub fn options(&self) -> AdapterOptions {
        AdapterOptions::default()
            .with_priority(self.priority)
            .with_capabilities(self.capabilities.iter().copied())
    }
}

#[async_trait]
impl Processor for SimulatedAdapter {
    async fn process(&self, task: &Task) -> Result<Value, ProcessError> {
        let (delay_ms, fail) = {
            let mut rng = rand::thread_rng();
            let delay = if self.max_latency_ms > self.min_latency_ms {
                rng.gen_range(self.min_latency_ms..=self.max_latency_ms)
            } else {
                self.min_latency_ms
            };
            (delay, rng.gen_bool(self.failure_probability()))
        };

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        if fail {
            return Err(format!("{} simulated failure on {} task", self.model, task.task_type).into());
        }
        Ok(json!({
            "adapter": self.name,
            "model": self.model,
            "task_type": task.task_type,
            "image_count": task.image_count,
            "processing_ms": delay_ms,
        }))
    }
}
