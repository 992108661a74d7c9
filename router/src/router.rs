//! Task router
//!
//! Accepts a task, derives ranked candidates from the heuristic table,
//! filters them to active registrations, picks one with the configured
//! strategy, dispatches, and records the outcome.
//!
//! # Dispatch path
//!
//! ```text
//! route(task)
//!   ├─ lock: normalize → candidates → active filter → strategy pick
//!   ├─ unlocked: adapter.process(task), timed
//!   └─ lock: counters, EMA latency, history
//! ```
//!
//! The state lock is never held across the adapter call. A `route()` future
//! dropped while the adapter is running records nothing.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::adapter::{AdapterOptions, AdapterRegistry, AdapterStatus, Processor};
use crate::config::{ConfigUpdate, RouterConfig, RoutingStrategy};
use crate::error::{ProcessError, RouterError, RouterResult};
use crate::heuristics::{HeuristicTable, AR_WORKFLOW};
use crate::history::{RoutingHistory, RoutingRecord};
use crate::strategy::{self, Candidate};
use crate::task::{Task, TaskDescriptor};
use crate::telemetry::{percent, round2, AdapterStatsSnapshot, Telemetry, TelemetrySnapshot};

/// How the selected adapter was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    RoundRobin,
    Weighted,
    Adaptive,
    /// Latency-critical AR override of the adaptive strategy
    LowestLatency,
}

impl std::fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RoundRobin => write!(f, "round_robin"),
            Self::Weighted => write!(f, "weighted"),
            Self::Adaptive => write!(f, "adaptive"),
            Self::LowestLatency => write!(f, "lowest_latency"),
        }
    }
}

/// Outcome of a successful `route()` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub id: Uuid,
    pub task_type: String,
    pub selected_adapter: String,
    pub method: SelectionMethod,
    /// Whatever the adapter returned, untouched
    pub result: Value,
    /// Wall-clock time around the adapter call
    pub latency_ms: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Router summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterStatus {
    pub initialized: bool,
    pub frequency_hz: u32,
    pub adapters_registered: usize,
    pub active_adapters: Vec<String>,
    pub routing_strategy: RoutingStrategy,
    pub ar_workflow_optimization: bool,
    pub telemetry_enabled: bool,
}

/// Shared reference to a Router
pub type SharedRouter = Arc<Router>;

struct RouterState {
    config: RouterConfig,
    initialized: bool,
    heuristics: HeuristicTable,
    adapters: AdapterRegistry,
    telemetry: Telemetry,
    history: RoutingHistory,
    rng: Box<dyn RngCore + Send>,
    /// Round-robin cursor; advanced under the lock once per dispatched task
    dispatch_cursor: u64,
}

/// A selected adapter, ready to run outside the lock
struct Dispatch {
    task: Task,
    adapter: String,
    generation: u64,
    method: SelectionMethod,
    handler: Arc<dyn Processor>,
}

/// Adaptive multimodal task router
pub struct Router {
    state: Mutex<RouterState>,
}

impl Router {
    /// Create a router with the standard heuristic table.
    ///
    /// The configuration is validated by [`Router::initialize`], not here.
    pub fn new(config: RouterConfig) -> Self {
        let history = RoutingHistory::new(config.history_capacity);
        Self {
            state: Mutex::new(RouterState {
                config,
                initialized: false,
                heuristics: HeuristicTable::standard(),
                adapters: AdapterRegistry::default(),
                telemetry: Telemetry::default(),
                history,
                rng: Box::new(StdRng::from_entropy()),
                dispatch_cursor: 0,
            }),
        }
    }

    /// Replace the heuristic table
    pub fn with_heuristics(mut self, heuristics: HeuristicTable) -> Self {
        self.state.get_mut().heuristics = heuristics;
        self
    }

    /// Replace the random source used by weighted selection
    pub fn with_rng<R>(mut self, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        self.state.get_mut().rng = Box::new(rng);
        self
    }

    /// Create a shared reference to this router
    pub fn shared(self) -> SharedRouter {
        Arc::new(self)
    }

    /// Validate configuration and enable routing. Calling it again is a no-op.
    pub async fn initialize(&self) -> RouterResult<()> {
        let mut state = self.state.lock().await;
        if state.initialized {
            debug!("Router already initialized");
            return Ok(());
        }
        state.config.validate()?;
        state.initialized = true;

        info!(
            strategy = %state.config.routing_strategy,
            latency_threshold_ms = state.config.default_latency_threshold_ms,
            adapters = state.adapters.len(),
            heuristics = ?state.heuristics,
            "Router initialized"
        );
        Ok(())
    }

    pub async fn is_initialized(&self) -> bool {
        self.state.lock().await.initialized
    }

    /// Register `adapter` under `name` as active with zeroed stats.
    ///
    /// Re-registering a name replaces the previous adapter and discards its
    /// stats; the registration keeps its original position.
    pub async fn register_adapter<P>(
        &self,
        name: &str,
        adapter: P,
        options: AdapterOptions,
    ) -> RouterResult<()>
    where
        P: Processor + 'static,
    {
        self.register_shared(name, Arc::new(adapter), options).await
    }

    /// Register an adapter that is already behind an `Arc`
    pub async fn register_shared(
        &self,
        name: &str,
        adapter: Arc<dyn Processor>,
        options: AdapterOptions,
    ) -> RouterResult<()> {
        let priority = options.priority;
        let mut state = self.state.lock().await;
        let replaced = state.adapters.register(name, adapter, options)?;
        if replaced {
            warn!(adapter = name, "Adapter re-registered, previous stats discarded");
        } else {
            info!(adapter = name, priority, "Registered adapter");
        }
        Ok(())
    }

    /// Mark an adapter active or inactive
    pub async fn set_adapter_status(&self, name: &str, status: AdapterStatus) -> RouterResult<()> {
        let mut state = self.state.lock().await;
        let entry = state
            .adapters
            .get_mut(name)
            .ok_or_else(|| RouterError::UnknownAdapter {
                name: name.to_string(),
            })?;
        entry.status = status;
        info!(adapter = name, %status, "Adapter status changed");
        Ok(())
    }

    /// Registered adapter names in registration order
    pub async fn adapter_names(&self) -> Vec<String> {
        self.state.lock().await.adapters.names()
    }

    /// Route a task to one adapter and return its result.
    ///
    /// Adapter failures are recorded, then returned as
    /// [`RouterError::AdapterDispatch`]. There is no retry and no fallback to
    /// another candidate.
    pub async fn route(&self, task: &TaskDescriptor) -> RouterResult<RoutingDecision> {
        let dispatch = self.select(task).await?;
        let (outcome, latency_ms) = run(&dispatch).await;
        self.record(dispatch, outcome, latency_ms).await
    }

    /// Parse a JSON task descriptor and route it
    pub async fn route_json(&self, input: &str) -> RouterResult<RoutingDecision> {
        let task = TaskDescriptor::from_json(input)?;
        self.route(&task).await
    }

    /// Route with a deadline on the adapter call.
    ///
    /// On expiry the adapter future is dropped and nothing is recorded.
    pub async fn route_with_timeout(
        &self,
        task: &TaskDescriptor,
        timeout: Duration,
    ) -> RouterResult<RoutingDecision> {
        let dispatch = self.select(task).await?;
        match tokio::time::timeout(timeout, run(&dispatch)).await {
            Ok((outcome, latency_ms)) => self.record(dispatch, outcome, latency_ms).await,
            Err(_) => {
                let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(
                    adapter = %dispatch.adapter,
                    task_type = %dispatch.task.task_type,
                    timeout_ms,
                    "Adapter timed out, dispatch abandoned"
                );
                Err(RouterError::Timeout {
                    adapter: dispatch.adapter,
                    timeout_ms,
                })
            }
        }
    }

    async fn select(&self, descriptor: &TaskDescriptor) -> RouterResult<Dispatch> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if !state.initialized {
            return Err(RouterError::NotInitialized);
        }

        let task = descriptor
            .normalize(state.config.default_latency_threshold_ms)?
            .with_low_latency_threshold(state.config.low_latency_threshold_ms);
        let candidates = state.heuristics.candidates(&task);
        let available = state.adapters.filter_available(&candidates);
        if available.is_empty() {
            return Err(RouterError::NoAvailableAdapter {
                task_type: task.task_type,
                candidates,
            });
        }

        let views: Vec<Candidate<'_>> = available
            .iter()
            .filter_map(|name| {
                state.adapters.get(name).map(|entry| Candidate {
                    name,
                    priority: entry.priority,
                    stats: &entry.stats,
                })
            })
            .collect();

        let config = &state.config;
        let (picked, method) = match config.routing_strategy {
            RoutingStrategy::RoundRobin => (
                strategy::round_robin(&views, state.dispatch_cursor),
                SelectionMethod::RoundRobin,
            ),
            RoutingStrategy::Weighted => (
                strategy::weighted(&views, state.rng.as_mut()),
                SelectionMethod::Weighted,
            ),
            RoutingStrategy::Adaptive
                if config.ar_workflow_optimization
                    && task.task_type == AR_WORKFLOW
                    && task.latency_critical =>
            {
                (strategy::lowest_latency(&views), SelectionMethod::LowestLatency)
            }
            RoutingStrategy::Adaptive => (strategy::adaptive(&views), SelectionMethod::Adaptive),
        };

        let adapter = picked
            .and_then(|idx| views.get(idx))
            .map(|c| c.name.to_string())
            .ok_or_else(|| RouterError::NoAvailableAdapter {
                task_type: task.task_type.clone(),
                candidates: candidates.clone(),
            })?;
        let (handler, generation) = state
            .adapters
            .get(&adapter)
            .map(|entry| (Arc::clone(&entry.handler), entry.generation))
            .ok_or_else(|| RouterError::UnknownAdapter {
                name: adapter.clone(),
            })?;
        state.dispatch_cursor += 1;

        debug!(
            task_type = %task.task_type,
            ?candidates,
            ?available,
            %adapter,
            %method,
            "Routing decision"
        );

        Ok(Dispatch {
            task,
            adapter,
            generation,
            method,
            handler,
        })
    }

    async fn record(
        &self,
        dispatch: Dispatch,
        outcome: Result<Value, ProcessError>,
        latency_ms: f64,
    ) -> RouterResult<RoutingDecision> {
        let mut state = self.state.lock().await;
        let telemetry_enabled = state.config.enable_telemetry;
        let success = outcome.is_ok();

        match state.adapters.get_mut(&dispatch.adapter) {
            Some(entry) if entry.generation == dispatch.generation => {
                entry.stats.record_outcome(success);
                if telemetry_enabled {
                    entry.stats.observe_latency(latency_ms);
                    entry.latencies.push(latency_ms);
                }
            }
            _ => debug!(
                adapter = %dispatch.adapter,
                "Adapter re-registered during dispatch, stats not written back"
            ),
        }
        if success {
            state
                .telemetry
                .record_success(&dispatch.adapter, telemetry_enabled);
        } else {
            state.telemetry.record_failure();
        }

        let id = Uuid::new_v4();
        let error = outcome.as_ref().err().map(|e| e.to_string());
        if telemetry_enabled {
            state.history.push(RoutingRecord {
                id,
                timestamp: chrono::Utc::now(),
                task_type: dispatch.task.task_type.clone(),
                adapter: dispatch.adapter.clone(),
                latency_ms,
                success,
                error: error.clone(),
            });
        }
        drop(state);

        match outcome {
            Ok(result) => {
                debug!(
                    adapter = %dispatch.adapter,
                    latency_ms,
                    "Adapter completed"
                );
                Ok(RoutingDecision {
                    id,
                    task_type: dispatch.task.task_type,
                    selected_adapter: dispatch.adapter,
                    method: dispatch.method,
                    result,
                    latency_ms,
                    success: true,
                    error: None,
                })
            }
            Err(source) => {
                warn!(
                    adapter = %dispatch.adapter,
                    task_type = %dispatch.task.task_type,
                    latency_ms,
                    error = %source,
                    "Adapter failed"
                );
                Err(RouterError::AdapterDispatch {
                    adapter: dispatch.adapter,
                    latency_ms,
                    source,
                })
            }
        }
    }

    /// Current configuration
    pub async fn config(&self) -> RouterConfig {
        self.state.lock().await.config.clone()
    }

    /// Apply a partial update. Nothing is applied unless every field is valid.
    pub async fn update_config(&self, update: ConfigUpdate) -> RouterResult<RouterConfig> {
        let mut state = self.state.lock().await;
        let next = state.config.merged(&update)?;
        state.config = next.clone();
        info!(
            strategy = %next.routing_strategy,
            latency_threshold_ms = next.default_latency_threshold_ms,
            telemetry = next.enable_telemetry,
            "Router configuration updated"
        );
        Ok(next)
    }

    /// [`Router::update_config`] from a JSON object
    pub async fn update_config_json(&self, input: &str) -> RouterResult<RouterConfig> {
        let update = ConfigUpdate::from_json(input)?;
        self.update_config(update).await
    }

    /// Detached snapshot of aggregate and per-adapter telemetry
    pub async fn get_telemetry(&self) -> TelemetrySnapshot {
        let state = self.state.lock().await;
        let adapter_stats = state
            .adapters
            .iter()
            .map(|(name, entry)| {
                let stats = &entry.stats;
                let snapshot = AdapterStatsSnapshot {
                    request_count: stats.request_count,
                    error_count: stats.error_count,
                    avg_latency_ms: round2(stats.avg_latency_ms),
                    success_rate_percent: percent(
                        stats.request_count - stats.error_count,
                        stats.request_count,
                    ),
                    status: entry.status,
                    priority: entry.priority,
                    capabilities: entry.capabilities.clone(),
                    latency: entry.latencies.summary(),
                };
                (name.to_string(), snapshot)
            })
            .collect();

        let telemetry = &state.telemetry;
        TelemetrySnapshot {
            total_requests: telemetry.total_requests,
            success_count: telemetry.success_count,
            error_count: telemetry.error_count,
            success_rate_percent: percent(telemetry.success_count, telemetry.total_requests),
            routing_decisions: telemetry.routing_decisions.clone(),
            adapter_stats,
            frequency_hz: state.config.frequency_hz,
        }
    }

    /// Zero all counters and rolling latency; registrations are kept
    pub async fn reset_telemetry(&self) {
        let mut state = self.state.lock().await;
        state.telemetry = Telemetry::default();
        state.dispatch_cursor = 0;
        state.history.clear();
        for entry in state.adapters.iter_mut() {
            entry.reset_stats();
        }
        info!("Telemetry reset");
    }

    /// Oldest-first copy of the routing history
    pub async fn history(&self) -> Vec<RoutingRecord> {
        self.state.lock().await.history.to_vec()
    }

    pub async fn status(&self) -> RouterStatus {
        let state = self.state.lock().await;
        RouterStatus {
            initialized: state.initialized,
            frequency_hz: state.config.frequency_hz,
            adapters_registered: state.adapters.len(),
            active_adapters: state
                .adapters
                .iter()
                .filter(|(_, entry)| entry.is_active())
                .map(|(name, _)| name.to_string())
                .collect(),
            routing_strategy: state.config.routing_strategy,
            ar_workflow_optimization: state.config.ar_workflow_optimization,
            telemetry_enabled: state.config.enable_telemetry,
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

/// Invoke the adapter and time the call
async fn run(dispatch: &Dispatch) -> (Result<Value, ProcessError>, f64) {
    let start = Instant::now();
    let outcome = dispatch.handler.process(&dispatch.task).await;
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    (outcome, latency_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MockProcessor;
    use crate::error::ErrorKind;
    use crate::heuristics::{GEMINI, GLM_46V, JINA_VLM, LITERT};
    use serde_json::json;

    fn ok_adapter(reply: &'static str) -> MockProcessor {
        let mut mock = MockProcessor::new();
        mock.expect_process()
            .returning(move |_| Ok(json!({ "reply": reply })));
        mock
    }

    async fn ready(config: RouterConfig) -> Router {
        let router = Router::new(config);
        router.initialize().await.unwrap();
        router
    }

    #[tokio::test]
    async fn test_route_before_initialize_fails() {
        let router = Router::default();
        router
            .register_adapter(GEMINI, ok_adapter("hi"), AdapterOptions::default())
            .await
            .unwrap();

        let err = router
            .route(&TaskDescriptor::new("text", Value::Null))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotInitialized);
    }

    #[tokio::test]
    async fn test_initialize_rejects_low_threshold() {
        let router = Router::new(RouterConfig {
            default_latency_threshold_ms: 9.0,
            ..Default::default()
        });
        let err = router.initialize().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(!router.is_initialized().await);
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let router = ready(RouterConfig::default()).await;
        router.initialize().await.unwrap();
        assert!(router.status().await.initialized);
    }

    #[tokio::test]
    async fn test_routes_text_to_gemini() {
        let router = ready(RouterConfig::default()).await;
        router
            .register_adapter(GEMINI, ok_adapter("gemini"), AdapterOptions::default())
            .await
            .unwrap();
        router
            .register_adapter(GLM_46V, ok_adapter("glm"), AdapterOptions::default())
            .await
            .unwrap();

        let decision = router
            .route(&TaskDescriptor::new("text", json!("summarize")))
            .await
            .unwrap();
        assert_eq!(decision.selected_adapter, GEMINI);
        assert_eq!(decision.method, SelectionMethod::Adaptive);
        assert_eq!(decision.result, json!({ "reply": "gemini" }));
        assert!(decision.success);
    }

    #[tokio::test]
    async fn test_adapter_receives_normalized_task() {
        let router = ready(RouterConfig::default()).await;
        let mut mock = MockProcessor::new();
        mock.expect_process()
            .withf(|task: &Task| task.latency_requirement_ms == 100.0 && task.task_type == "edge")
            .times(1)
            .returning(|_| Ok(Value::Null));
        router
            .register_adapter(LITERT, mock, AdapterOptions::default())
            .await
            .unwrap();

        router
            .route(&TaskDescriptor::new("edge", json!({"sensor": 3})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failure_is_recorded_then_returned() {
        let router = ready(RouterConfig::default()).await;
        let mut mock = MockProcessor::new();
        mock.expect_process()
            .returning(|_| Err("quota exceeded".into()));
        router
            .register_adapter(JINA_VLM, mock, AdapterOptions::default())
            .await
            .unwrap();

        let err = router
            .route(&TaskDescriptor::new("edge", Value::Null))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AdapterDispatch);
        assert_eq!(err.adapter(), Some(JINA_VLM));
        assert!(err.to_string().contains("quota exceeded"));

        let telemetry = router.get_telemetry().await;
        assert_eq!(telemetry.error_count, 1);
        assert_eq!(telemetry.total_requests, 1);
        assert_eq!(telemetry.adapter_stats[JINA_VLM].error_count, 1);
        assert_eq!(telemetry.adapter_stats[JINA_VLM].success_rate_percent, Some(0.0));

        let history = router.history().await;
        assert_eq!(history.len(), 1);
        assert!(!history[0].success);
        assert_eq!(history[0].error.as_deref(), Some("quota exceeded"));
    }

    #[tokio::test]
    async fn test_inactive_adapter_skipped() {
        let router = ready(RouterConfig::default()).await;
        router
            .register_adapter(LITERT, ok_adapter("litert"), AdapterOptions::default())
            .await
            .unwrap();
        router
            .register_adapter(JINA_VLM, ok_adapter("jina"), AdapterOptions::default())
            .await
            .unwrap();
        router
            .set_adapter_status(LITERT, AdapterStatus::Inactive)
            .await
            .unwrap();

        let decision = router
            .route(&TaskDescriptor::new("edge", Value::Null))
            .await
            .unwrap();
        assert_eq!(decision.selected_adapter, JINA_VLM);
        assert_eq!(router.status().await.active_adapters, vec![JINA_VLM]);
    }

    #[tokio::test]
    async fn test_unknown_adapter_status() {
        let router = Router::default();
        let err = router
            .set_adapter_status("nope", AdapterStatus::Inactive)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownAdapter);
    }

    #[tokio::test]
    async fn test_telemetry_disabled_skips_latency_and_history() {
        let router = ready(RouterConfig {
            enable_telemetry: false,
            ..Default::default()
        })
        .await;
        router
            .register_adapter(GEMINI, ok_adapter("g"), AdapterOptions::default())
            .await
            .unwrap();

        router
            .route(&TaskDescriptor::new("text", Value::Null))
            .await
            .unwrap();
        let telemetry = router.get_telemetry().await;
        assert_eq!(telemetry.total_requests, 1);
        assert_eq!(telemetry.success_count, 1);
        let stats = &telemetry.adapter_stats[GEMINI];
        assert_eq!(stats.request_count, 1);
        assert_eq!(stats.avg_latency_ms, 0.0);
        assert!(stats.latency.is_none());
        assert!(telemetry.routing_decisions.is_empty());
        assert!(router.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_telemetry_disabled_still_counts_adapter_errors() {
        let router = ready(RouterConfig {
            enable_telemetry: false,
            ..Default::default()
        })
        .await;
        let mut mock = MockProcessor::new();
        mock.expect_process()
            .returning(|_| Err("device lost".into()));
        router
            .register_adapter(LITERT, mock, AdapterOptions::default())
            .await
            .unwrap();

        let err = router
            .route(&TaskDescriptor::new("edge", Value::Null))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AdapterDispatch);

        let telemetry = router.get_telemetry().await;
        assert_eq!(telemetry.error_count, 1);
        let stats = &telemetry.adapter_stats[LITERT];
        assert_eq!(stats.request_count, 1);
        assert_eq!(stats.error_count, 1);
        assert_eq!(stats.success_rate_percent, Some(0.0));
        assert!(router.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_config_json() {
        let router = ready(RouterConfig::default()).await;
        let config = router
            .update_config_json(r#"{"routingStrategy": "weighted"}"#)
            .await
            .unwrap();
        assert_eq!(config.routing_strategy, RoutingStrategy::Weighted);
        assert_eq!(router.status().await.routing_strategy, RoutingStrategy::Weighted);

        let err = router
            .update_config_json(r#"{"routingStrategy": "round-robin", "defaultLatencyThresholdMs": 2}"#)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(router.config().await.routing_strategy, RoutingStrategy::Weighted);
    }

    #[tokio::test]
    async fn test_route_json() {
        let router = ready(RouterConfig::default()).await;
        router
            .register_adapter(GLM_46V, ok_adapter("glm"), AdapterOptions::default())
            .await
            .unwrap();
        let decision = router
            .route_json(r#"{"type": "vision", "imageCount": 8}"#)
            .await
            .unwrap();
        assert_eq!(decision.selected_adapter, GLM_46V);
        assert_eq!(decision.task_type, "vision");

        let err = router.route_json(r#"{"type": 42}"#).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTask);
    }

    #[tokio::test]
    async fn test_status_reports_config() {
        let router = Router::default();
        router
            .register_adapter(GEMINI, ok_adapter("g"), AdapterOptions::default())
            .await
            .unwrap();
        let status = router.status().await;
        assert!(!status.initialized);
        assert_eq!(status.frequency_hz, 963);
        assert_eq!(status.adapters_registered, 1);
        assert!(status.telemetry_enabled);
        assert_eq!(router.adapter_names().await, vec![GEMINI]);
    }
}
