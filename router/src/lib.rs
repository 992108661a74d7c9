//! NGI Multimodal Task Router
//!
//! This library provides:
//! - A task router that picks one registered adapter per task
//! - A heuristic table mapping task types to ranked candidate adapters
//! - Round-robin, weighted and adaptive selection strategies
//! - Rolling per-adapter telemetry (request/error counts, EMA latency)
//!
//! # Usage
//!
//! ```rust,ignore
//! use ngi_router::{AdapterOptions, Router, RouterConfig, TaskDescriptor};
//!
//! let router = Router::new(RouterConfig::default());
//! router.initialize().await?;
//! router.register_adapter("litert", my_adapter, AdapterOptions::default()).await?;
//!
//! let task = TaskDescriptor::new("ar_workflow", payload).with_latency_requirement(20.0);
//! let decision = router.route(&task).await?;
//! println!("{} answered in {:.1}ms", decision.selected_adapter, decision.latency_ms);
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod heuristics;
pub mod history;
pub mod router;
pub mod strategy;
pub mod task;
pub mod telemetry;

pub use adapter::{AdapterOptions, AdapterStats, AdapterStatus, Processor};
pub use config::{ConfigUpdate, RouterConfig, RoutingStrategy};
pub use error::{ErrorKind, ProcessError, RouterError, RouterResult};
pub use heuristics::{Heuristic, HeuristicTable};
pub use history::RoutingRecord;
pub use router::{Router, RouterStatus, RoutingDecision, SelectionMethod, SharedRouter};
pub use task::{Task, TaskDescriptor, TaskPriority};
pub use telemetry::{AdapterStatsSnapshot, LatencySummary, TelemetrySnapshot};
