mod simulated;

use anyhow::{Context, Result};
use clap::Parser;
use ngi_router::{Router, RouterConfig, RoutingStrategy, TaskDescriptor};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use simulated::SimulatedAdapter;

/// Route a batch of tasks through the NGI router using simulated adapters.
#[derive(Debug, Parser)]
#[command(name = "ngi", version, about)]
struct Args {
    /// Router config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the routing strategy (adaptive, round-robin, weighted)
    #[arg(long)]
    strategy: Option<RoutingStrategy>,

    /// JSONL file with one task descriptor per line
    #[arg(long)]
    tasks: Option<PathBuf>,

    /// Number of generated tasks when --tasks is not given
    #[arg(long, default_value_t = 24)]
    count: usize,

    /// Per-dispatch deadline in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Failure probability applied to every simulated adapter
    #[arg(long, default_value_t = 0.0, value_parser = parse_failure_rate)]
    failure_rate: f64,
}

fn parse_failure_rate(raw: &str) -> Result<f64, String> {
    let rate: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(format!("failure rate must be between 0 and 1, got {raw}"));
    }
    Ok(rate)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RouterConfig::from_file(path)
            .with_context(|| format!("Failed to load router config {}", path.display()))?,
        None => RouterConfig::default(),
    }
    .apply_env()
    .context("Invalid NGI_ROUTER_* environment override")?;
    if let Some(strategy) = args.strategy {
        config.routing_strategy = strategy;
    }

    let router = Router::new(config);
    router.initialize().await.context("Router initialization failed")?;
    for adapter in SimulatedAdapter::standard_set() {
        let adapter = adapter.with_failure_rate(args.failure_rate);
        let options = adapter.options();
        router.register_adapter(adapter.name, adapter, options).await?;
    }

    let tasks = match &args.tasks {
        Some(path) => load_tasks(path)?,
        None => generate_tasks(args.count),
    };
    info!(count = tasks.len(), "Routing tasks");

    for task in &tasks {
        let outcome = match args.timeout_ms {
            Some(ms) => router.route_with_timeout(task, Duration::from_millis(ms)).await,
            None => router.route(task).await,
        };
        match outcome {
            Ok(decision) => info!(
                task_type = %decision.task_type,
                adapter = %decision.selected_adapter,
                method = %decision.method,
                latency_ms = format_args!("{:.1}", decision.latency_ms),
                "Task routed"
            ),
            Err(e) => warn!(code = %e.kind(), adapter = ?e.adapter(), "Task failed: {e}"),
        }
    }

    let telemetry = router.get_telemetry().await;
    println!("{}", serde_json::to_string_pretty(&telemetry)?);
    Ok(())
}

fn load_tasks(path: &PathBuf) -> Result<Vec<TaskDescriptor>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tasks from {}", path.display()))?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            TaskDescriptor::from_json(line)
                .with_context(|| format!("{}:{}: invalid task", path.display(), idx + 1))
        })
        .collect()
}

/// A mixed batch touching every heuristic branch.
fn generate_tasks(count: usize) -> Vec<TaskDescriptor> {
    (0..count)
        .map(|i| match i % 6 {
            0 => TaskDescriptor::new("vision", json!({ "images": i % 9 }))
                .with_image_count((i % 9) as u32),
            1 => TaskDescriptor::new("text", json!({ "prompt": "summarize the lineage" })),
            2 => TaskDescriptor::new("ar_workflow", json!({ "frame": i }))
                .with_latency_requirement(if i % 4 == 0 { 20.0 } else { 80.0 }),
            3 => TaskDescriptor::new("edge", json!({ "sensor": i })),
            4 => {
                let task = TaskDescriptor::new("multimodal", json!({ "query": i }));
                if i % 2 == 0 {
                    task.with_complex_reasoning()
                } else {
                    task
                }
            }
            _ => TaskDescriptor::new("default", json!({ "payload": i })),
        })
        .collect()
}
