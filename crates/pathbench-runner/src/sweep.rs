use crate::executor::{ProcessExecutor, TaskExecutor};
use crate::logger::RunLogger;
use crate::pool::{CompletionReport, PoolSummary, WorkerPool};
use anyhow::Result;
use chrono::{DateTime, Utc};
use pathbench_core::{
    discover_instances, discover_scenarios, graph_plan, search_plan, RunSpec, SweepConfig,
};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepKind {
    CreateGraphs,
    RunAlgorithms,
}

impl SweepKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SweepKind::CreateGraphs => "create_graphs",
            SweepKind::RunAlgorithms => "run_algorithms",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub kind: SweepKind,
    pub workers: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub summary: PoolSummary,
}

pub fn plan_graphs(config: &SweepConfig) -> Result<Vec<RunSpec>> {
    let instances = discover_instances(&config.scenario_root)?;
    Ok(graph_plan(&instances, &config.graph_log_root())?)
}

pub fn plan_algorithms(config: &SweepConfig) -> Result<Vec<RunSpec>> {
    let scenarios = discover_scenarios(&config.scenario_root)?;
    Ok(search_plan(
        &scenarios,
        &config.algorithm_configs(),
        &config.search_layout(),
    )?)
}

pub fn create_graphs(config: &SweepConfig) -> Result<SweepReport> {
    let specs = plan_graphs(config)?;
    execute_plan(
        SweepKind::CreateGraphs,
        specs,
        &ProcessExecutor::new(config),
        config.worker_count(),
    )
}

pub fn run_algorithms(config: &SweepConfig) -> Result<SweepReport> {
    let specs = plan_algorithms(config)?;
    execute_plan(
        SweepKind::RunAlgorithms,
        specs,
        &ProcessExecutor::new(config),
        config.worker_count(),
    )
}

pub fn execute_plan<E: TaskExecutor>(
    kind: SweepKind,
    specs: Vec<RunSpec>,
    executor: &E,
    workers: usize,
) -> Result<SweepReport> {
    let logger = RunLogger::prepare(&specs)?;
    let pool = WorkerPool::new(workers)?;
    let started_at = Utc::now();
    info!(
        sweep = kind.as_str(),
        runs = specs.len(),
        workers = pool.bound(),
        "starting sweep"
    );

    let summary = pool.run(specs, executor, &logger, log_progress);

    let finished_at = Utc::now();
    info!(
        sweep = kind.as_str(),
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        seconds = (finished_at - started_at).num_milliseconds() as f64 / 1000.0,
        "sweep finished"
    );
    Ok(SweepReport {
        kind,
        workers: pool.bound(),
        started_at,
        finished_at,
        summary,
    })
}

fn log_progress(report: &CompletionReport, done: usize, total: usize) {
    let elapsed_ms = report.elapsed.as_millis() as u64;
    if let Some(err) = &report.log_error {
        warn!(done, total, run = %report.spec.label(), error = %err, "failed to write run log");
    } else if report.is_success() {
        info!(done, total, run = %report.spec.label(), elapsed_ms, "run completed");
    } else {
        warn!(
            done,
            total,
            run = %report.spec.label(),
            status = %report.status.describe(),
            log = %report.spec.log_path().display(),
            elapsed_ms,
            "run failed"
        );
    }
}
