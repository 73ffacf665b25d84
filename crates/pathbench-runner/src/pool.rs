use crate::executor::{RunStatus, TaskExecutor};
use crate::logger::RunLogger;
use anyhow::{anyhow, Result};
use pathbench_core::RunSpec;
use rayon::ThreadPoolBuilder;
use serde::Serialize;
use std::sync::mpsc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CompletionReport {
    pub spec: RunSpec,
    pub status: RunStatus,
    pub elapsed: Duration,
    pub log_error: Option<String>,
}

impl CompletionReport {
    pub fn is_success(&self) -> bool {
        self.status.is_success() && self.log_error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<String>,
}

impl PoolSummary {
    fn record(&mut self, report: &CompletionReport) {
        if report.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
            self.failures.push(report.spec.label());
        }
    }
}

pub struct WorkerPool {
    bound: usize,
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    pub fn new(bound: usize) -> Result<Self> {
        if bound == 0 {
            return Err(anyhow!("worker pool needs at least one thread"));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(bound)
            .thread_name(|i| format!("pathbench-worker-{}", i))
            .build()?;
        Ok(Self { bound, pool })
    }

    pub fn bound(&self) -> usize {
        self.bound
    }

    pub fn run<E, F>(
        &self,
        specs: Vec<RunSpec>,
        executor: &E,
        logger: &RunLogger,
        mut on_complete: F,
    ) -> PoolSummary
    where
        E: TaskExecutor,
        F: FnMut(&CompletionReport, usize, usize),
    {
        let total = specs.len();
        let mut summary = PoolSummary {
            total,
            ..PoolSummary::default()
        };
        let (tx, rx) = mpsc::channel::<CompletionReport>();
        let pool = &self.pool;

        std::thread::scope(|scope| {
            scope.spawn(move || {
                pool.scope(|s| {
                    for spec in specs {
                        let tx = tx.clone();
                        s.spawn(move |_| {
                            let outcome = executor.execute(&spec);
                            let log_error = logger
                                .write(&spec, &outcome)
                                .err()
                                .map(|e| format!("{:#}", e));
                            let _ = tx.send(CompletionReport {
                                spec,
                                status: outcome.status,
                                elapsed: outcome.elapsed,
                                log_error,
                            });
                        });
                    }
                });
            });

            for (idx, report) in rx.iter().enumerate() {
                summary.record(&report);
                on_complete(&report, idx + 1, total);
            }
        });

        summary
    }
}
