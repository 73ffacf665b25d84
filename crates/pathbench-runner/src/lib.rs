pub mod executor;
pub mod logger;
pub mod pool;
pub mod sweep;

pub use executor::{ProcessExecutor, RunOutcome, RunStatus, TaskExecutor};
pub use logger::RunLogger;
pub use pool::{CompletionReport, PoolSummary, WorkerPool};
pub use sweep::{
    create_graphs, execute_plan, plan_algorithms, plan_graphs, run_algorithms, SweepKind,
    SweepReport,
};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use pathbench_core::{AlgorithmConfig, DiscoveredFile, OutputLayout, RunSpec, ScenarioInstance};
    use std::fs;
    use std::path::{Path, PathBuf};

    pub fn scratch_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "pathbench_{}_{}_{}",
            label,
            std::process::id(),
            Utc::now().timestamp_micros()
        ));
        fs::create_dir_all(&dir).expect("scratch dir");
        dir
    }

    // Scripts are run through `sh`, so they do not need the executable bit.
    pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}", body)).expect("write script");
        path
    }

    pub fn scenario_spec(root: &Path, relative: &str, algorithm: AlgorithmConfig) -> RunSpec {
        let scenario = ScenarioInstance::new(DiscoveredFile {
            relative: PathBuf::from(relative),
            absolute: root.join("scenarios").join(relative),
        });
        let layout = OutputLayout {
            log_root: root.join("logs").join("run_algorithms"),
            results_root: root.join("experiments"),
        };
        RunSpec::search(scenario, algorithm, &layout)
    }
}
