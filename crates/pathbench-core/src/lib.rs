pub mod algorithm;
pub mod config;
pub mod discover;
pub mod plan;

pub use algorithm::{AlgorithmConfig, AlgorithmFamily};
pub use config::{ConfigError, SweepConfig};
pub use discover::{
    discover_instances, discover_scenarios, file_token, BenchmarkInstance, DiscoveredFile,
    DiscoveryError, InputEnumerator, ScenarioInstance, MAP_SUFFIX, SCENARIO_SUFFIX,
};
pub use plan::{expand_scenario, graph_plan, search_plan, OutputLayout, PlanError, RunSpec, RunTarget};

use std::path::Path;

pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)
}
