use crate::algorithm::AlgorithmConfig;
use crate::discover::{BenchmarkInstance, ScenarioInstance};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("runs '{first}' and '{second}' both write {path}")]
    DuplicateOutput {
        path: PathBuf,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub log_root: PathBuf,
    pub results_root: PathBuf,
}

impl OutputLayout {
    pub fn log_path(&self, token: &str, algorithm: &AlgorithmConfig) -> PathBuf {
        self.log_root
            .join(algorithm.family().as_str())
            .join(format!("{}_{}.txt", token, algorithm.k()))
    }

    pub fn results_path(&self, token: &str, algorithm: &AlgorithmConfig) -> PathBuf {
        self.results_root
            .join(algorithm.family().as_str())
            .join(format!("{}_{}.csv", token, algorithm.k()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunTarget {
    CreateGraph { instance: BenchmarkInstance },
    Search {
        scenario: ScenarioInstance,
        algorithm: AlgorithmConfig,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    target: RunTarget,
    log_path: PathBuf,
    results_path: Option<PathBuf>,
}

impl RunSpec {
    pub fn create_graph(instance: BenchmarkInstance, log_root: &Path) -> Self {
        let log_path = log_root.join(format!("{}.txt", instance.token()));
        Self {
            target: RunTarget::CreateGraph { instance },
            log_path,
            results_path: None,
        }
    }

    pub fn search(
        scenario: ScenarioInstance,
        algorithm: AlgorithmConfig,
        layout: &OutputLayout,
    ) -> Self {
        let token = scenario.token();
        Self {
            log_path: layout.log_path(&token, &algorithm),
            results_path: Some(layout.results_path(&token, &algorithm)),
            target: RunTarget::Search {
                scenario,
                algorithm,
            },
        }
    }

    pub fn target(&self) -> &RunTarget {
        &self.target
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn results_path(&self) -> Option<&Path> {
        self.results_path.as_deref()
    }

    pub fn algorithm(&self) -> Option<AlgorithmConfig> {
        match &self.target {
            RunTarget::CreateGraph { .. } => None,
            RunTarget::Search { algorithm, .. } => Some(*algorithm),
        }
    }

    pub fn label(&self) -> String {
        match &self.target {
            RunTarget::CreateGraph { instance } => instance.token(),
            RunTarget::Search {
                scenario,
                algorithm,
            } => format!("{} {}", scenario.token(), algorithm),
        }
    }
}

pub fn expand_scenario(
    scenario: &ScenarioInstance,
    configs: &[AlgorithmConfig],
    layout: &OutputLayout,
) -> Vec<RunSpec> {
    configs
        .iter()
        .map(|algorithm| RunSpec::search(scenario.clone(), *algorithm, layout))
        .collect()
}

pub fn search_plan(
    scenarios: &[ScenarioInstance],
    configs: &[AlgorithmConfig],
    layout: &OutputLayout,
) -> Result<Vec<RunSpec>, PlanError> {
    let specs = scenarios
        .iter()
        .flat_map(|scenario| expand_scenario(scenario, configs, layout))
        .collect::<Vec<_>>();
    ensure_distinct_outputs(&specs)?;
    Ok(specs)
}

pub fn graph_plan(
    instances: &[BenchmarkInstance],
    log_root: &Path,
) -> Result<Vec<RunSpec>, PlanError> {
    let specs = instances
        .iter()
        .map(|instance| RunSpec::create_graph(instance.clone(), log_root))
        .collect::<Vec<_>>();
    ensure_distinct_outputs(&specs)?;
    Ok(specs)
}

// Flattening `a/b_c` and `a_b/c` yields the same token; such a tree cannot be
// swept without two runs overwriting each other.
fn ensure_distinct_outputs(specs: &[RunSpec]) -> Result<(), PlanError> {
    let mut seen: HashMap<&Path, &RunSpec> = HashMap::new();
    for spec in specs {
        let outputs = std::iter::once(spec.log_path()).chain(spec.results_path());
        for path in outputs {
            if let Some(previous) = seen.insert(path, spec) {
                return Err(PlanError::DuplicateOutput {
                    path: path.to_path_buf(),
                    first: previous.label(),
                    second: spec.label(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover::DiscoveredFile;
    use std::collections::HashSet;

    fn scenario(rel: &str) -> ScenarioInstance {
        ScenarioInstance::new(DiscoveredFile {
            relative: PathBuf::from(rel),
            absolute: PathBuf::from("/bench/scenarios").join(rel),
        })
    }

    fn layout() -> OutputLayout {
        OutputLayout {
            log_root: PathBuf::from("/bench/logs/run_algorithms"),
            results_root: PathBuf::from("/bench/experiments"),
        }
    }

    #[test]
    fn search_paths_follow_family_token_k_layout() {
        let spec = RunSpec::search(
            scenario("dao/arena.map.scen"),
            AlgorithmConfig::PraStar { k: 4 },
            &layout(),
        );
        assert_eq!(
            spec.log_path(),
            Path::new("/bench/logs/run_algorithms/pra/dao_arena_4.txt")
        );
        assert_eq!(
            spec.results_path(),
            Some(Path::new("/bench/experiments/pra/dao_arena_4.csv"))
        );
    }

    #[test]
    fn graph_log_path_is_flat_under_log_root() {
        let instance = BenchmarkInstance::new(DiscoveredFile {
            relative: PathBuf::from("bg512/AR0011SR.map"),
            absolute: PathBuf::from("/bench/scenarios/bg512/AR0011SR.map"),
        });
        let spec = RunSpec::create_graph(instance, Path::new("/bench/logs/create_maps"));
        assert_eq!(
            spec.log_path(),
            Path::new("/bench/logs/create_maps/bg512_AR0011SR.txt")
        );
        assert_eq!(spec.results_path(), None);
    }

    #[test]
    fn plan_covers_every_scenario_times_every_config() {
        let scenarios = vec![
            scenario("dao/arena.map.scen"),
            scenario("dao/den001d.map.scen"),
            scenario("maze/maze512-1-0.map.scen"),
        ];
        let configs = AlgorithmConfig::matrix(&[0, 2, 4, 8, 16]);
        let specs = search_plan(&scenarios, &configs, &layout()).expect("plan");
        assert_eq!(specs.len(), 3 * 6);

        let logs: HashSet<_> = specs.iter().map(|s| s.log_path().to_path_buf()).collect();
        let results: HashSet<_> = specs
            .iter()
            .filter_map(|s| s.results_path().map(Path::to_path_buf))
            .collect();
        assert_eq!(logs.len(), specs.len());
        assert_eq!(results.len(), specs.len());
    }

    #[test]
    fn path_derivation_is_deterministic() {
        let a = RunSpec::search(scenario("dao/arena.map.scen"), AlgorithmConfig::AStar, &layout());
        let b = RunSpec::search(scenario("dao/arena.map.scen"), AlgorithmConfig::AStar, &layout());
        assert_eq!(a, b);
    }

    #[test]
    fn colliding_tokens_are_rejected() {
        let scenarios = vec![scenario("a/b_c.map.scen"), scenario("a_b/c.map.scen")];
        let err = search_plan(&scenarios, &[AlgorithmConfig::AStar], &layout())
            .expect_err("tokens collide");
        let msg = err.to_string();
        assert!(msg.contains("a_b_c_0"), "unexpected: {}", msg);
    }
}
