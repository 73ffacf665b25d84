use crate::algorithm::AlgorithmConfig;
use crate::plan::OutputLayout;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read sweep config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sweep config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("k_values contains {0} more than once")]
    DuplicateK(u32),

    #[error("workers must be at least 1")]
    ZeroWorkers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    pub scenario_root: PathBuf,
    pub log_root: PathBuf,
    pub experiment_root: PathBuf,
    pub create_graphs_exe: PathBuf,
    pub run_multi_exe: PathBuf,
    pub time_command: Vec<String>,
    pub k_values: Vec<u32>,
    pub workers: Option<usize>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            scenario_root: PathBuf::from("scenarios"),
            log_root: PathBuf::from("logs"),
            experiment_root: PathBuf::from("experiments"),
            create_graphs_exe: PathBuf::from("build/Release/src/create_graphs"),
            run_multi_exe: PathBuf::from("build/Release/src/run_multi"),
            time_command: vec!["/usr/bin/time".to_string(), "--verbose".to_string()],
            k_values: vec![0, 2, 4, 8, 16],
            workers: None,
        }
    }
}

impl SweepConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SweepConfig = if raw.trim().is_empty() {
            SweepConfig::default()
        } else {
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        };
        let base = path.parent().unwrap_or(Path::new("."));
        let config = config.resolve_paths(base);
        config.validate()?;
        Ok(config)
    }

    pub fn resolve_paths(mut self, base: &Path) -> Self {
        self.scenario_root = resolve_dir(base, &self.scenario_root);
        self.log_root = resolve_dir(base, &self.log_root);
        self.experiment_root = resolve_dir(base, &self.experiment_root);
        self.create_graphs_exe = resolve_executable(base, &self.create_graphs_exe);
        self.run_multi_exe = resolve_executable(base, &self.run_multi_exe);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for k in &self.k_values {
            if !seen.insert(*k) {
                return Err(ConfigError::DuplicateK(*k));
            }
        }
        if self.workers == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(())
    }

    pub fn graph_log_root(&self) -> PathBuf {
        self.log_root.join("create_maps")
    }

    pub fn search_layout(&self) -> OutputLayout {
        OutputLayout {
            log_root: self.log_root.join("run_algorithms"),
            results_root: self.experiment_root.clone(),
        }
    }

    pub fn algorithm_configs(&self) -> Vec<AlgorithmConfig> {
        AlgorithmConfig::matrix(&self.k_values)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1)
        })
    }
}

fn resolve_dir(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        normalize_path(&base.join(path))
    }
}

fn resolve_executable(base: &Path, path: &Path) -> PathBuf {
    if path.components().count() > 1 || path.starts_with(".") {
        resolve_dir(base, path)
    } else {
        path.to_path_buf()
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for c in path.components() {
        match c {
            Component::CurDir => {}
            Component::ParentDir => {
                let _ = out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn scratch_file(label: &str, contents: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!(
            "pathbench_cfg_{}_{}_{}",
            label,
            std::process::id(),
            Utc::now().timestamp_micros()
        ));
        fs::create_dir_all(&dir).expect("dir");
        let path = dir.join("sweep.yaml");
        fs::write(&path, contents).expect("write config");
        (dir, path)
    }

    #[test]
    fn empty_file_yields_defaults_resolved_against_its_directory() {
        let (dir, path) = scratch_file("empty", "");
        let config = SweepConfig::load(&path).expect("load");
        assert_eq!(config.scenario_root, dir.join("scenarios"));
        assert_eq!(config.run_multi_exe, dir.join("build/Release/src/run_multi"));
        assert_eq!(config.k_values, vec![0, 2, 4, 8, 16]);
        assert_eq!(config.graph_log_root(), dir.join("logs").join("create_maps"));
        assert_eq!(
            config.search_layout().log_root,
            dir.join("logs").join("run_algorithms")
        );
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn overrides_and_bare_executables_are_respected() {
        let (dir, path) = scratch_file(
            "override",
            "scenario_root: /data/maps\nrun_multi_exe: run_multi\nk_values: [1, 3]\nworkers: 2\ntime_command: []\n",
        );
        let config = SweepConfig::load(&path).expect("load");
        assert_eq!(config.scenario_root, PathBuf::from("/data/maps"));
        assert_eq!(config.run_multi_exe, PathBuf::from("run_multi"));
        assert_eq!(config.worker_count(), 2);
        assert!(config.time_command.is_empty());
        assert_eq!(config.algorithm_configs().len(), 3);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn duplicate_k_values_are_rejected() {
        let (dir, path) = scratch_file("dup_k", "k_values: [0, 2, 2]\n");
        let err = SweepConfig::load(&path).expect_err("duplicate k");
        assert!(matches!(err, ConfigError::DuplicateK(2)), "unexpected: {}", err);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn zero_workers_and_unknown_keys_are_rejected() {
        let (dir, path) = scratch_file("zero", "workers: 0\n");
        assert!(matches!(
            SweepConfig::load(&path),
            Err(ConfigError::ZeroWorkers)
        ));
        fs::write(&path, "wokers: 3\n").expect("rewrite");
        assert!(matches!(
            SweepConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn default_worker_count_is_positive() {
        assert!(SweepConfig::default().worker_count() >= 1);
    }
}
