use crate::record::{AggregateError, ResultRecord, ResultRow};
use csv::ReaderBuilder;
use pathbench_core::{AlgorithmConfig, AlgorithmFamily};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const RESULT_COLUMNS: [&str; 10] = [
    "start_x",
    "start_y",
    "goal_x",
    "goal_y",
    "optimal_cost",
    "solution_cost",
    "expanded",
    "generated",
    "duration",
    "first_move_duration",
];

pub fn parse_results_name(file_name: &str) -> Option<(String, u32)> {
    let stem = file_name.strip_suffix(".csv")?;
    let (scenario, k) = stem.rsplit_once('_')?;
    if scenario.is_empty() {
        return None;
    }
    Some((scenario.to_string(), k.parse().ok()?))
}

pub fn load_results(root: &Path) -> Result<Vec<ResultRecord>, AggregateError> {
    if !root.is_dir() {
        return Err(AggregateError::MissingRoot(root.to_path_buf()));
    }
    let mut records = Vec::new();
    for family in AlgorithmFamily::ALL {
        let dir = root.join(family.as_str());
        if !dir.is_dir() {
            warn!(family = family.as_str(), dir = %dir.display(), "no results directory");
            continue;
        }
        for path in results_files(&dir)? {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            let (scenario, k) =
                parse_results_name(name).ok_or_else(|| AggregateError::MalformedResults {
                    path: path.clone(),
                    reason: "file name must look like <scenario>_<k>.csv".to_string(),
                })?;
            let algorithm = AlgorithmConfig::from_parts(family, k);
            let loaded = load_results_file(&path, &scenario, algorithm)?;
            debug!(file = %path.display(), rows = loaded.len(), "loaded results");
            records.extend(loaded);
        }
    }
    Ok(records)
}

pub fn load_results_file(
    path: &Path,
    scenario: &str,
    algorithm: AlgorithmConfig,
) -> Result<Vec<ResultRecord>, AggregateError> {
    let malformed = |reason: String| AggregateError::MalformedResults {
        path: path.to_path_buf(),
        reason,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| malformed(e.to_string()))?;
    let headers = reader.headers().map_err(|e| malformed(e.to_string()))?;
    if headers.iter().all(|h| h.is_empty()) {
        return Err(malformed("missing header row".to_string()));
    }
    let missing: Vec<&str> = RESULT_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(malformed(format!("missing columns: {}", missing.join(", "))));
    }
    let mut records = Vec::new();
    for row in reader.deserialize::<ResultRow>() {
        let row = row.map_err(|e| malformed(e.to_string()))?;
        if !row.optimal_cost.is_finite() || row.optimal_cost < 0.0 {
            return Err(malformed(format!(
                "optimal_cost {} is not a finite non-negative number",
                row.optimal_cost
            )));
        }
        records.push(ResultRecord {
            scenario: scenario.to_string(),
            algorithm,
            row,
        });
    }
    Ok(records)
}

fn results_files(dir: &Path) -> Result<Vec<PathBuf>, AggregateError> {
    let io_err = |source| AggregateError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
