use pathbench_core::AlgorithmConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("results root {0} does not exist")]
    MissingRoot(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed results file {path}: {reason}")]
    MalformedResults { path: PathBuf, reason: String },

    #[error(
        "no baseline records in bucket {bucket} (needed by {family} k={k}, scenario '{scenario}'); \
         the baseline sweep is missing or incomplete"
    )]
    MissingBaseline {
        bucket: u64,
        family: String,
        k: u32,
        scenario: String,
    },

    #[error("failed to write {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultRow {
    pub start_x: i64,
    pub start_y: i64,
    pub goal_x: i64,
    pub goal_y: i64,
    pub optimal_cost: f64,
    pub solution_cost: f64,
    pub expanded: u64,
    pub generated: u64,
    pub duration: f64,
    pub first_move_duration: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub scenario: String,
    pub algorithm: AlgorithmConfig,
    pub row: ResultRow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRecord {
    pub record: ResultRecord,
    pub bucket: u64,
    pub cost_ratio: f64,
    pub duration_ratio: f64,
    pub first_move_duration_ratio: f64,
    pub expanded_ratio: f64,
}

impl AggregatedRecord {
    pub fn label(&self) -> String {
        self.record.algorithm.label()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregatedRow<'a> {
    pub scenario: &'a str,
    pub algorithm: String,
    pub family: &'static str,
    pub k: u32,
    pub start_x: i64,
    pub start_y: i64,
    pub goal_x: i64,
    pub goal_y: i64,
    pub optimal_cost: f64,
    pub solution_cost: f64,
    pub expanded: u64,
    pub generated: u64,
    pub duration: f64,
    pub first_move_duration: f64,
    pub bucket: u64,
    pub cost_ratio: f64,
    pub duration_ratio: f64,
    pub first_move_duration_ratio: f64,
    pub expanded_ratio: f64,
}

impl<'a> From<&'a AggregatedRecord> for AggregatedRow<'a> {
    fn from(agg: &'a AggregatedRecord) -> Self {
        let row = &agg.record.row;
        Self {
            scenario: &agg.record.scenario,
            algorithm: agg.label(),
            family: agg.record.algorithm.family().as_str(),
            k: agg.record.algorithm.k(),
            start_x: row.start_x,
            start_y: row.start_y,
            goal_x: row.goal_x,
            goal_y: row.goal_y,
            optimal_cost: row.optimal_cost,
            solution_cost: row.solution_cost,
            expanded: row.expanded,
            generated: row.generated,
            duration: row.duration,
            first_move_duration: row.first_move_duration,
            bucket: agg.bucket,
            cost_ratio: agg.cost_ratio,
            duration_ratio: agg.duration_ratio,
            first_move_duration_ratio: agg.first_move_duration_ratio,
            expanded_ratio: agg.expanded_ratio,
        }
    }
}
