use crate::record::{AggregateError, AggregatedRecord, AggregatedRow};
use pathbench_core::AlgorithmConfig;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketPoint {
    pub algorithm: String,
    pub family: &'static str,
    pub k: u32,
    pub bucket: u64,
    pub samples: usize,
    pub cost_ratio: f64,
    pub duration: f64,
    pub first_move_duration: f64,
    pub duration_ratio: f64,
    pub first_move_duration_ratio: f64,
    pub expanded_ratio: f64,
}

#[derive(Default)]
struct PointSums {
    samples: usize,
    cost_ratio: f64,
    duration: f64,
    first_move_duration: f64,
    duration_ratio: f64,
    first_move_duration_ratio: f64,
    expanded_ratio: f64,
}

pub fn summarize_by_bucket(records: &[AggregatedRecord]) -> Vec<BucketPoint> {
    let mut groups: BTreeMap<(AlgorithmConfig, u64), PointSums> = BTreeMap::new();
    for agg in records {
        let sums = groups.entry((agg.record.algorithm, agg.bucket)).or_default();
        sums.samples += 1;
        sums.cost_ratio += agg.cost_ratio;
        sums.duration += agg.record.row.duration;
        sums.first_move_duration += agg.record.row.first_move_duration;
        sums.duration_ratio += agg.duration_ratio;
        sums.first_move_duration_ratio += agg.first_move_duration_ratio;
        sums.expanded_ratio += agg.expanded_ratio;
    }
    groups
        .into_iter()
        .map(|((algorithm, bucket), s)| {
            let n = s.samples as f64;
            BucketPoint {
                algorithm: algorithm.label(),
                family: algorithm.family().as_str(),
                k: algorithm.k(),
                bucket,
                samples: s.samples,
                cost_ratio: s.cost_ratio / n,
                duration: s.duration / n,
                first_move_duration: s.first_move_duration / n,
                duration_ratio: s.duration_ratio / n,
                first_move_duration_ratio: s.first_move_duration_ratio / n,
                expanded_ratio: s.expanded_ratio / n,
            }
        })
        .collect()
}

pub fn write_aggregated_csv(path: &Path, records: &[AggregatedRecord]) -> Result<(), AggregateError> {
    write_rows(path, records.iter().map(AggregatedRow::from))
}

pub fn write_summary_csv(path: &Path, points: &[BucketPoint]) -> Result<(), AggregateError> {
    write_rows(path, points.iter())
}

fn write_rows<T: Serialize>(
    path: &Path,
    rows: impl Iterator<Item = T>,
) -> Result<(), AggregateError> {
    let export_err = |source| AggregateError::Export {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| AggregateError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let mut writer = csv::Writer::from_path(path).map_err(export_err)?;
    for row in rows {
        writer.serialize(row).map_err(export_err)?;
    }
    writer.flush().map_err(|e| export_err(e.into()))?;
    Ok(())
}
