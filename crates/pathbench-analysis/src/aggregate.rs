use crate::record::{AggregateError, AggregatedRecord, ResultRecord};
use std::collections::BTreeMap;

pub const BUCKET_WIDTH: f64 = 4.0;
pub const MAX_BUCKET: u64 = 128;

pub fn bucket_of(optimal_cost: f64) -> u64 {
    (optimal_cost / BUCKET_WIDTH).floor() as u64
}

pub fn cost_ratio(solution_cost: f64, optimal_cost: f64) -> f64 {
    if optimal_cost > 0.0 {
        solution_cost / optimal_cost
    } else {
        1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketStats {
    pub count: usize,
    pub mean_duration: f64,
    pub mean_first_move_duration: f64,
    pub mean_expanded: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct Sums {
    count: usize,
    duration: f64,
    first_move_duration: f64,
    expanded: f64,
}

#[derive(Debug, Default)]
pub struct BaselineAccumulator {
    buckets: BTreeMap<u64, Sums>,
}

impl BaselineAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, record: &ResultRecord) {
        if !record.algorithm.is_baseline() {
            return;
        }
        let bucket = bucket_of(record.row.optimal_cost);
        if bucket >= MAX_BUCKET {
            return;
        }
        let sums = self.buckets.entry(bucket).or_default();
        sums.count += 1;
        sums.duration += record.row.duration;
        sums.first_move_duration += record.row.first_move_duration;
        sums.expanded += record.row.expanded as f64;
    }

    pub fn finish(self) -> BaselineSummary {
        let buckets = self
            .buckets
            .into_iter()
            .map(|(bucket, sums)| {
                let n = sums.count as f64;
                (
                    bucket,
                    BucketStats {
                        count: sums.count,
                        mean_duration: sums.duration / n,
                        mean_first_move_duration: sums.first_move_duration / n,
                        mean_expanded: sums.expanded / n,
                    },
                )
            })
            .collect();
        BaselineSummary { buckets }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaselineSummary {
    buckets: BTreeMap<u64, BucketStats>,
}

impl BaselineSummary {
    pub fn get(&self, bucket: u64) -> Option<&BucketStats> {
        self.buckets.get(&bucket)
    }

    pub fn buckets(&self) -> impl Iterator<Item = (u64, &BucketStats)> {
        self.buckets.iter().map(|(b, s)| (*b, s))
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Second pass for a single record. `Ok(None)` means the record falls in an
    /// excluded bucket.
    pub fn derive(&self, record: ResultRecord) -> Result<Option<AggregatedRecord>, AggregateError> {
        let bucket = bucket_of(record.row.optimal_cost);
        if bucket >= MAX_BUCKET {
            return Ok(None);
        }
        let cost_ratio = cost_ratio(record.row.solution_cost, record.row.optimal_cost);
        if record.algorithm.is_baseline() {
            return Ok(Some(AggregatedRecord {
                record,
                bucket,
                cost_ratio,
                duration_ratio: 1.0,
                first_move_duration_ratio: 1.0,
                expanded_ratio: 1.0,
            }));
        }
        let stats = self
            .get(bucket)
            .ok_or_else(|| AggregateError::MissingBaseline {
                bucket,
                family: record.algorithm.family().as_str().to_string(),
                k: record.algorithm.k(),
                scenario: record.scenario.clone(),
            })?;
        Ok(Some(AggregatedRecord {
            duration_ratio: stats.mean_duration / record.row.duration,
            first_move_duration_ratio: stats.mean_first_move_duration
                / record.row.first_move_duration,
            expanded_ratio: stats.mean_expanded / record.row.expanded as f64,
            record,
            bucket,
            cost_ratio,
        }))
    }
}

pub fn aggregate(records: Vec<ResultRecord>) -> Result<Vec<AggregatedRecord>, AggregateError> {
    let mut accumulator = BaselineAccumulator::new();
    for record in &records {
        accumulator.observe(record);
    }
    let summary = accumulator.finish();

    let mut out = Vec::with_capacity(records.len());
    for record in records {
        if let Some(agg) = summary.derive(record)? {
            out.push(agg);
        }
    }
    Ok(out)
}
