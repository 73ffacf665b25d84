pub mod aggregate;
pub mod load;
pub mod record;
pub mod summary;

pub use aggregate::{
    aggregate, bucket_of, cost_ratio, BaselineAccumulator, BaselineSummary, BucketStats,
    BUCKET_WIDTH, MAX_BUCKET,
};
pub use load::{load_results, load_results_file, parse_results_name};
pub use record::{AggregateError, AggregatedRecord, AggregatedRow, ResultRecord, ResultRow};
pub use summary::{summarize_by_bucket, write_aggregated_csv, write_summary_csv, BucketPoint};

use std::path::Path;

pub fn analyze(experiment_root: &Path) -> Result<Vec<AggregatedRecord>, AggregateError> {
    let records = load_results(experiment_root)?;
    tracing::info!(records = records.len(), root = %experiment_root.display(), "loaded results");
    let aggregated = aggregate(records)?;
    tracing::info!(records = aggregated.len(), "aggregated results");
    Ok(aggregated)
}
