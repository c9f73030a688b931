use serde::{Deserialize, Serialize};

use crate::errors::{DengueError, DengueResult};
use crate::models::aggregate::{AggregatedSeries, TimeBucket};

/// Headline numbers displayed next to the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Sum of every bucket value.
    pub total: f64,
    /// `total` divided by the number of buckets.
    pub mean_per_bucket: f64,
    /// Bucket holding the greatest value; ties keep the earliest bucket.
    pub max_bucket: TimeBucket,
}

/// Compute total, per-bucket mean and the peak bucket of a series.
///
/// Pure; fails with [`DengueError::DivisionUndefined`] on an empty series.
/// Callers that honored the aggregator's `EmptyResult` never hit that case.
pub fn summarize(series: &AggregatedSeries) -> DengueResult<SeriesSummary> {
    let Some(first) = series.buckets.first() else {
        return Err(DengueError::DivisionUndefined);
    };

    let total: f64 = series.values().sum();

    let mut max_bucket = *first;
    for bucket in &series.buckets[1..] {
        // strictly greater, so the first occurrence wins ties
        if bucket.value > max_bucket.value {
            max_bucket = *bucket;
        }
    }

    Ok(SeriesSummary {
        total,
        mean_per_bucket: total / series.len() as f64,
        max_bucket,
    })
}
