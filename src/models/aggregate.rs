use chrono::{NaiveDate, Weekday};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{DengueError, DengueResult};
use crate::models::resolver::ResolvedQuery;
use crate::models::scope::{Granularity, Metric};

/// Name of the summed metric column in the grouped frame.
const VALUE_COLUMN: &str = "Valor";

/// One aggregation bucket: a `(year, week|month)` pair and the summed metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub year: i32,
    /// Week (1..=53) or month (1..=12); `None` for yearly buckets.
    pub sub_period: Option<u32>,
    pub value: f64,
}

impl TimeBucket {
    /// Ordering key; series are kept strictly ascending by this.
    pub fn key(&self) -> (i32, Option<u32>) {
        (self.year, self.sub_period)
    }

    /// Axis label in the dashboard's format: `2020 S05`, `2020 M03` or `2020`.
    pub fn label(&self, granularity: Granularity) -> String {
        match (granularity, self.sub_period) {
            (Granularity::Weekly, Some(week)) => format!("{} S{:02}", self.year, week),
            (Granularity::Monthly, Some(month)) => format!("{} M{:02}", self.year, month),
            _ => self.year.to_string(),
        }
    }

    /// First calendar day covered by the bucket, when representable.
    /// Weekly buckets are epidemiological (ISO) weeks starting on Monday.
    pub fn start_date(&self, granularity: Granularity) -> Option<NaiveDate> {
        match (granularity, self.sub_period) {
            (Granularity::Weekly, Some(week)) => {
                NaiveDate::from_isoywd_opt(self.year, week, Weekday::Mon)
            }
            (Granularity::Monthly, Some(month)) => NaiveDate::from_ymd_opt(self.year, month, 1),
            (Granularity::Yearly, None) => NaiveDate::from_ymd_opt(self.year, 1, 1),
            _ => None,
        }
    }
}

/// Ordered series of buckets sharing one metric and granularity.
///
/// Derived data: recomputed from scratch for every filter evaluation, shared
/// immutably out of the cache, never mutated in place. Buckets are unique and
/// strictly ascending by `(year, sub_period)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSeries {
    pub metric: Metric,
    pub granularity: Granularity,
    pub buckets: Vec<TimeBucket>,
}

impl AggregatedSeries {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Metric values in time order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.buckets.iter().map(|bucket| bucket.value)
    }

    /// Axis labels in time order.
    pub fn labels(&self) -> Vec<String> {
        self.buckets
            .iter()
            .map(|bucket| bucket.label(self.granularity))
            .collect()
    }
}

/// Group `table` by the query's bucket columns and sum its metric column.
///
/// Null metric values contribute zero to their bucket; they never drop the
/// bucket itself. Rate values are the upstream per-record `Taxa` figures and
/// are summed as-is, matching the source data pipeline. A filtered set with
/// zero rows is reported as [`DengueError::EmptyResult`] so the caller can
/// render a "no data" state and skip the statistics step.
pub fn aggregate(table: &DataFrame, query: &ResolvedQuery) -> DengueResult<AggregatedSeries> {
    let mut frame = table.clone().lazy();
    if let Some(municipality) = &query.municipality {
        // Exact match only: "campinas" does not select "Campinas".
        frame = frame.filter(col("Municipio").eq(lit(municipality.clone())));
    }

    let keys: Vec<Expr> = query
        .granularity
        .bucket_columns()
        .iter()
        .map(|name| col(*name))
        .collect();
    let mut casts = vec![col("Ano").cast(DataType::Int32)];
    if let Some(sub) = query.granularity.sub_period_column() {
        casts.push(col(sub).cast(DataType::UInt32));
    }

    let grouped = frame
        .group_by(keys.clone())
        .agg([col(query.metric.column())
            .sum()
            .cast(DataType::Float64)
            .alias(VALUE_COLUMN)])
        .with_columns(casts)
        .sort_by_exprs(keys, SortMultipleOptions::default())
        .collect()?;

    if grouped.height() == 0 {
        return Err(DengueError::EmptyResult);
    }

    let years = grouped.column("Ano")?.as_materialized_series().i32()?;
    let values = grouped
        .column(VALUE_COLUMN)?
        .as_materialized_series()
        .f64()?;
    let sub_periods = match query.granularity.sub_period_column() {
        Some(name) => Some(grouped.column(name)?.as_materialized_series().u32()?),
        None => None,
    };

    let mut buckets = Vec::with_capacity(grouped.height());
    for row in 0..grouped.height() {
        let Some(year) = years.get(row) else { continue };
        let sub_period = match &sub_periods {
            Some(column) => match column.get(row) {
                Some(value) => Some(value),
                // a null sub-period cannot be placed on the time axis
                None => continue,
            },
            None => None,
        };
        let value = values.get(row).unwrap_or(0.0);
        buckets.push(TimeBucket {
            year,
            sub_period,
            value,
        });
    }

    if buckets.is_empty() {
        return Err(DengueError::EmptyResult);
    }

    Ok(AggregatedSeries {
        metric: query.metric,
        granularity: query.granularity,
        buckets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn query(granularity: Granularity, metric: Metric, municipality: Option<&str>) -> ResolvedQuery {
        ResolvedQuery {
            source: PathBuf::from("in-memory"),
            municipality: municipality.map(str::to_string),
            granularity,
            metric,
        }
    }

    fn weekly_fixture() -> DataFrame {
        df!(
            "Ano" => [2020i32, 2020, 2020],
            "Semana" => [1u32, 1, 2],
            "Mes" => [1u32, 1, 1],
            "Municipio" => ["Campinas", "Santos", "Campinas"],
            "Casos" => [10i64, 5, 3],
            "Taxa" => [1.5f64, 0.5, 0.25],
        )
        .unwrap()
    }

    #[test]
    fn weekly_groups_sum_cases() {
        let series = aggregate(
            &weekly_fixture(),
            &query(Granularity::Weekly, Metric::Cases, None),
        )
        .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.buckets[0].key(), (2020, Some(1)));
        assert_eq!(series.buckets[0].value, 15.0);
        assert_eq!(series.buckets[1].key(), (2020, Some(2)));
        assert_eq!(series.buckets[1].value, 3.0);
    }

    #[test]
    fn yearly_granularity_collapses_sub_periods() {
        let series = aggregate(
            &weekly_fixture(),
            &query(Granularity::Yearly, Metric::Cases, None),
        )
        .unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.buckets[0].key(), (2020, None));
        assert_eq!(series.buckets[0].value, 18.0);
    }

    #[test]
    fn rate_metric_sums_precomputed_taxa() {
        let series = aggregate(
            &weekly_fixture(),
            &query(Granularity::Weekly, Metric::Rate, None),
        )
        .unwrap();

        assert_eq!(series.buckets[0].value, 2.0);
        assert_eq!(series.buckets[1].value, 0.25);
    }

    #[test]
    fn municipality_predicate_is_case_sensitive() {
        let table = df!(
            "Ano" => [2020i32, 2020],
            "Semana" => [1u32, 1],
            "Municipio" => ["Campinas", "campinas"],
            "Casos" => [10i64, 99],
        )
        .unwrap();

        let series = aggregate(
            &table,
            &query(Granularity::Weekly, Metric::Cases, Some("Campinas")),
        )
        .unwrap();

        // the lower-case row must not be counted
        assert_eq!(series.buckets[0].value, 10.0);
    }

    #[test]
    fn null_metric_values_contribute_zero() {
        let table = df!(
            "Ano" => [2020i32, 2020, 2020],
            "Semana" => [1u32, 1, 2],
            "Municipio" => ["Campinas", "Campinas", "Campinas"],
            "Casos" => [Some(10i64), None, None],
        )
        .unwrap();

        let series = aggregate(&table, &query(Granularity::Weekly, Metric::Cases, None)).unwrap();

        // both buckets survive; the all-null week sums to zero
        assert_eq!(series.len(), 2);
        assert_eq!(series.buckets[0].value, 10.0);
        assert_eq!(series.buckets[1].value, 0.0);
    }

    #[test]
    fn buckets_are_sorted_regardless_of_row_order() {
        let table = df!(
            "Ano" => [2021i32, 2020, 2021, 2020],
            "Semana" => [2u32, 5, 1, 3],
            "Municipio" => ["A", "A", "A", "A"],
            "Casos" => [1i64, 1, 1, 1],
        )
        .unwrap();

        let series = aggregate(&table, &query(Granularity::Weekly, Metric::Cases, None)).unwrap();
        let keys: Vec<_> = series.buckets.iter().map(TimeBucket::key).collect();

        assert_eq!(
            keys,
            [
                (2020, Some(3)),
                (2020, Some(5)),
                (2021, Some(1)),
                (2021, Some(2)),
            ]
        );
        for pair in series.buckets.windows(2) {
            assert!(pair[0].key() < pair[1].key());
        }
    }

    #[test]
    fn empty_filtered_set_is_empty_result() {
        let series = aggregate(
            &weekly_fixture(),
            &query(Granularity::Weekly, Metric::Cases, Some("Niterói")),
        );
        assert!(matches!(series, Err(DengueError::EmptyResult)));
    }

    #[test]
    fn aggregation_is_idempotent() {
        let table = weekly_fixture();
        let q = query(Granularity::Monthly, Metric::Cases, None);
        let first = aggregate(&table, &q).unwrap();
        let second = aggregate(&table, &q).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn labels_follow_dashboard_format() {
        let weekly = TimeBucket {
            year: 2020,
            sub_period: Some(5),
            value: 1.0,
        };
        assert_eq!(weekly.label(Granularity::Weekly), "2020 S05");

        let monthly = TimeBucket {
            year: 2020,
            sub_period: Some(11),
            value: 1.0,
        };
        assert_eq!(monthly.label(Granularity::Monthly), "2020 M11");

        let yearly = TimeBucket {
            year: 2020,
            sub_period: None,
            value: 1.0,
        };
        assert_eq!(yearly.label(Granularity::Yearly), "2020");
    }

    #[test]
    fn start_dates_map_to_calendar() {
        let monthly = TimeBucket {
            year: 2021,
            sub_period: Some(3),
            value: 0.0,
        };
        assert_eq!(
            monthly.start_date(Granularity::Monthly),
            NaiveDate::from_ymd_opt(2021, 3, 1)
        );

        let yearly = TimeBucket {
            year: 2021,
            sub_period: None,
            value: 0.0,
        };
        assert_eq!(
            yearly.start_date(Granularity::Yearly),
            NaiveDate::from_ymd_opt(2021, 1, 1)
        );

        let bad_week = TimeBucket {
            year: 2021,
            sub_period: Some(60),
            value: 0.0,
        };
        assert_eq!(bad_week.start_date(Granularity::Weekly), None);
    }
}
