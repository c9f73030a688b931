use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io;
use std::path::Path;

use log::debug;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{DengueError, DengueResult};
use crate::models::aggregate::{AggregatedSeries, TimeBucket};
use crate::models::scope::{Granularity, Metric};

const YEAR: &str = "Ano";
const STATE_NAME: &str = "Estado";
const STATE_UF: &str = "UF";
const TOTAL: &str = "Total de Casos";

/// One row of the consolidated dataset: a state's case total for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyStateTotal {
    pub year: i32,
    /// Full state name as shown on the map, e.g. `São Paulo`.
    pub state: String,
    /// Two-letter UF code, e.g. `SP`.
    pub uf: String,
    pub total: f64,
}

/// Pre-consolidated per-state yearly totals backing the map dashboard.
///
/// The upstream spreadsheet is expected as a CSV or parquet export with the
/// columns `Ano`, `Estado`, `UF` and `Total de Casos`; converting the workbook
/// itself happens outside this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedDataset {
    records: Vec<YearlyStateTotal>,
}

impl ConsolidatedDataset {
    /// Read the dataset from a CSV or parquet export, chosen by extension.
    pub fn load(path: &Path) -> DengueResult<Self> {
        if !path.is_file() {
            return Err(DengueError::CatalogUnavailable {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "consolidated dataset missing"),
            });
        }

        let frame = match path.extension().and_then(|ext| ext.to_str()) {
            Some("parquet") => {
                let file = File::open(path).map_err(|source| DengueError::CatalogUnavailable {
                    path: path.to_path_buf(),
                    source,
                })?;
                ParquetReader::new(file).finish()?
            }
            _ => CsvReadOptions::default()
                .with_has_header(true)
                .try_into_reader_with_file_path(Some(path.to_path_buf()))?
                .finish()?,
        };
        debug!("consolidated dataset: {} rows from {}", frame.height(), path.display());

        Self::from_frame(&frame)
    }

    /// Build the dataset from an already-loaded frame.
    ///
    /// Rows with a null year or state are skipped; a null total counts as
    /// zero, consistent with the aggregator's null handling.
    pub fn from_frame(frame: &DataFrame) -> DengueResult<Self> {
        let year_col = frame
            .column(YEAR)?
            .as_materialized_series()
            .cast(&DataType::Int32)?;
        let years = year_col.i32()?;
        let state_col = frame
            .column(STATE_NAME)?
            .as_materialized_series()
            .cast(&DataType::String)?;
        let states = state_col.str()?;
        let uf_col = frame
            .column(STATE_UF)?
            .as_materialized_series()
            .cast(&DataType::String)?;
        let ufs = uf_col.str()?;
        let total_col = frame
            .column(TOTAL)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        let totals = total_col.f64()?;

        let mut records = Vec::with_capacity(frame.height());
        for row in 0..frame.height() {
            let (Some(year), Some(state), Some(uf)) =
                (years.get(row), states.get(row), ufs.get(row))
            else {
                continue;
            };
            records.push(YearlyStateTotal {
                year,
                state: state.to_string(),
                uf: uf.to_string(),
                total: totals.get(row).unwrap_or(0.0),
            });
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[YearlyStateTotal] {
        &self.records
    }

    /// Years present in the dataset, ascending and deduplicated.
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.records.iter().map(|record| record.year).collect();
        years.into_iter().collect()
    }

    /// Every state's total for `year`, ordered by UF; feeds the choropleth.
    pub fn totals_for_year(&self, year: i32) -> DengueResult<Vec<YearlyStateTotal>> {
        let mut rows: Vec<YearlyStateTotal> = self
            .records
            .iter()
            .filter(|record| record.year == year)
            .cloned()
            .collect();
        if rows.is_empty() {
            return Err(DengueError::EmptyResult);
        }
        rows.sort_by(|a, b| a.uf.cmp(&b.uf));
        Ok(rows)
    }

    /// Nationwide yearly series: all states summed per year.
    pub fn national_series(&self) -> DengueResult<AggregatedSeries> {
        Self::series_from(self.records.iter())
    }

    /// Yearly series for one state; exact UF match.
    pub fn state_series(&self, uf: &str) -> DengueResult<AggregatedSeries> {
        Self::series_from(self.records.iter().filter(|record| record.uf == uf))
    }

    fn series_from<'a>(
        rows: impl Iterator<Item = &'a YearlyStateTotal>,
    ) -> DengueResult<AggregatedSeries> {
        let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
        for row in rows {
            *by_year.entry(row.year).or_insert(0.0) += row.total;
        }
        if by_year.is_empty() {
            return Err(DengueError::EmptyResult);
        }

        let buckets = by_year
            .into_iter()
            .map(|(year, value)| TimeBucket {
                year,
                sub_period: None,
                value,
            })
            .collect();

        Ok(AggregatedSeries {
            metric: Metric::Cases,
            granularity: Granularity::Yearly,
            buckets,
        })
    }
}
