use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use log::debug;
use polars::prelude::*;

use crate::errors::DengueResult;
use crate::models::aggregate::{AggregatedSeries, aggregate};
use crate::models::catalog::DatasetCatalog;
use crate::models::resolver::{ResolvedQuery, resolve};
use crate::models::scope::{FilterScope, LocalityScope, RegionScope};
use crate::models::summary::{SeriesSummary, summarize};
use crate::models::table::TableStore;

/// Everything the presentation adapter needs for one render.
#[derive(Debug, Clone)]
pub struct SeriesView {
    /// Chart title, e.g. `Casos de Dengue por Semanal - Campinas (SP)`.
    pub title: String,
    pub series: Arc<AggregatedSeries>,
    pub summary: SeriesSummary,
}

impl SeriesView {
    /// Serialize the view for a JSON-consuming presentation layer.
    pub fn to_json(&self) -> DengueResult<String> {
        let value = serde_json::json!({
            "title": self.title,
            "series": &*self.series,
            "summary": self.summary,
        });
        Ok(serde_json::to_string(&value)?)
    }
}

/// Chart title in the dashboard's format.
pub fn chart_title(scope: &FilterScope) -> String {
    let place = match (&scope.region, &scope.locality) {
        (RegionScope::All, _) => "Brasil".to_string(),
        (RegionScope::State(uf), LocalityScope::Municipality(name)) => format!("{name} ({uf})"),
        (RegionScope::State(uf), LocalityScope::All) => uf.clone(),
    };
    format!(
        "{} de Dengue por {} - {}",
        scope.metric, scope.granularity, place
    )
}

/// Explicit evaluation pipeline replacing the dashboard's reactive re-run:
/// every filter change triggers one synchronous pass of
/// catalog → resolver → aggregator → statistics.
///
/// The only shared state is the pair of read-through caches: raw tables keyed
/// by path, computed series keyed by the full [`ResolvedQuery`]. Both hold
/// immutable values reused only on identical keys; errors are never cached.
pub struct DenguePipeline {
    catalog: DatasetCatalog,
    tables: TableStore,
    series: Mutex<HashMap<ResolvedQuery, Arc<AggregatedSeries>>>,
}

impl DenguePipeline {
    pub fn new(catalog: DatasetCatalog) -> Self {
        Self {
            catalog,
            tables: TableStore::new(),
            series: Mutex::new(HashMap::new()),
        }
    }

    /// Open the catalog at the given locations and wrap it in a pipeline.
    pub fn open(
        state_dir: impl Into<PathBuf>,
        aggregate_table: impl Into<PathBuf>,
    ) -> DengueResult<Self> {
        Ok(Self::new(DatasetCatalog::open(state_dir, aggregate_table)?))
    }

    pub fn catalog(&self) -> &DatasetCatalog {
        &self.catalog
    }

    /// Region identifiers available for the sidebar, ascending.
    pub fn list_regions(&self) -> Vec<String> {
        self.catalog.regions().map(str::to_string).collect()
    }

    /// Distinct municipality names in `region`'s table, sorted ascending.
    pub fn list_localities(&self, region: &str) -> DengueResult<Vec<String>> {
        let path = self.catalog.state_table(region)?;
        let table = self.tables.load(&path)?;

        let names = table
            .column("Municipio")?
            .as_materialized_series()
            .unique()?
            .sort(SortOptions::default())?;

        Ok(names
            .str()?
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect())
    }

    /// Run the full pipeline for `scope`: validate, resolve, aggregate.
    ///
    /// Identical scopes reuse the cached series; the raw table behind a scope
    /// is read from disk at most once per session.
    pub fn compute_series(&self, scope: &FilterScope) -> DengueResult<Arc<AggregatedSeries>> {
        let query = resolve(&self.catalog, scope)?;

        if let Some(series) = self
            .series
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&query)
        {
            debug!("series cache hit for {}", query.source.display());
            return Ok(Arc::clone(series));
        }

        let table = self.tables.load(&query.source)?;
        let series = Arc::new(aggregate(&table, &query)?);

        self.series
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(query, Arc::clone(&series));
        Ok(series)
    }

    /// Series, summary and chart title in one call.
    ///
    /// Propagates `EmptyResult` before statistics are ever computed, so
    /// `summarize` never sees an empty series.
    pub fn compute_view(&self, scope: &FilterScope) -> DengueResult<SeriesView> {
        let series = self.compute_series(scope)?;
        let summary = summarize(&series)?;
        Ok(SeriesView {
            title: chart_title(scope),
            series,
            summary,
        })
    }
}
