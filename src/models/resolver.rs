use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::DengueResult;
use crate::models::catalog::DatasetCatalog;
use crate::models::scope::{FilterScope, Granularity, LocalityScope, Metric, RegionScope};

/// Fully resolved parameters for one aggregation run.
///
/// Produced by [`resolve`] from the user's filter scope. Also serves as the
/// exact cache key for computed series: identical filters over the same
/// catalog resolve to an identical query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedQuery {
    /// Source table backing the scope: per-state, or the nationwide aggregate.
    pub source: PathBuf,
    /// Exact municipality name to keep, or `None` for the whole region.
    pub municipality: Option<String>,
    pub granularity: Granularity,
    pub metric: Metric,
}

/// Map a filter scope onto the source table, row predicate and bucket columns
/// the aggregator should use.
///
/// Pure: the catalog's region set was snapshotted when it was opened, so no
/// I/O happens here and the same scope always resolves identically. The
/// municipality predicate is carried as a value, never spliced into a query
/// string.
pub fn resolve(catalog: &DatasetCatalog, scope: &FilterScope) -> DengueResult<ResolvedQuery> {
    scope.validate()?;

    let source = match &scope.region {
        RegionScope::All => catalog.aggregate_table().to_path_buf(),
        RegionScope::State(uf) => catalog.state_table(uf)?,
    };

    let municipality = match (&scope.region, &scope.locality) {
        (RegionScope::State(_), LocalityScope::Municipality(name)) => Some(name.clone()),
        _ => None,
    };

    Ok(ResolvedQuery {
        source,
        municipality,
        granularity: scope.granularity,
        metric: scope.metric,
    })
}
