pub mod aggregate;
pub mod catalog;
pub mod consolidated;
pub mod pipeline;
pub mod resolver;
pub mod scope;
pub mod states;
pub mod summary;
pub mod table;

pub use aggregate::{AggregatedSeries, TimeBucket, aggregate};
pub use catalog::DatasetCatalog;
pub use consolidated::{ConsolidatedDataset, YearlyStateTotal};
pub use pipeline::{DenguePipeline, SeriesView, chart_title};
pub use resolver::{ResolvedQuery, resolve};
pub use scope::{FilterScope, Granularity, LocalityScope, Metric, RegionScope};
pub use states::{STATES, StateInfo, find_by_name, find_by_uf, is_known_uf};
pub use summary::{SeriesSummary, summarize};
pub use table::TableStore;
