//! Core computation behind the dengue temporal-analysis dashboards.
//!
//! Reads the per-state parquet tables and the nationwide aggregate table
//! produced upstream, resolves user filters into parameterized queries,
//! aggregates case counts (or incidence rates) into weekly, monthly or yearly
//! series and derives the headline statistics shown next to each chart.

pub mod errors;
pub mod models;

pub use errors::*;
pub use models::*;
