use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{DengueError, DengueResult};

/// Time bucket size used when grouping case records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    /// One bucket per epidemiological week (`Ano`, `Semana`).
    Weekly,
    /// One bucket per calendar month (`Ano`, `Mes`).
    Monthly,
    /// One bucket per year (`Ano`).
    Yearly,
}

impl Granularity {
    /// Column tuple the aggregator groups and orders by.
    pub fn bucket_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Weekly => &["Ano", "Semana"],
            Self::Monthly => &["Ano", "Mes"],
            Self::Yearly => &["Ano"],
        }
    }

    /// The sub-period column (`Semana` or `Mes`), if this granularity has one.
    pub fn sub_period_column(&self) -> Option<&'static str> {
        match self {
            Self::Weekly => Some("Semana"),
            Self::Monthly => Some("Mes"),
            Self::Yearly => None,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "Semanal"),
            Self::Monthly => write!(f, "Mensal"),
            Self::Yearly => write!(f, "Anual"),
        }
    }
}

/// The value being aggregated: raw case counts or the precomputed
/// per-record incidence rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Cases,
    Rate,
}

impl Metric {
    /// Name of the source-table column holding this metric.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Cases => "Casos",
            Self::Rate => "Taxa",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// State-level scope: the whole country or one federative unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionScope {
    All,
    /// A UF code such as `SP`, matching a per-state source table.
    State(String),
}

/// Municipality-level scope within the selected state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocalityScope {
    All,
    /// Exact municipality name; matching is case-sensitive.
    Municipality(String),
}

/// User-chosen filter state, rebuilt from scratch on every interaction.
///
/// A `Municipality` locality is only meaningful under a concrete state;
/// [`FilterScope::validate`] rejects the other combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterScope {
    pub region: RegionScope,
    pub locality: LocalityScope,
    pub granularity: Granularity,
    pub metric: Metric,
}

impl FilterScope {
    /// Scope covering the whole country.
    pub fn nationwide(granularity: Granularity, metric: Metric) -> Self {
        Self {
            region: RegionScope::All,
            locality: LocalityScope::All,
            granularity,
            metric,
        }
    }

    /// Scope covering one state, all of its municipalities.
    pub fn state(uf: impl Into<String>, granularity: Granularity, metric: Metric) -> Self {
        Self {
            region: RegionScope::State(uf.into()),
            locality: LocalityScope::All,
            granularity,
            metric,
        }
    }

    /// Scope covering a single municipality of one state.
    pub fn municipality(
        uf: impl Into<String>,
        name: impl Into<String>,
        granularity: Granularity,
        metric: Metric,
    ) -> Self {
        Self {
            region: RegionScope::State(uf.into()),
            locality: LocalityScope::Municipality(name.into()),
            granularity,
            metric,
        }
    }

    /// Reject a municipality filter without a concrete state.
    pub fn validate(&self) -> DengueResult<()> {
        match (&self.region, &self.locality) {
            (RegionScope::All, LocalityScope::Municipality(_)) => {
                Err(DengueError::LocalityWithoutRegion)
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_columns_per_granularity() {
        assert_eq!(Granularity::Weekly.bucket_columns(), ["Ano", "Semana"]);
        assert_eq!(Granularity::Monthly.bucket_columns(), ["Ano", "Mes"]);
        assert_eq!(Granularity::Yearly.bucket_columns(), ["Ano"]);
    }

    #[test]
    fn sub_period_column_absent_for_yearly() {
        assert_eq!(Granularity::Weekly.sub_period_column(), Some("Semana"));
        assert_eq!(Granularity::Monthly.sub_period_column(), Some("Mes"));
        assert_eq!(Granularity::Yearly.sub_period_column(), None);
    }

    #[test]
    fn metric_columns() {
        assert_eq!(Metric::Cases.column(), "Casos");
        assert_eq!(Metric::Rate.column(), "Taxa");
    }

    #[test]
    fn municipality_without_state_is_invalid() {
        let scope = FilterScope {
            region: RegionScope::All,
            locality: LocalityScope::Municipality("Campinas".to_string()),
            granularity: Granularity::Weekly,
            metric: Metric::Cases,
        };
        assert!(matches!(
            scope.validate(),
            Err(DengueError::LocalityWithoutRegion)
        ));
    }

    #[test]
    fn concrete_state_scopes_are_valid() {
        let state = FilterScope::state("SP", Granularity::Monthly, Metric::Rate);
        assert!(state.validate().is_ok());

        let city =
            FilterScope::municipality("SP", "Campinas", Granularity::Weekly, Metric::Cases);
        assert!(city.validate().is_ok());

        let country = FilterScope::nationwide(Granularity::Yearly, Metric::Cases);
        assert!(country.validate().is_ok());
    }

    #[test]
    fn display_labels_match_dashboard_wording() {
        assert_eq!(Granularity::Weekly.to_string(), "Semanal");
        assert_eq!(Granularity::Monthly.to_string(), "Mensal");
        assert_eq!(Granularity::Yearly.to_string(), "Anual");
        assert_eq!(Metric::Cases.to_string(), "Casos");
        assert_eq!(Metric::Rate.to_string(), "Taxa");
    }
}
