use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::{DengueError, DengueResult};

/// Enumerates the per-state source tables and the nationwide aggregate table.
///
/// The on-disk layout mirrors the visualization dataset produced upstream:
/// one `<UF>.parquet` per state inside `state_dir`, plus a single pre-built
/// country-wide table. The directory is scanned once at [`DatasetCatalog::open`]
/// time; the region set is an immutable snapshot after that, which keeps
/// [`crate::models::resolver::resolve`] free of I/O.
#[derive(Debug, Clone)]
pub struct DatasetCatalog {
    state_dir: PathBuf,
    aggregate_table: PathBuf,
    regions: BTreeSet<String>,
}

impl DatasetCatalog {
    /// Scan `state_dir` for per-state parquet tables and record the path of
    /// the nationwide aggregate table.
    ///
    /// Fails with [`DengueError::CatalogUnavailable`] when the directory is
    /// missing or unreadable, or when the aggregate table does not exist.
    pub fn open(
        state_dir: impl Into<PathBuf>,
        aggregate_table: impl Into<PathBuf>,
    ) -> DengueResult<Self> {
        let state_dir = state_dir.into();
        let aggregate_table = aggregate_table.into();

        let entries = fs::read_dir(&state_dir).map_err(|source| {
            DengueError::CatalogUnavailable {
                path: state_dir.clone(),
                source,
            }
        })?;

        let mut regions = BTreeSet::new();
        for entry in entries {
            let entry = entry.map_err(|source| DengueError::CatalogUnavailable {
                path: state_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("parquet") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                regions.insert(stem.to_string());
            }
        }

        if !aggregate_table.is_file() {
            return Err(DengueError::CatalogUnavailable {
                path: aggregate_table,
                source: io::Error::new(io::ErrorKind::NotFound, "aggregate table missing"),
            });
        }

        debug!(
            "catalog opened: {} regions under {}",
            regions.len(),
            state_dir.display()
        );

        Ok(Self {
            state_dir,
            aggregate_table,
            regions,
        })
    }

    /// Region identifiers (UF codes) with an available source table, ascending.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(String::as_str)
    }

    /// Whether `uf` was listed when the catalog was opened.
    pub fn contains_region(&self, uf: &str) -> bool {
        self.regions.contains(uf)
    }

    /// Path of the per-state table backing `uf`.
    pub fn state_table(&self, uf: &str) -> DengueResult<PathBuf> {
        if !self.contains_region(uf) {
            return Err(DengueError::UnknownRegion(uf.to_string()));
        }
        Ok(self.state_dir.join(format!("{uf}.parquet")))
    }

    /// Path of the pre-built nationwide aggregate table.
    pub fn aggregate_table(&self) -> &Path {
        &self.aggregate_table
    }
}
