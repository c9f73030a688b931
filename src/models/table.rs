use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use log::debug;
use polars::prelude::*;

use crate::errors::{DengueError, DengueResult};

/// Read-through cache of raw source tables, keyed by path.
///
/// Source tables are externally produced and never change during a session,
/// so each path is read from disk at most once; repeated loads hand out the
/// same immutable `Arc<DataFrame>`. Entries are never mutated or evicted.
#[derive(Debug, Default)]
pub struct TableStore {
    loaded: Mutex<HashMap<PathBuf, Arc<DataFrame>>>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the parquet table at `path`, reusing the cached frame when present.
    pub fn load(&self, path: &Path) -> DengueResult<Arc<DataFrame>> {
        let mut loaded = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = loaded.get(path) {
            return Ok(Arc::clone(table));
        }

        let file = File::open(path).map_err(|source| DengueError::CatalogUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let frame = ParquetReader::new(file).finish()?;
        debug!("loaded {} ({} rows)", path.display(), frame.height());

        let table = Arc::new(frame);
        loaded.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }

    /// Number of distinct tables currently cached.
    pub fn len(&self) -> usize {
        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
