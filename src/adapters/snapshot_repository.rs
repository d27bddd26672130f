//! Binary snapshot files for value tables.
//!
//! Files hold the raw snapshot produced by [`ValueStore::snapshot`], without
//! any framing. Loading reads the whole file before touching the store, so a
//! truncated or corrupt file leaves the store as it was.

use std::{fs, path::Path};

use tracing::info;

use crate::{Result, error::Error, ports::TableRepository, q_learning::ValueStore};

/// File-backed table repository.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use wumpus::{
///     adapters::SnapshotFileRepository, ports::TableRepository, q_learning::ValueStore,
///     types::GridSize,
/// };
///
/// let repo = SnapshotFileRepository::new();
/// let store = ValueStore::new(GridSize::STANDARD);
/// repo.save(&store, Path::new("table.wqt"))?;
///
/// let mut loaded = ValueStore::new(GridSize::STANDARD);
/// repo.load_into(&mut loaded, Path::new("table.wqt"))?;
/// # Ok::<(), wumpus::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotFileRepository;

impl SnapshotFileRepository {
    pub fn new() -> Self {
        Self
    }
}

impl TableRepository for SnapshotFileRepository {
    fn save(&self, store: &ValueStore, path: &Path) -> Result<()> {
        let bytes = store.snapshot()?;
        fs::write(path, &bytes).map_err(|source| Error::Io {
            operation: format!("write snapshot {path:?}"),
            source,
        })?;
        info!(path = %path.display(), states = store.count(), bytes = bytes.len(), "saved value table");
        Ok(())
    }

    fn load_into(&self, store: &mut ValueStore, path: &Path) -> Result<()> {
        let bytes = fs::read(path).map_err(|source| Error::Io {
            operation: format!("read snapshot {path:?}"),
            source,
        })?;
        store.restore(&bytes)
    }
}
