//! Repository port for value table persistence.

use std::path::Path;

use crate::{Result, q_learning::ValueStore};

/// Port for persisting and loading value tables.
///
/// Loading is all-or-nothing: on any error the target store keeps its
/// previous contents.
pub trait TableRepository {
    /// Save the full table to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, store: &ValueStore, path: &Path) -> Result<()>;

    /// Replace the contents of `store` with the table stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded. `store` is
    /// left unchanged in that case.
    fn load_into(&self, store: &mut ValueStore, path: &Path) -> Result<()>;
}
