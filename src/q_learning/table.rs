//! Value store: keyed, lazily populated table of state records
//!
//! Records live in an arena and are addressed through [`StateId`] handles.
//! Mutation only happens through [`ValueStore::update`], so every write site
//! is explicit. Handles carry the table generation; clearing or restoring the
//! table invalidates every handle issued before.

use std::collections::HashMap;

use tracing::{debug, info};

use super::{
    action::Action,
    codec,
    encoder::{encode, state_key},
    state::{StateKey, StateRecord},
};
use crate::{Error, Result, ports::World, types::GridSize};

/// Handle to a record inside one [`ValueStore`] generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId {
    index: usize,
    generation: u32,
}

impl StateId {
    /// Position of the record in insertion order.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Table of learned states for one grid size.
#[derive(Debug, Clone)]
pub struct ValueStore {
    grid: GridSize,
    records: Vec<StateRecord>,
    index: HashMap<StateKey, usize>,
    generation: u32,
}

impl ValueStore {
    /// Create an empty table for worlds of size `grid`.
    pub fn new(grid: GridSize) -> Self {
        Self {
            grid,
            records: Vec::new(),
            index: HashMap::new(),
            generation: 0,
        }
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Number of distinct stored keys.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Handle of the record for the world's current observation, creating the
    /// record on first sight.
    ///
    /// Legality is evaluated only when the record is created; later lookups
    /// of the same key return the stored record untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GridMismatch`] if the world has a different size.
    pub fn get_or_create<W: World>(&mut self, world: &W) -> Result<StateId> {
        self.ensure_grid(world.grid_size())?;
        let key = state_key(world);
        if let Some(&index) = self.index.get(&key) {
            return Ok(self.handle(index));
        }

        let record = encode(world);
        let index = self.records.len();
        debug!(key = %key, index, "new state");
        self.records.push(record);
        self.index.insert(key, index);
        Ok(self.handle(index))
    }

    /// Handle of an existing record for the world's observation.
    pub fn find<W: World>(&self, world: &W) -> Option<StateId> {
        if world.grid_size() != self.grid {
            return None;
        }
        self.lookup(&state_key(world))
    }

    pub fn lookup(&self, key: &StateKey) -> Option<StateId> {
        self.index.get(key).map(|&index| self.handle(index))
    }

    /// Record behind `id`, `None` for a handle from an older generation.
    pub fn get(&self, id: StateId) -> Option<&StateRecord> {
        if id.generation != self.generation {
            return None;
        }
        self.records.get(id.index)
    }

    /// Mutate the record behind `id` in place.
    ///
    /// The change is visible to every later lookup of the same key.
    pub fn update<R>(&mut self, id: StateId, f: impl FnOnce(&mut StateRecord) -> R) -> Option<R> {
        if id.generation != self.generation {
            return None;
        }
        self.records.get_mut(id.index).map(f)
    }

    /// Best legal action of a record and its value.
    ///
    /// `None` means either an unknown handle or a state without any legal
    /// action.
    pub fn best_action(&self, id: StateId) -> Option<(Action, f64)> {
        self.get(id).and_then(|record| record.values().best())
    }

    /// All records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &StateRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| (self.handle(index), record))
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Encode the full table.
    ///
    /// # Errors
    ///
    /// Fails only if the table outgrows the snapshot count field.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        codec::encode_table(self.grid, self.records.iter())
    }

    /// Replace the table with a decoded snapshot.
    ///
    /// All-or-nothing: if decoding fails the current contents stay intact.
    ///
    /// # Errors
    ///
    /// Returns the decode error, [`Error::GridMismatch`] if the snapshot was
    /// taken on another grid size, or [`Error::DuplicateStateKey`].
    pub fn restore(&mut self, bytes: &[u8]) -> Result<()> {
        let (grid, records) = codec::decode_table(bytes)?;
        self.ensure_grid(grid)?;

        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            let key = record.key();
            if index.contains_key(&key) {
                return Err(Error::DuplicateStateKey {
                    key: key.to_string(),
                });
            }
            index.insert(key, position);
        }

        self.records = records;
        self.index = index;
        self.generation = self.generation.wrapping_add(1);
        info!(states = self.records.len(), grid = %self.grid, "restored value table");
        Ok(())
    }

    fn ensure_grid(&self, grid: GridSize) -> Result<()> {
        if grid != self.grid {
            return Err(Error::GridMismatch {
                expected: self.grid,
                got: grid,
            });
        }
        Ok(())
    }

    fn handle(&self, index: usize) -> StateId {
        StateId {
            index,
            generation: self.generation,
        }
    }
}
