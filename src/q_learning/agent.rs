//! Caller-facing Q-learning agent
//!
//! Owns one value store together with the trainer and random source used
//! to fill it. This is the surface the CLI and other drivers talk to.

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{
    action::{ACTION_COUNT, Action},
    policy::Policy,
    table::{StateId, ValueStore},
    trainer::{EpisodeReport, LearningParams, Trainer, TrainerConfig},
    translator,
};
use crate::{
    Result,
    ports::{MapDescriptor, World},
    types::GridSize,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// What the agent knows about one observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSummary {
    /// State key, hex encoded.
    pub key: String,
    /// Values in action slot order, sentinels shown as `0.0`.
    pub values: [f64; ACTION_COUNT],
    pub best_action: Option<Action>,
    pub best_value: Option<f64>,
    /// Number of states in the table.
    pub table_size: usize,
}

/// Tabular Q-learning agent over a single grid size.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    store: ValueStore,
    trainer: Trainer,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create an agent with an empty table.
    pub fn new(grid: GridSize, config: TrainerConfig) -> Self {
        Self::from_store(ValueStore::new(grid), config)
    }

    /// Wrap an existing table, e.g. one restored from disk.
    pub fn from_store(store: ValueStore, config: TrainerConfig) -> Self {
        Self {
            store,
            trainer: Trainer::new(config),
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    pub fn config(&self) -> &TrainerConfig {
        self.trainer.config()
    }

    pub fn grid(&self) -> GridSize {
        self.store.grid()
    }

    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ValueStore {
        &mut self.store
    }

    pub fn into_store(self) -> ValueStore {
        self.store
    }

    /// Handle of the record for the world's current observation.
    pub fn get_or_create_state_for<W: World>(&mut self, world: &W) -> Result<StateId> {
        self.store.get_or_create(world)
    }

    /// Number of learned states.
    pub fn count(&self) -> usize {
        self.store.count()
    }

    /// Best legal action of a state; `None` if it has none.
    pub fn best_action(&self, id: StateId) -> Option<(Action, f64)> {
        self.store.best_action(id)
    }

    /// Display values of a state: illegal slots read as `0.0`.
    pub fn action_values(&self, id: StateId) -> Option<[f64; ACTION_COUNT]> {
        self.store.get(id).map(|record| record.display_values())
    }

    /// Train one episode on a fresh world generated from `map`.
    pub fn train_episode<M: MapDescriptor>(
        &mut self,
        alpha: f64,
        gamma: f64,
        epsilon: f64,
        map: &M,
    ) -> Result<EpisodeReport> {
        let params = LearningParams {
            alpha,
            gamma,
            epsilon,
        };
        self.trainer
            .train_episode(&mut self.store, map, params, &mut self.rng)
    }

    /// Take the greedy action on `world`.
    ///
    /// Returns the action performed, or `None` (world untouched) when the
    /// current state has no legal action.
    pub fn act<W: World>(&mut self, world: &mut W) -> Result<Option<Action>> {
        let id = self.store.get_or_create(world)?;
        let action = self
            .store
            .get(id)
            .and_then(|record| Policy::greedy().select(record, 0.0, &mut self.rng));
        if let Some(action) = action {
            translator::apply(world, action);
        }
        Ok(action)
    }

    /// Introspect the world's current observation.
    pub fn inspect<W: World>(&mut self, world: &W) -> Result<StateSummary> {
        let id = self.store.get_or_create(world)?;
        let key = self
            .store
            .get(id)
            .map(|record| record.key().to_string())
            .unwrap_or_default();
        let best = self.best_action(id);
        Ok(StateSummary {
            key,
            values: self.action_values(id).unwrap_or([0.0; ACTION_COUNT]),
            best_action: best.map(|(action, _)| action),
            best_value: best.map(|(_, value)| value),
            table_size: self.count(),
        })
    }

    /// Forget everything learned and restart the random source.
    pub fn reset(&mut self) {
        self.store.clear();
        self.rng = build_rng(self.rng_seed);
    }
}
