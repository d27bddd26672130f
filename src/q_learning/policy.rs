//! Epsilon-greedy action selection

use rand::{Rng, seq::IndexedRandom};

use super::{action::Action, state::StateRecord};

/// Action selector over one state record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Try every legal action of a state once before anything else.
    pub full_exploration: bool,
}

impl Policy {
    pub fn new(full_exploration: bool) -> Self {
        Self { full_exploration }
    }

    /// Inference policy: no exploration bias. Pair with `epsilon = 0`.
    pub fn greedy() -> Self {
        Self::new(false)
    }

    /// Pick an action for `record`.
    ///
    /// Returns `None` when the state has no legal action, which ends the
    /// episode.
    pub fn select<R: Rng>(
        &self,
        record: &StateRecord,
        epsilon: f64,
        rng: &mut R,
    ) -> Option<Action> {
        if self.full_exploration {
            if let Some(action) = record.untried_actions().next() {
                return Some(action);
            }
        }

        if epsilon > 0.0 && rng.random::<f64>() < epsilon {
            let legal: Vec<Action> = record.values().legal_actions().collect();
            return legal.choose(rng).copied();
        }

        record.values().best().map(|(action, _)| action)
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new(true)
    }
}
