//! Tabular Q-learning for the wumpus world
//!
//! The learned unit is a [`StateRecord`]: an equivalence class of world
//! observations (player flags, position, explored tile percepts) plus one
//! value per abstract [`Action`]. Records live in a [`ValueStore`] that is
//! filled lazily while a [`Trainer`] plays episodes.
//!
//! ## Pipeline of one step
//!
//! 1. The encoder turns the world into a key; the store returns or creates
//!    the matching record, with illegal actions masked by the legality filter.
//! 2. The [`Policy`] picks an action (untried first, then ε-greedy).
//! 3. The translator turns it into native turns and moves while the
//!    [`RewardModel`] scores the transition.
//! 4. The trainer applies `Q ← (1-α)·Q + α·(r + γ·max Q')`.
//!
//! ## Usage Example
//!
//! ```no_run
//! use wumpus::{
//!     adapters::WorldMap,
//!     q_learning::{QLearningAgent, TrainerConfig},
//!     types::GridSize,
//! };
//!
//! let map = WorldMap::premade().remove(0);
//! let mut agent = QLearningAgent::new(GridSize::STANDARD, TrainerConfig::default()).with_seed(7);
//! for _ in 0..100 {
//!     agent.train_episode(0.1, 0.99, 0.3, &map)?;
//! }
//! println!("learned {} states", agent.count());
//! # Ok::<(), wumpus::Error>(())
//! ```

pub mod action;
pub mod agent;
pub mod codec;
pub mod encoder;
pub mod legality;
pub mod policy;
pub mod reward;
pub mod serialization;
pub mod state;
pub mod table;
pub mod trainer;
pub mod translator;

#[cfg(test)]
pub(crate) mod testing;

// Public re-exports
pub use action::{ACTION_COUNT, Action, ActionValues, DEFAULT_VALUE, ILLEGAL_VALUE};
pub use agent::{QLearningAgent, StateSummary};
pub use policy::Policy;
pub use reward::{RewardConfig, RewardModel};
pub use serialization::{SavedAgent, TrainingMetadata};
pub use state::{SpecialFlags, StateKey, StateRecord, TileFlags};
pub use table::{StateId, ValueStore};
pub use trainer::{
    EpisodeReport, LearningParams, Termination, Trainer, TrainerConfig, Transition, UpdateRule,
};
