//! Reward model: scores an action by the world transition it caused

use serde::{Deserialize, Serialize};

use super::{action::Action, translator};
use crate::ports::World;

/// Reward magnitudes.
///
/// Only the signs and the precedence in [`RewardModel::score`] are
/// behavioural; the magnitudes are tunable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Gold is in hand.
    pub gold: f64,
    /// Useless grab, climb, bump, idling in a pit, or shooting without arrow.
    pub waste_time: f64,
    pub climb_out: f64,
    /// Walked into the wumpus.
    pub wumpus: f64,
    /// Fell into a pit.
    pub pit: f64,
    pub missed_arrow: f64,
    pub wumpus_kill: f64,
    /// Stepped onto an unconfirmed tile while a safe option still existed.
    pub bad_risk: f64,
    pub exploration: f64,
    pub neutral: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            gold: 100.0,
            waste_time: -100.0,
            climb_out: 20.0,
            wumpus: -200.0,
            pit: -100.0,
            missed_arrow: -100.0,
            wumpus_kill: 50.0,
            bad_risk: -50.0,
            exploration: 10.0,
            neutral: 0.0,
        }
    }
}

/// Turns a transition into a scalar reward.
#[derive(Debug, Clone, Default)]
pub struct RewardModel {
    config: RewardConfig,
}

impl RewardModel {
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Perform `action` on `world` and return its reward.
    pub fn observe<W: World>(&self, world: &mut W, action: Action) -> f64 {
        let before = world.clone();
        translator::apply(world, action);
        self.score(&before, world, action)
    }

    /// Reward for the transition `before -> after` caused by `action`.
    ///
    /// The first matching rule wins.
    pub fn score<W: World>(&self, before: &W, after: &W, action: Action) -> f64 {
        let rewards = &self.config;
        let was_in_pit = before.is_in_pit();
        let is_in_pit = after.is_in_pit();
        let old_position = before.player_position();
        let new_position = after.player_position();

        if after.has_gold() {
            return rewards.gold;
        }
        if action == Action::Grab {
            return rewards.waste_time;
        }
        if was_in_pit {
            return if is_in_pit {
                rewards.waste_time
            } else {
                rewards.climb_out
            };
        }
        if action == Action::Climb {
            return rewards.waste_time;
        }
        if after.has_wumpus(new_position) {
            return rewards.wumpus;
        }
        if is_in_pit {
            return rewards.pit;
        }
        if action == Action::Shoot {
            if !before.has_arrow() {
                return rewards.waste_time;
            }
            let stench_before = before.has_stench(old_position);
            let stench_after = after.has_stench(new_position);
            return if stench_before && !stench_after {
                rewards.wumpus_kill
            } else {
                rewards.missed_arrow
            };
        }
        if old_position == new_position {
            return rewards.waste_time;
        }
        if !before.is_safe_to_take_risks() && !before.is_confirmed_safe(new_position) {
            return rewards.bad_risk;
        }
        if before.is_unexplored(new_position) {
            return rewards.exploration;
        }
        rewards.neutral
    }
}
