//! Q-learning trainer: single steps and whole episodes
//!
//! One step is select, act, observe, update. An episode repeats steps on a
//! fresh world until the world reports game over, the policy finds no legal
//! action, or the step cap is reached.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    action::Action,
    policy::Policy,
    reward::{RewardConfig, RewardModel},
    table::{StateId, ValueStore},
};
use crate::{
    Result,
    ports::{MapDescriptor, World},
};

/// How a slot's value changes on update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateRule {
    /// `Q ← (1-α)·Q + α·(r + γ·max Q')` on every update.
    #[default]
    Blend,
    /// First update of a slot stores the raw reward, later ones blend.
    BootstrapFirst,
}

/// Fixed per-run trainer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Hard cap on steps per episode.
    pub max_steps: usize,
    pub full_exploration: bool,
    pub update_rule: UpdateRule,
    pub rewards: RewardConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_steps: 10_000,
            full_exploration: true,
            update_rule: UpdateRule::Blend,
            rewards: RewardConfig::default(),
        }
    }
}

/// Hyperparameters of one episode. Validated by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningParams {
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
    /// Exploration rate ε
    pub epsilon: f64,
}

/// Why an episode stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    GameOver,
    NoLegalAction,
    StepCap,
}

/// Outcome of one episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub steps: usize,
    pub total_reward: f64,
    pub termination: Termination,
    /// Final world score.
    pub score: i32,
    /// Whether the player ended holding the gold.
    pub gold: bool,
}

/// One applied update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: StateId,
    pub action: Action,
    pub reward: f64,
    pub next_state: StateId,
    /// Value stored in the updated slot.
    pub value: f64,
}

/// Q-learning update: `(1-α)·current + α·(reward + γ·future_max)`.
pub fn q_update(current: f64, reward: f64, alpha: f64, gamma: f64, future_max: f64) -> f64 {
    (1.0 - alpha) * current + alpha * (reward + gamma * future_max)
}

/// Drives steps and episodes against an explicitly passed value store.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainerConfig,
    rewards: RewardModel,
    policy: Policy,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self {
            rewards: RewardModel::new(config.rewards.clone()),
            policy: Policy::new(config.full_exploration),
            config,
        }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Run one select-act-observe-update step on a live world.
    ///
    /// Returns `None` without touching the world when the current state has
    /// no legal action.
    pub fn step<W: World, R: Rng>(
        &self,
        store: &mut ValueStore,
        world: &mut W,
        params: LearningParams,
        rng: &mut R,
    ) -> Result<Option<Transition>> {
        let state = store.get_or_create(world)?;
        let Some(action) = store
            .get(state)
            .and_then(|record| self.policy.select(record, params.epsilon, rng))
        else {
            return Ok(None);
        };

        let reward = self.rewards.observe(world, action);
        let next_state = store.get_or_create(world)?;
        let future_max = store
            .get(next_state)
            .map_or(0.0, |record| record.values().max_value());

        let rule = self.config.update_rule;
        let value = store.update(state, |record| {
            let value = match rule {
                UpdateRule::BootstrapFirst if !record.is_updated(action) => reward,
                _ => q_update(
                    record.values().get(action),
                    reward,
                    params.alpha,
                    params.gamma,
                    future_max,
                ),
            };
            record.set_value(action, value);
            value
        });

        Ok(value.map(|value| Transition {
            state,
            action,
            reward,
            next_state,
            value,
        }))
    }

    /// Run steps on `world` until it terminates.
    pub fn run_episode<W: World, R: Rng>(
        &self,
        store: &mut ValueStore,
        world: &mut W,
        params: LearningParams,
        rng: &mut R,
    ) -> Result<EpisodeReport> {
        let mut steps = 0;
        let mut total_reward = 0.0;

        let termination = loop {
            if world.is_game_over() {
                break Termination::GameOver;
            }
            if steps >= self.config.max_steps {
                break Termination::StepCap;
            }
            match self.step(store, world, params, rng)? {
                Some(transition) => {
                    steps += 1;
                    total_reward += transition.reward;
                }
                None => break Termination::NoLegalAction,
            }
        };

        let report = EpisodeReport {
            steps,
            total_reward,
            termination,
            score: world.score(),
            gold: world.has_gold(),
        };
        debug!(
            steps,
            total_reward,
            termination = ?termination,
            score = report.score,
            states = store.count(),
            "episode finished"
        );
        Ok(report)
    }

    /// Generate a fresh world from `map` and train one episode on it.
    pub fn train_episode<M: MapDescriptor, R: Rng>(
        &self,
        store: &mut ValueStore,
        map: &M,
        params: LearningParams,
        rng: &mut R,
    ) -> Result<EpisodeReport> {
        let mut world = map.generate_world();
        self.run_episode(store, &mut world, params, rng)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        q_learning::testing::ScriptedWorld,
        types::{GridSize, Position},
    };

    #[derive(Debug)]
    struct FixedMap(ScriptedWorld);

    impl MapDescriptor for FixedMap {
        type World = ScriptedWorld;

        fn generate_world(&self) -> ScriptedWorld {
            self.0.clone()
        }
    }

    fn params() -> LearningParams {
        LearningParams {
            alpha: 0.5,
            gamma: 0.9,
            epsilon: 0.2,
        }
    }

    /// 1x1 world whose only legal action is grabbing the gold underfoot.
    fn gold_only_world() -> ScriptedWorld {
        let mut world = ScriptedWorld::new();
        world.grid = GridSize::new(1, 1).unwrap();
        world.arrow = false;
        world.glitter.insert(Position::START);
        world
    }

    #[test]
    fn test_update_lands_alpha_of_the_way_to_target() {
        for (current, reward, alpha, gamma, future) in [
            (0.0, 10.0, 0.1, 0.9, 5.0),
            (-40.0, -100.0, 0.7, 0.5, 0.0),
            (12.5, 0.0, 0.01, 0.99, -3.0),
        ] {
            let target = reward + gamma * future;
            let updated = q_update(current, reward, alpha, gamma, future);
            let expected = current + alpha * (target - current);
            assert!((updated - expected).abs() < 1e-9);
            let (low, high) = if current < target {
                (current, target)
            } else {
                (target, current)
            };
            assert!(updated >= low - 1e-9 && updated <= high + 1e-9);
        }
    }

    #[test]
    fn test_episode_respects_step_cap() {
        let trainer = Trainer::new(TrainerConfig {
            max_steps: 25,
            ..TrainerConfig::default()
        });
        let mut store = ValueStore::new(GridSize::STANDARD);
        let mut rng = StdRng::seed_from_u64(5);

        let report = trainer
            .train_episode(&mut store, &FixedMap(ScriptedWorld::new()), params(), &mut rng)
            .unwrap();
        assert_eq!(report.termination, Termination::StepCap);
        assert_eq!(report.steps, 25);
        assert!(store.count() > 1);
    }

    #[test]
    fn test_no_legal_action_ends_episode() {
        let mut world = ScriptedWorld::new();
        world.grid = GridSize::new(1, 1).unwrap();
        world.arrow = false;

        let trainer = Trainer::default();
        let mut store = ValueStore::new(world.grid);
        let mut rng = StdRng::seed_from_u64(5);
        let report = trainer
            .run_episode(&mut store, &mut world, params(), &mut rng)
            .unwrap();

        assert_eq!(report.termination, Termination::NoLegalAction);
        assert_eq!(report.steps, 0);
        assert!(world.performed.is_empty());
    }

    #[test]
    fn test_blend_update_on_winning_grab() {
        let mut world = gold_only_world();
        let trainer = Trainer::default();
        let mut store = ValueStore::new(world.grid);
        let mut rng = StdRng::seed_from_u64(9);

        let report = trainer
            .run_episode(&mut store, &mut world, params(), &mut rng)
            .unwrap();
        assert_eq!(report.termination, Termination::GameOver);
        assert_eq!(report.steps, 1);
        assert_eq!(report.total_reward, 100.0);
        assert!(report.gold);

        let start = store.find(&gold_only_world()).unwrap();
        assert_eq!(store.get(start).unwrap().values().get(Action::Grab), 50.0);
    }

    #[test]
    fn test_bootstrap_first_assigns_reward() {
        let trainer = Trainer::new(TrainerConfig {
            update_rule: UpdateRule::BootstrapFirst,
            ..TrainerConfig::default()
        });
        let mut store = ValueStore::new(GridSize::new(1, 1).unwrap());
        let mut rng = StdRng::seed_from_u64(9);

        let mut world = gold_only_world();
        let transition = trainer
            .step(&mut store, &mut world, params(), &mut rng)
            .unwrap()
            .unwrap();
        assert_eq!(transition.action, Action::Grab);
        assert_eq!(transition.value, 100.0);

        let mut world = gold_only_world();
        let transition = trainer
            .step(&mut store, &mut world, params(), &mut rng)
            .unwrap()
            .unwrap();
        assert_eq!(transition.value, 100.0);
    }

    #[test]
    fn test_steps_share_records_across_episodes() {
        let trainer = Trainer::new(TrainerConfig {
            max_steps: 10,
            ..TrainerConfig::default()
        });
        let mut store = ValueStore::new(GridSize::STANDARD);
        let mut rng = StdRng::seed_from_u64(11);
        let map = FixedMap(ScriptedWorld::new());

        trainer
            .train_episode(&mut store, &map, params(), &mut rng)
            .unwrap();
        let after_first = store.count();
        trainer
            .train_episode(&mut store, &map, params(), &mut rng)
            .unwrap();
        assert!(store.count() >= after_first);

        let start = store.find(&ScriptedWorld::new()).unwrap();
        assert!(store.get(start).unwrap().is_updated(Action::MoveUp));
    }
}
