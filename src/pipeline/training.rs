//! Multi-map training pipeline

use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::schedule::EpsilonSchedule;
use crate::{
    Error, Result,
    ports::{MapDescriptor, Observer},
    q_learning::{EpisodeReport, QLearningAgent, Termination, TrainerConfig},
    types::GridSize,
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Episodes trained on each map
    pub episodes: usize,

    /// Learning rate α
    pub alpha: f64,

    /// Discount factor γ
    pub gamma: f64,

    /// Exploration rate before the first episode on a map
    pub epsilon_start: f64,

    /// Exploration floor
    pub epsilon_min: f64,

    /// Linear decay factor, see [`EpsilonSchedule`]
    pub epsilon_decay: f64,

    /// Random seed
    pub seed: Option<u64>,

    #[serde(flatten)]
    pub trainer: TrainerConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 10_000,
            alpha: 0.01,
            gamma: 0.99,
            epsilon_start: 0.9,
            epsilon_min: 0.1,
            epsilon_decay: 0.8,
            seed: None,
            trainer: TrainerConfig::default(),
        }
    }
}

impl TrainingConfig {
    /// Reject parameters the trainer cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        if self.episodes < 1 {
            return invalid("episodes must be at least 1".to_string());
        }
        for (name, value) in [
            ("alpha", self.alpha),
            ("gamma", self.gamma),
            ("epsilon_start", self.epsilon_start),
            ("epsilon_min", self.epsilon_min),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return invalid(format!("{name} must lie strictly between 0 and 1, got {value}"));
            }
        }
        if !(self.epsilon_decay > 0.0) {
            return invalid(format!(
                "epsilon_decay must be positive, got {}",
                self.epsilon_decay
            ));
        }
        if self.trainer.max_steps < 1 {
            return invalid("max_steps must be at least 1".to_string());
        }
        Ok(())
    }

    /// Fresh agent for worlds of size `grid`, seeded if a seed is set.
    pub fn build_agent(&self, grid: GridSize) -> QLearningAgent {
        let agent = QLearningAgent::new(grid, self.trainer.clone());
        match self.seed {
            Some(seed) => agent.with_seed(seed),
            None => agent,
        }
    }

    pub fn schedule(&self) -> EpsilonSchedule {
        EpsilonSchedule::new(
            self.epsilon_start,
            self.epsilon_min,
            self.epsilon_decay,
            self.episodes,
        )
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open config file {path:?}"),
            source,
        })?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes played
    pub total_episodes: usize,

    /// Number of maps trained on
    pub maps: usize,

    /// Episodes that ended with the gold in hand
    pub wins: usize,

    /// Episodes that ended in the wumpus
    pub deaths: usize,

    /// Episodes that stopped on a state without legal actions
    pub stalled: usize,

    /// Episodes cut off by the step cap
    pub capped: usize,

    /// Win rate
    pub win_rate: f64,

    /// Death rate
    pub death_rate: f64,

    pub average_steps: f64,

    pub average_reward: f64,

    /// Table size after training
    pub states_learned: usize,

    /// Exploration rate of the last episode
    pub final_epsilon: f64,
}

impl TrainingResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Running counts over episode reports.
#[derive(Debug, Default)]
struct Tally {
    episodes: usize,
    wins: usize,
    deaths: usize,
    stalled: usize,
    capped: usize,
    steps: usize,
    reward: f64,
}

impl Tally {
    fn record(&mut self, report: &EpisodeReport) {
        self.episodes += 1;
        self.steps += report.steps;
        self.reward += report.total_reward;
        match report.termination {
            Termination::GameOver if report.gold => self.wins += 1,
            Termination::GameOver => self.deaths += 1,
            Termination::NoLegalAction => self.stalled += 1,
            Termination::StepCap => self.capped += 1,
        }
    }

    fn finish(self, maps: usize, states_learned: usize, final_epsilon: f64) -> TrainingResult {
        let rate = |count: usize| {
            if self.episodes > 0 {
                count as f64 / self.episodes as f64
            } else {
                0.0
            }
        };
        TrainingResult {
            total_episodes: self.episodes,
            maps,
            wins: self.wins,
            deaths: self.deaths,
            stalled: self.stalled,
            capped: self.capped,
            win_rate: rate(self.wins),
            death_rate: rate(self.deaths),
            average_steps: if self.episodes > 0 {
                self.steps as f64 / self.episodes as f64
            } else {
                0.0
            },
            average_reward: if self.episodes > 0 {
                self.reward / self.episodes as f64
            } else {
                0.0
            },
            states_learned,
            final_epsilon,
        }
    }
}

/// Trains one agent on a sequence of maps, sharing its table throughout.
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train `config.episodes` episodes on each map in turn.
    ///
    /// The exploration schedule restarts for every map.
    ///
    /// # Errors
    ///
    /// Fails before any episode runs if the configuration is invalid or no
    /// map is given; fails mid-run if a map's grid does not match the agent.
    pub fn run<M>(&mut self, agent: &mut QLearningAgent, maps: &[M]) -> Result<TrainingResult>
    where
        M: MapDescriptor + fmt::Display,
    {
        self.config.validate()?;
        if maps.is_empty() {
            return Err(Error::InvalidConfiguration {
                message: "no maps to train on".to_string(),
            });
        }

        let total = self.config.episodes * maps.len();
        for observer in &mut self.observers {
            observer.on_training_start(total)?;
        }
        info!(
            episodes = self.config.episodes,
            maps = maps.len(),
            alpha = self.config.alpha,
            gamma = self.config.gamma,
            "training started"
        );

        let mut schedule = self.config.schedule();
        let mut tally = Tally::default();
        let mut episode = 0;

        for (map_index, map) in maps.iter().enumerate() {
            schedule.reset();
            info!(map = %map, index = map_index + 1, of = maps.len(), "training on map");

            for _ in 0..self.config.episodes {
                let epsilon = schedule.next_epsilon();
                episode += 1;
                for observer in &mut self.observers {
                    observer.on_episode_start(episode, epsilon)?;
                }

                let report =
                    agent.train_episode(self.config.alpha, self.config.gamma, epsilon, map)?;
                tally.record(&report);

                for observer in &mut self.observers {
                    observer.on_episode_end(episode, &report)?;
                }
            }

            info!(
                map = %map,
                epsilon = schedule.current(),
                states = agent.count(),
                "finished map"
            );
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = tally.finish(maps.len(), agent.count(), schedule.current());
        info!(
            episodes = result.total_episodes,
            wins = result.wins,
            states = result.states_learned,
            "training finished"
        );
        Ok(result)
    }
}
