//! Greedy play with a trained agent

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Result,
    ports::{MapDescriptor, World},
    q_learning::{Action, QLearningAgent, Termination},
};

/// One greedy game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayOutcome {
    pub map: String,
    pub steps: usize,
    pub score: i32,
    pub gold: bool,
    pub termination: Termination,
    /// Actions taken, in order.
    pub actions: Vec<Action>,
}

impl PlayOutcome {
    /// Game ended without the gold, i.e. in the wumpus.
    pub fn died(&self) -> bool {
        self.termination == Termination::GameOver && !self.gold
    }
}

/// Greedy results over a set of maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub games: usize,
    pub wins: usize,
    pub deaths: usize,
    pub win_rate: f64,
    pub average_score: f64,
    pub average_steps: f64,
    pub outcomes: Vec<PlayOutcome>,
}

impl EvaluationSummary {
    pub fn new(outcomes: Vec<PlayOutcome>) -> Self {
        let games = outcomes.len();
        let wins = outcomes.iter().filter(|outcome| outcome.gold).count();
        let deaths = outcomes.iter().filter(|outcome| outcome.died()).count();
        let mean = |total: f64| if games > 0 { total / games as f64 } else { 0.0 };

        Self {
            games,
            wins,
            deaths,
            win_rate: mean(wins as f64),
            average_score: mean(outcomes.iter().map(|o| f64::from(o.score)).sum()),
            average_steps: mean(outcomes.iter().map(|o| o.steps as f64).sum()),
            outcomes,
        }
    }
}

/// Play one game on a fresh world from `map`, always taking the best action.
///
/// Stops on game over, on a state without legal actions, or after
/// `max_steps` actions.
pub fn play<M>(agent: &mut QLearningAgent, map: &M, max_steps: usize) -> Result<PlayOutcome>
where
    M: MapDescriptor + fmt::Display,
{
    let mut world = map.generate_world();
    let mut actions = Vec::new();

    let termination = loop {
        if world.is_game_over() {
            break Termination::GameOver;
        }
        if actions.len() >= max_steps {
            break Termination::StepCap;
        }
        match agent.act(&mut world)? {
            Some(action) => actions.push(action),
            None => break Termination::NoLegalAction,
        }
    };

    debug!(map = %map, steps = actions.len(), termination = ?termination, "greedy game finished");
    Ok(PlayOutcome {
        map: map.to_string(),
        steps: actions.len(),
        score: world.score(),
        gold: world.has_gold(),
        termination,
        actions,
    })
}

/// Play one greedy game on every map.
pub fn evaluate<M>(
    agent: &mut QLearningAgent,
    maps: &[M],
    max_steps: usize,
) -> Result<EvaluationSummary>
where
    M: MapDescriptor + fmt::Display,
{
    let outcomes = maps
        .iter()
        .map(|map| play(agent, map, max_steps))
        .collect::<Result<Vec<_>>>()?;
    Ok(EvaluationSummary::new(outcomes))
}
