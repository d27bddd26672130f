//! Observer port - abstraction for training observation
//!
//! Observers collect progress and metrics during training without coupling
//! the pipeline to any particular output.

use crate::{Result, q_learning::EpisodeReport};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once
/// 2. For each episode: `on_episode_start`, then `on_episode_end`
/// 3. `on_training_end()` - once
pub trait Observer: Send {
    /// Called when training starts with the total number of episodes.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called before an episode runs, with the exploration rate it will use.
    fn on_episode_start(&mut self, _episode: usize, _epsilon: f64) -> Result<()> {
        Ok(())
    }

    /// Called after an episode terminated.
    fn on_episode_end(&mut self, _episode: usize, _report: &EpisodeReport) -> Result<()> {
        Ok(())
    }

    /// Called once when training finishes.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
