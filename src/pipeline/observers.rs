//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::Observer,
    q_learning::{EpisodeReport, Termination},
};

/// Observation of a single training episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeObservation {
    /// Episode number, counted from 1 across all maps
    pub episode: usize,
    /// Exploration rate used
    pub epsilon: f64,
    #[serde(flatten)]
    pub report: EpisodeReport,
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    deaths: usize,
    epsilon: f64,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            deaths: 0,
            epsilon: 0.0,
        }
    }

    fn message(&self) -> String {
        format!("{} deaths:{} ε:{:.3}", self.wins, self.deaths, self.epsilon)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (gold:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_start(&mut self, _episode: usize, epsilon: f64) -> Result<()> {
        self.epsilon = epsilon;
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, report: &EpisodeReport) -> Result<()> {
        match report.termination {
            Termination::GameOver if report.gold => self.wins += 1,
            Termination::GameOver => self.deaths += 1,
            Termination::NoLegalAction | Termination::StepCap => {}
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64);
            if episode % 64 == 0 {
                pb.set_message(self.message());
            }
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
pub struct MetricsObserver {
    total_episodes: usize,
    wins: usize,
    deaths: usize,
    step_counts: Vec<usize>,
    rewards: Vec<f64>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            total_episodes: 0,
            wins: 0,
            deaths: 0,
            step_counts: Vec::new(),
            rewards: Vec::new(),
        }
    }

    /// Get current win rate
    pub fn win_rate(&self) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            self.wins as f64 / self.total_episodes as f64
        }
    }

    /// Get current death rate
    pub fn death_rate(&self) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            self.deaths as f64 / self.total_episodes as f64
        }
    }

    /// Get average episode length
    pub fn avg_episode_length(&self) -> f64 {
        if self.step_counts.is_empty() {
            0.0
        } else {
            self.step_counts.iter().sum::<usize>() as f64 / self.step_counts.len() as f64
        }
    }

    /// Mean total reward over the last `window` episodes.
    pub fn recent_reward(&self, window: usize) -> f64 {
        let start = self.rewards.len().saturating_sub(window);
        let recent = &self.rewards[start..];
        if recent.is_empty() {
            0.0
        } else {
            recent.iter().sum::<f64>() / recent.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_episodes: self.total_episodes,
            wins: self.wins,
            deaths: self.deaths,
            win_rate: self.win_rate(),
            death_rate: self.death_rate(),
            avg_episode_length: self.avg_episode_length(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub wins: usize,
    pub deaths: usize,
    pub win_rate: f64,
    pub death_rate: f64,
    pub avg_episode_length: f64,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, _episode: usize, report: &EpisodeReport) -> Result<()> {
        self.total_episodes += 1;
        match report.termination {
            Termination::GameOver if report.gold => self.wins += 1,
            Termination::GameOver => self.deaths += 1,
            Termination::NoLegalAction | Termination::StepCap => {}
        }
        self.step_counts.push(report.steps);
        self.rewards.push(report.total_reward);
        Ok(())
    }
}

/// JSONL observer - Exports one episode per line
pub struct JsonlObserver {
    writer: BufWriter<File>,
    epsilon: f64,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            epsilon: 0.0,
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize, epsilon: f64) -> Result<()> {
        self.epsilon = epsilon;
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, report: &EpisodeReport) -> Result<()> {
        let observation = EpisodeObservation {
            episode,
            epsilon: self.epsilon,
            report: report.clone(),
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
