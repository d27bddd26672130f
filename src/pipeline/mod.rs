//! Training and evaluation pipeline abstractions
//!
//! This module provides composable pipelines for:
//! - Training one agent across a sequence of maps
//! - Decaying exploration linearly per map
//! - Playing greedy games with a trained agent
//! - Recording observations during training

pub mod evaluation;
pub mod observers;
pub mod schedule;
pub mod training;

pub use evaluation::{EvaluationSummary, PlayOutcome, evaluate, play};
// Re-export observer implementations (adapters)
pub use observers::{
    EpisodeObservation, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
};
pub use schedule::EpsilonSchedule;
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
