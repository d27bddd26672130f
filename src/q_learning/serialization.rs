//! Saved agents: trainer settings, training metadata and a table snapshot.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::{
    q_learning::{agent::QLearningAgent, table::ValueStore, trainer::TrainerConfig},
    types::GridSize,
};

/// Metadata about the training process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Number of episodes trained
    pub episodes_trained: Option<usize>,
    /// Names of the maps trained on
    pub maps: Vec<String>,
    /// Random seed used (if any)
    pub seed: Option<u64>,
    /// Timestamp when saved
    pub saved_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAgent {
    pub version: u32,
    pub grid: GridSize,
    pub config: TrainerConfig,
    pub metadata: TrainingMetadata,
    /// Binary value table, see [`crate::q_learning::codec`].
    snapshot: Vec<u8>,
}

impl SavedAgent {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &QLearningAgent, metadata: TrainingMetadata) -> Result<Self> {
        let snapshot = agent
            .store()
            .snapshot()
            .context("Failed to snapshot value table")?;
        Ok(Self {
            version: Self::VERSION,
            grid: agent.grid(),
            config: agent.config().clone(),
            metadata,
            snapshot,
        })
    }

    pub fn to_agent(&self) -> Result<QLearningAgent> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported agent save format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }

        let mut store = ValueStore::new(self.grid);
        store
            .restore(&self.snapshot)
            .context("Failed to restore value table")?;
        let agent = QLearningAgent::from_store(store, self.config.clone());
        Ok(match self.metadata.seed {
            Some(seed) => agent.with_seed(seed),
            None => agent,
        })
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).context("Failed to serialize agent")?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).context("Failed to deserialize agent")
    }
}
