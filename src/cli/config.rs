//! Shared configuration for CLI commands: map selection and training overrides

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, ValueEnum};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    adapters::WorldMap,
    pipeline::TrainingConfig,
    q_learning::{Action, UpdateRule},
    types::GridSize,
};

/// Which maps a command runs on
#[derive(Args, Debug, Clone)]
pub struct MapArgs {
    /// JSON file holding an array of maps
    #[arg(long, conflicts_with_all = ["random", "premade"])]
    pub maps: Option<PathBuf>,

    /// Generate this many random maps instead of using the premade set
    #[arg(long, conflicts_with = "premade")]
    pub random: Option<usize>,

    /// Pits per random map
    #[arg(long, default_value_t = 3)]
    pub pits: usize,

    /// Side length of random maps
    #[arg(long, default_value_t = 4)]
    pub size: u8,

    /// Seed for random map generation
    #[arg(long)]
    pub map_seed: Option<u64>,

    /// Premade maps to use, numbered from 1 (default: all of them)
    #[arg(long, value_delimiter = ',')]
    pub premade: Vec<usize>,
}

impl MapArgs {
    /// Build the selected map list. Never returns an empty list.
    pub fn resolve(&self) -> Result<Vec<WorldMap>> {
        let maps = if let Some(path) = &self.maps {
            WorldMap::load_all(path)
                .with_context(|| format!("Failed to load maps from {}", path.display()))?
        } else if let Some(count) = self.random {
            let grid = GridSize::new(self.size, self.size)?;
            let mut rng = match self.map_seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_rng(&mut rand::rng()),
            };
            (0..count)
                .map(|index| {
                    WorldMap::random(grid, self.pits, &mut rng).map(|mut map| {
                        map.name = Some(format!("random-{}", index + 1));
                        map
                    })
                })
                .collect::<crate::Result<Vec<_>>>()?
        } else {
            let premade = WorldMap::premade();
            if self.premade.is_empty() {
                premade
            } else {
                self.premade
                    .iter()
                    .map(|&number| {
                        number
                            .checked_sub(1)
                            .and_then(|index| premade.get(index))
                            .cloned()
                            .ok_or_else(|| {
                                anyhow!(
                                    "No premade map {number} (expected 1..={})",
                                    premade.len()
                                )
                            })
                    })
                    .collect::<Result<Vec<_>>>()?
            }
        };

        if maps.is_empty() {
            bail!("No maps selected");
        }
        Ok(maps)
    }
}

/// The grid size shared by every map.
///
/// Fails on an empty list or when two maps differ in size, naming the first
/// map that does not match.
pub fn common_grid(maps: &[WorldMap]) -> Result<GridSize> {
    let first = maps.first().ok_or_else(|| anyhow!("No maps selected"))?;
    if let Some(other) = maps.iter().find(|map| map.size != first.size) {
        bail!(
            "Map '{other}' is {} but '{first}' is {}; all maps must share one grid size",
            other.size,
            first.size
        );
    }
    Ok(first.size)
}

/// Update rule as named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UpdateRuleArg {
    /// Blend every step into the current value
    Blend,
    /// Overwrite untried slots with the raw bootstrap target
    BootstrapFirst,
}

impl From<UpdateRuleArg> for UpdateRule {
    fn from(arg: UpdateRuleArg) -> Self {
        match arg {
            UpdateRuleArg::Blend => UpdateRule::Blend,
            UpdateRuleArg::BootstrapFirst => UpdateRule::BootstrapFirst,
        }
    }
}

/// Command-line overrides for a [`TrainingConfig`]
#[derive(Args, Debug, Clone, Default)]
pub struct TrainingOverrides {
    /// Episodes per map
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Learning rate α
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor γ
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Exploration rate at the start of each map
    #[arg(long)]
    pub epsilon_start: Option<f64>,

    /// Exploration floor
    #[arg(long)]
    pub epsilon_min: Option<f64>,

    /// Linear decay factor
    #[arg(long)]
    pub epsilon_decay: Option<f64>,

    /// Step cap per episode
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Value update rule
    #[arg(long, value_enum)]
    pub update_rule: Option<UpdateRuleArg>,

    /// Disable trying every untried action before exploiting
    #[arg(long)]
    pub no_full_exploration: bool,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

impl TrainingOverrides {
    pub fn apply(&self, config: &mut TrainingConfig) {
        if let Some(episodes) = self.episodes {
            config.episodes = episodes;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        if let Some(gamma) = self.gamma {
            config.gamma = gamma;
        }
        if let Some(epsilon) = self.epsilon_start {
            config.epsilon_start = epsilon;
        }
        if let Some(epsilon) = self.epsilon_min {
            config.epsilon_min = epsilon;
        }
        if let Some(decay) = self.epsilon_decay {
            config.epsilon_decay = decay;
        }
        if let Some(max_steps) = self.max_steps {
            config.trainer.max_steps = max_steps;
        }
        if let Some(rule) = self.update_rule {
            config.trainer.update_rule = rule.into();
        }
        if self.no_full_exploration {
            config.trainer.full_exploration = false;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

/// Load a config file (or take defaults), apply overrides and validate.
pub fn load_training_config(
    path: Option<&Path>,
    overrides: &TrainingOverrides,
) -> Result<TrainingConfig> {
    let mut config = match path {
        Some(path) => TrainingConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => TrainingConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Parse an action name such as `move-up` or `grab`.
pub fn parse_action(value: &str) -> Result<Action> {
    let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
    let short = match normalized.as_str() {
        "up" | "u" => "move-up",
        "right" | "r" => "move-right",
        "down" | "d" => "move-down",
        "left" | "l" => "move-left",
        other => other,
    };
    Action::ALL
        .into_iter()
        .find(|action| action.name() == short)
        .ok_or_else(|| {
            anyhow!(
                "Invalid action '{value}' (expected one of: up, right, down, left, shoot, grab, climb)"
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_args() -> MapArgs {
        MapArgs {
            maps: None,
            random: None,
            pits: 3,
            size: 4,
            map_seed: None,
            premade: Vec::new(),
        }
    }

    #[test]
    fn test_default_selection_is_all_premade() {
        let maps = map_args().resolve().unwrap();
        assert_eq!(maps, WorldMap::premade());
    }

    #[test]
    fn test_premade_selection_by_number() {
        let args = MapArgs {
            premade: vec![2, 1],
            ..map_args()
        };
        let maps = args.resolve().unwrap();
        assert_eq!(maps[0].name.as_deref(), Some("premade-2"));
        assert_eq!(maps[1].name.as_deref(), Some("premade-1"));

        let args = MapArgs {
            premade: vec![0],
            ..map_args()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_seeded_random_maps_repeat() {
        let args = MapArgs {
            random: Some(3),
            map_seed: Some(7),
            ..map_args()
        };
        let first = args.resolve().unwrap();
        let second = args.resolve().unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert_eq!(first[2].name.as_deref(), Some("random-3"));
    }

    #[test]
    fn test_zero_random_maps_rejected() {
        let args = MapArgs {
            random: Some(0),
            ..map_args()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_common_grid_rejects_mixed_sizes() {
        let mut maps = WorldMap::premade();
        assert_eq!(common_grid(&maps).unwrap(), GridSize::STANDARD);

        let mut rng = StdRng::seed_from_u64(1);
        let mut small = WorldMap::random(GridSize::new(3, 3).unwrap(), 1, &mut rng).unwrap();
        small.name = Some("small".to_string());
        maps.push(small);
        let message = common_grid(&maps).unwrap_err().to_string();
        assert!(message.contains("small"), "{message}");

        assert!(common_grid(&[]).is_err());
    }

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let overrides = TrainingOverrides {
            episodes: Some(5),
            update_rule: Some(UpdateRuleArg::BootstrapFirst),
            no_full_exploration: true,
            ..TrainingOverrides::default()
        };
        let config = load_training_config(None, &overrides).unwrap();
        assert_eq!(config.episodes, 5);
        assert_eq!(config.trainer.update_rule, UpdateRule::BootstrapFirst);
        assert!(!config.trainer.full_exploration);
        assert_eq!(config.alpha, TrainingConfig::default().alpha);
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let overrides = TrainingOverrides {
            alpha: Some(1.5),
            ..TrainingOverrides::default()
        };
        assert!(load_training_config(None, &overrides).is_err());
    }

    #[test]
    fn test_parse_action() {
        assert_eq!(parse_action("up").unwrap(), Action::MoveUp);
        assert_eq!(parse_action("MOVE_LEFT").unwrap(), Action::MoveLeft);
        assert_eq!(parse_action("grab").unwrap(), Action::Grab);
        assert!(parse_action("jump").is_err());
    }
}
