//! Train command - Train a Q-learning agent on a set of maps

use std::{
    fs::File,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;
use tracing::info;

use crate::{
    adapters::SnapshotFileRepository,
    cli::{
        config::{MapArgs, TrainingOverrides, common_grid, load_training_config},
        output::{format_number, format_percent, print_kv, print_section, print_subsection},
    },
    pipeline::{
        EvaluationSummary, JsonlObserver, ProgressObserver, TrainingConfig, TrainingPipeline,
        TrainingResult, evaluate,
    },
    ports::TableRepository,
    q_learning::{SavedAgent, TrainingMetadata},
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingResult,
    evaluation: Option<&'a EvaluationSummary>,
    config: &'a TrainingConfig,
    maps: Vec<String>,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name: treat as a directory.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

fn timestamp() -> Option<String> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|elapsed| elapsed.as_secs().to_string())
}

#[derive(Parser, Debug)]
#[command(about = "Train a Q-learning agent")]
pub struct TrainArgs {
    /// JSON training configuration (missing fields take defaults)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: TrainingOverrides,

    #[command(flatten)]
    pub maps: MapArgs,

    /// Output file for the trained agent
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Output file for a bare value table snapshot
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Optional file for JSONL episode observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Play one greedy game per map after training
    #[arg(long)]
    pub evaluate: bool,

    /// Hide the progress bar
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Execute the train command
pub fn execute(args: TrainArgs) -> Result<()> {
    let config = load_training_config(args.config.as_deref(), &args.overrides)?;
    let maps = args.maps.resolve()?;
    let map_names: Vec<String> = maps.iter().map(ToString::to_string).collect();

    let grid = common_grid(&maps)?;
    let mut agent = config.build_agent(grid);

    let mut pipeline = TrainingPipeline::new(config.clone());
    if !args.quiet {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    print_section("Training");
    print_kv("Maps", &maps.len().to_string());
    print_kv("Episodes per map", &format_number(config.episodes));
    print_kv("Alpha", &config.alpha.to_string());
    print_kv("Gamma", &config.gamma.to_string());
    print_kv(
        "Epsilon",
        &format!(
            "{} → {} (decay {})",
            config.epsilon_start, config.epsilon_min, config.epsilon_decay
        ),
    );
    print_kv("Update rule", &format!("{:?}", config.trainer.update_rule));
    if let Some(seed) = config.seed {
        print_kv("Seed", &seed.to_string());
    }

    let result = pipeline.run(&mut agent, &maps)?;

    print_subsection("Results");
    print_kv("Episodes", &format_number(result.total_episodes));
    print_kv(
        "Wins",
        &format!("{} ({})", result.wins, format_percent(result.win_rate)),
    );
    print_kv(
        "Deaths",
        &format!("{} ({})", result.deaths, format_percent(result.death_rate)),
    );
    print_kv("Stalled", &result.stalled.to_string());
    print_kv("Capped", &result.capped.to_string());
    print_kv("Average steps", &format!("{:.2}", result.average_steps));
    print_kv("Average reward", &format!("{:.2}", result.average_reward));
    print_kv("States learned", &format_number(result.states_learned));

    // Saved before evaluation, which adds any newly seen states to the table.
    if let Some(path) = &args.output {
        let metadata = TrainingMetadata {
            episodes_trained: Some(result.total_episodes),
            maps: map_names.clone(),
            seed: config.seed,
            saved_at: timestamp(),
        };
        SavedAgent::from_agent(&agent, metadata)?.save_to_file(path)?;
        info!(path = %path.display(), "saved agent");
        print_kv("Agent saved to", &path.display().to_string());
    }
    if let Some(path) = &args.snapshot {
        SnapshotFileRepository::new().save(agent.store(), path)?;
        print_kv("Snapshot saved to", &path.display().to_string());
    }

    let evaluation = if args.evaluate {
        let summary = evaluate(&mut agent, &maps, config.trainer.max_steps)?;
        print_subsection("Greedy evaluation");
        print_kv(
            "Wins",
            &format!("{}/{} ({})", summary.wins, summary.games, format_percent(summary.win_rate)),
        );
        print_kv("Deaths", &summary.deaths.to_string());
        print_kv("Average score", &format!("{:.1}", summary.average_score));
        Some(summary)
    } else {
        None
    };

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let file = File::create(&path)
            .with_context(|| format!("Failed to create summary file {}", path.display()))?;
        let summary = TrainingSummaryFile {
            training: &result,
            evaluation: evaluation.as_ref(),
            config: &config,
            maps: map_names,
        };
        to_writer_pretty(file, &summary).context("Failed to write summary")?;
        print_kv("Summary written to", &path.display().to_string());
    }

    Ok(())
}
