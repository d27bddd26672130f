//! Play command - Greedy games with a trained agent

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::{
    cli::{
        config::{MapArgs, common_grid},
        output::{format_percent, print_kv, print_section, print_subsection},
    },
    pipeline::evaluate,
    q_learning::SavedAgent,
};

#[derive(Parser, Debug)]
#[command(about = "Play greedy games with a trained agent")]
pub struct PlayArgs {
    /// Path to a saved agent
    pub agent: PathBuf,

    #[command(flatten)]
    pub maps: MapArgs,

    /// Step cap per game (defaults to the agent's training cap)
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Print the actions taken in each game
    #[arg(long, short = 't')]
    pub trace: bool,

    /// Export results to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Execute the play command
pub fn execute(args: PlayArgs) -> Result<()> {
    let saved = SavedAgent::load_from_file(&args.agent)?;
    let mut agent = saved.to_agent()?;
    let maps = args.maps.resolve()?;
    let grid = common_grid(&maps)?;
    if grid != saved.grid {
        bail!("Agent was trained on {} maps but the selected maps are {grid}", saved.grid);
    }
    let max_steps = args.max_steps.unwrap_or(saved.config.max_steps);

    print_section("Greedy play");
    print_kv("Agent", &args.agent.display().to_string());
    if let Some(episodes) = saved.metadata.episodes_trained {
        print_kv("Episodes trained", &episodes.to_string());
    }
    print_kv("States known", &agent.count().to_string());

    let summary = evaluate(&mut agent, &maps, max_steps)?;

    print_subsection("Games");
    for outcome in &summary.outcomes {
        let result = if outcome.gold {
            "gold"
        } else if outcome.died() {
            "died"
        } else {
            "no gold"
        };
        println!(
            "  {:24} {:8} score {:6} steps {:5} ({:?})",
            outcome.map, result, outcome.score, outcome.steps, outcome.termination
        );
        if args.trace {
            let actions: Vec<&str> = outcome.actions.iter().map(|action| action.name()).collect();
            println!("    {}", actions.join(" "));
        }
    }

    print_subsection("Summary");
    print_kv(
        "Wins",
        &format!("{}/{} ({})", summary.wins, summary.games, format_percent(summary.win_rate)),
    );
    print_kv("Deaths", &summary.deaths.to_string());
    print_kv("Average score", &format!("{:.1}", summary.average_score));
    print_kv("Average steps", &format!("{:.1}", summary.average_steps));

    if let Some(path) = &args.export {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &summary).context("Failed to write results")?;
        print_kv("Results written to", &path.display().to_string());
    }

    Ok(())
}
