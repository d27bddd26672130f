//! Inspect command - Show what a trained agent believes about one state

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::{
    cli::{
        config::{MapArgs, parse_action},
        output::{format_number, print_action_values, print_kv, print_section},
    },
    ports::{MapDescriptor, World},
    q_learning::{SavedAgent, translator},
};

#[derive(Parser, Debug)]
#[command(about = "Inspect learned values for a state")]
pub struct InspectArgs {
    /// Path to a saved agent
    pub agent: PathBuf,

    #[command(flatten)]
    pub maps: MapArgs,

    /// Which of the selected maps to start from, numbered from 1
    #[arg(long, default_value_t = 1)]
    pub map: usize,

    /// Actions to play before inspecting, e.g. `right,up,grab`
    #[arg(long, value_delimiter = ',')]
    pub actions: Vec<String>,
}

/// Execute the inspect command
pub fn execute(args: InspectArgs) -> Result<()> {
    let saved = SavedAgent::load_from_file(&args.agent)?;
    let mut agent = saved.to_agent()?;
    let maps = args.maps.resolve()?;
    let map = args
        .map
        .checked_sub(1)
        .and_then(|index| maps.get(index))
        .ok_or_else(|| anyhow!("No map {} (expected 1..={})", args.map, maps.len()))?;

    let actions = args
        .actions
        .iter()
        .map(|value| parse_action(value))
        .collect::<Result<Vec<_>>>()?;

    let mut world = map.generate_world();
    for action in actions {
        if world.is_game_over() {
            return Err(anyhow!("Game is already over before '{action}'"));
        }
        translator::apply(&mut world, action);
    }

    let summary = agent.inspect(&world)?;

    print_section(&format!("State on {map}"));
    print_kv("Position", &world.player_position().to_string());
    print_kv("Facing", &world.player_direction().to_string());
    print_kv("Arrow", &world.has_arrow().to_string());
    print_kv("Gold", &world.has_gold().to_string());
    print_kv("Game over", &world.is_game_over().to_string());
    print_kv("State key", &summary.key);
    print_kv("Table size", &format_number(summary.table_size));
    println!();
    print_action_values(&summary.values, summary.best_action);

    Ok(())
}
