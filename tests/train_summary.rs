use clap::Parser;
use tempfile::tempdir;
use wumpus::{
    adapters::WorldMap,
    cli::commands::{
        play::{self, PlayArgs},
        train::{self, TrainArgs},
    },
    types::{GridSize, Position},
};

fn parse_args<I, T>(args: I) -> TrainArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    TrainArgs::parse_from(args)
}

#[test]
fn summary_without_extension_appends_json() {
    let tmp = tempdir().unwrap();
    let summary_stem = tmp.path().join("run_overview");

    let args = parse_args([
        "wumpus-train",
        "--episodes",
        "3",
        "--max-steps",
        "100",
        "--premade",
        "1",
        "--seed",
        "5",
        "--quiet",
        "--summary",
        summary_stem.to_str().unwrap(),
    ]);

    train::execute(args).expect("training with summary should succeed");

    let expected_path = summary_stem.with_extension("json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["total_episodes"], 3);
    assert_eq!(parsed["maps"][0], "premade-1");
    assert_eq!(parsed["config"]["max_steps"], 100);
    assert!(parsed["evaluation"].is_null());
}

#[test]
fn summary_directory_argument_creates_default_file() {
    let tmp = tempdir().unwrap();
    let summary_dir = tmp.path().join("summaries");
    let summary_arg = format!("{}/", summary_dir.display());

    let args = parse_args([
        "wumpus-train",
        "--episodes",
        "2",
        "--max-steps",
        "50",
        "--random",
        "2",
        "--map-seed",
        "9",
        "--quiet",
        "--evaluate",
        "--summary",
        &summary_arg,
    ]);

    train::execute(args).expect("training with directory summary should succeed");

    let expected_path = summary_dir.join("training_summary.json");
    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["total_episodes"], 4);
    assert_eq!(parsed["evaluation"]["games"], 2);
}

#[test]
fn trained_agent_file_can_be_played() {
    let tmp = tempdir().unwrap();
    let agent_path = tmp.path().join("agent.msgpack");
    let results_path = tmp.path().join("results.json");
    let observations_path = tmp.path().join("episodes.jsonl");

    let args = parse_args([
        "wumpus-train",
        "--episodes",
        "4",
        "--max-steps",
        "100",
        "--premade",
        "1,2",
        "--quiet",
        "--output",
        agent_path.to_str().unwrap(),
        "--observations",
        observations_path.to_str().unwrap(),
    ]);
    train::execute(args).expect("training should succeed");
    assert!(agent_path.exists());

    let observations = std::fs::read_to_string(&observations_path).unwrap();
    assert_eq!(observations.lines().count(), 8);

    let play_args = PlayArgs::parse_from([
        "wumpus-play",
        agent_path.to_str().unwrap(),
        "--premade",
        "1,2",
        "--max-steps",
        "30",
        "--export",
        results_path.to_str().unwrap(),
    ]);
    play::execute(play_args).expect("playing a saved agent should succeed");

    let contents = std::fs::read_to_string(&results_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["games"], 2);
}

#[test]
fn mixed_grid_sizes_fail_before_training() {
    let tmp = tempdir().unwrap();
    let maps_path = tmp.path().join("maps.json");
    let summary_path = tmp.path().join("summary.json");

    let mut maps = WorldMap::premade();
    maps.truncate(1);
    maps.push(WorldMap {
        name: Some("tiny".to_string()),
        size: GridSize::new(3, 3).unwrap(),
        wumpus: Position::new(3, 3),
        gold: Position::new(2, 3),
        pits: Vec::new(),
    });
    WorldMap::save_all(&maps, &maps_path).unwrap();

    let args = parse_args([
        "wumpus-train",
        "--episodes",
        "2",
        "--quiet",
        "--maps",
        maps_path.to_str().unwrap(),
        "--summary",
        summary_path.to_str().unwrap(),
    ]);

    let error = train::execute(args).unwrap_err();
    assert!(error.to_string().contains("tiny"), "{error}");
    assert!(!summary_path.exists());
}
