use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bastion_app::cli::Args;
use bastion_app::game_loop::{self, LoopSetup};
use bastion_app::state::{GameLoopCommand, SessionEnd, SharedSnapshot};
use bastion_core::commands::PlayerCommand;
use bastion_core::config::{parse_waves, GameData};
use bastion_sim::persistence;
use bastion_sim::SimConfig;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let data = GameData::load(&args.data)
        .with_context(|| format!("loading game data from {}", args.data.display()))?;
    let waves_json = std::fs::read_to_string(&args.waves)
        .with_context(|| format!("reading waves from {}", args.waves.display()))?;
    let waves = parse_waves(&waves_json)
        .with_context(|| format!("parsing waves from {}", args.waves.display()))?;

    let mut records = match &args.save_dir {
        Some(dir) => Some(persistence::load_from_file(dir)?),
        None => None,
    };
    if let Some(records) = &records {
        if !records.is_unlocked(args.level) {
            warn!(level = args.level, unlocked = records.unlocked_level, "level not yet unlocked");
        }
    }

    let mut config = SimConfig {
        auto_start: args.auto,
        ..Default::default()
    };
    if let Some(gold) = args.gold {
        config.starting_gold = gold;
    }

    let latest: SharedSnapshot = Arc::new(Mutex::new(None));
    let (cmd_tx, handle) = game_loop::spawn_game_loop(
        LoopSetup {
            data,
            level: args.level,
            waves,
            config,
            time_scale: args.speed,
            max_seconds: args.max_seconds,
        },
        latest,
    )
    .context("spawning game loop thread")?;

    for placement in args.towers {
        // A closed channel means the loop already exited; join reports why.
        let _ = cmd_tx.send(GameLoopCommand::PlayerCommand(placement.into_command()));
    }
    let _ = cmd_tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::StartNextWave));

    let summary = handle
        .join()
        .map_err(|_| anyhow!("game loop thread panicked"))??;

    println!("{}", serde_json::to_string_pretty(&summary)?);

    if summary.end == SessionEnd::Victory {
        if let (Some(dir), Some(records)) = (&args.save_dir, records.as_mut()) {
            records.record_completion(summary.level);
            persistence::save_to_file(dir, records)?;
            info!(unlocked = records.unlocked_level, "level records saved");
        }
    }

    Ok(())
}
