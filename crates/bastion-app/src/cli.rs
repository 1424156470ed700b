//! Command-line arguments.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use bastion_core::commands::PlayerCommand;
use bastion_core::config::GridPoint;

#[derive(Debug, Parser)]
#[command(name = "bastion", about = "Headless BASTION tower-defense simulation")]
pub struct Args {
    /// Game data file (towers, enemies, levels).
    #[arg(long, default_value = "data/game.json")]
    pub data: PathBuf,

    /// Wave list for the level.
    #[arg(long, default_value = "data/waves/level1.json")]
    pub waves: PathBuf,

    /// Level number, 1-based. Wraps past the last level.
    #[arg(long, default_value_t = 1)]
    pub level: u32,

    /// Start each following wave automatically.
    #[arg(long)]
    pub auto: bool,

    /// Simulation speed multiplier.
    #[arg(long, default_value_t = 1.0)]
    pub speed: f64,

    /// Tower to build before the first wave, as `kind@x,y`. Repeatable.
    #[arg(long = "tower", value_name = "KIND@X,Y")]
    pub towers: Vec<TowerPlacement>,

    /// Starting gold override.
    #[arg(long)]
    pub gold: Option<u32>,

    /// Give up after this many wall-clock seconds.
    #[arg(long, default_value_t = 600.0)]
    pub max_seconds: f64,

    /// Directory holding the level records file.
    #[arg(long)]
    pub save_dir: Option<PathBuf>,
}

/// A tower build request given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TowerPlacement {
    pub kind: String,
    pub cell: GridPoint,
}

impl TowerPlacement {
    pub fn into_command(self) -> PlayerCommand {
        PlayerCommand::BuildTower {
            tower: self.kind,
            cell: self.cell,
        }
    }
}

impl FromStr for TowerPlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, cell) = s
            .split_once('@')
            .ok_or_else(|| format!("expected KIND@X,Y, got '{s}'"))?;
        let (x, y) = cell
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y after '@', got '{cell}'"))?;
        let x = x.trim().parse().map_err(|e| format!("bad x '{x}': {e}"))?;
        let y = y.trim().parse().map_err(|e| format!("bad y '{y}': {e}"))?;
        if kind.is_empty() {
            return Err("tower kind is empty".into());
        }
        Ok(Self {
            kind: kind.to_string(),
            cell: GridPoint::new(x, y),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tower_placement() {
        let placement: TowerPlacement = "rocket@5,3".parse().unwrap();
        assert_eq!(placement.kind, "rocket");
        assert_eq!(placement.cell, GridPoint::new(5, 3));
    }

    #[test]
    fn test_parse_tower_placement_rejects_garbage() {
        assert!("rocket".parse::<TowerPlacement>().is_err());
        assert!("rocket@5".parse::<TowerPlacement>().is_err());
        assert!("@1,2".parse::<TowerPlacement>().is_err());
        assert!("rocket@a,2".parse::<TowerPlacement>().is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "bastion", "--auto", "--level", "2", "--tower", "basic@1,1", "--tower", "sniper@3,4",
        ]);
        assert!(args.auto);
        assert_eq!(args.level, 2);
        assert_eq!(args.towers.len(), 2);
        assert_eq!(args.speed, 1.0);
        assert!(args.save_dir.is_none());
    }
}
