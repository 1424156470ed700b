//! Static game data: tower, enemy and level tables plus wave lists.
//!
//! All tables are read-only once loaded. Loading parses JSON and validates
//! every record; a level is never entered with data that failed validation.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_GRID_CELLS;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost: u32,
    pub range: f32,
    pub damage: f32,
    /// Shots per second.
    pub fire_rate: f32,
    pub projectile_speed: f32,
    #[serde(default)]
    pub splash_radius: f32,
    pub color: String,
    #[serde(default)]
    pub texture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    pub id: String,
    pub name: String,
    pub speed: f32,
    pub hp: f32,
    pub reward: u32,
    pub color: String,
    pub radius: f32,
    #[serde(default)]
    pub texture: Option<String>,
}

/// A grid cell coordinate (column, row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: u32,
    pub tile_size: f32,
    pub cols: u32,
    pub rows: u32,
    /// Enemy waypoints in grid cells, consumed in order.
    pub path: Vec<GridPoint>,
    /// Row-major buildable mask (1 = buildable). Empty means every
    /// non-path cell is buildable.
    #[serde(default)]
    pub buildable: Vec<u8>,
}

impl LevelConfig {
    pub fn contains(&self, cell: GridPoint) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.cols && (cell.y as u32) < self.rows
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidLevel {
            id: self.id,
            reason,
        };

        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(invalid(format!("tile size {} must be positive", self.tile_size)));
        }
        if self.cols == 0 || self.rows == 0 {
            return Err(invalid(format!("grid {}x{} is empty", self.cols, self.rows)));
        }
        let cells = match self.cols.checked_mul(self.rows) {
            Some(cells) if cells <= MAX_GRID_CELLS => cells as usize,
            _ => {
                return Err(invalid(format!(
                    "grid {}x{} exceeds {MAX_GRID_CELLS} cells",
                    self.cols, self.rows
                )))
            }
        };
        if self.path.len() < 2 {
            return Err(invalid(format!(
                "path needs at least 2 waypoints, has {}",
                self.path.len()
            )));
        }
        if let Some(cell) = self.path.iter().find(|c| !self.contains(**c)) {
            return Err(invalid(format!("waypoint {cell:?} is outside the grid")));
        }
        for pair in self.path.windows(2) {
            let dx = (pair[1].x - pair[0].x).abs();
            let dy = (pair[1].y - pair[0].y).abs();
            if dx != 0 && dy != 0 && dx != dy {
                return Err(invalid(format!(
                    "path segment {:?} -> {:?} is neither straight nor diagonal",
                    pair[0], pair[1]
                )));
            }
        }
        if !self.buildable.is_empty() && self.buildable.len() != cells {
            return Err(invalid(format!(
                "buildable mask has {} entries, grid has {cells}",
                self.buildable.len()
            )));
        }
        Ok(())
    }
}

/// One sub-phase of a wave: `count` enemies of one kind, `interval` seconds apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveSegment {
    pub enemy_id: String,
    pub count: u32,
    pub interval: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    pub id: u32,
    pub segments: Vec<WaveSegment>,
    /// Pre-wave delay in seconds. Carried for the host; spawning does not wait on it.
    #[serde(default)]
    pub delay_before: f32,
}

impl WaveConfig {
    pub fn total_enemies(&self) -> u32 {
        self.segments.iter().map(|s| s.count).sum()
    }
}

/// The complete static data set: towers, enemies, levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub towers: Vec<TowerConfig>,
    pub enemies: Vec<EnemyConfig>,
    pub levels: Vec<LevelConfig>,
}

impl GameData {
    /// Parse and validate a JSON data set.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let data: GameData = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(serde_json::Error::io)?;
        Self::from_json(&json)
    }

    pub fn tower(&self, id: &str) -> Option<&TowerConfig> {
        self.towers.iter().find(|t| t.id == id)
    }

    pub fn enemy(&self, id: &str) -> Option<&EnemyConfig> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Level by 1-based number; numbers past the end wrap around.
    pub fn level(&self, number: u32) -> Option<&LevelConfig> {
        if self.levels.is_empty() {
            return None;
        }
        let index = number.saturating_sub(1) as usize % self.levels.len();
        self.levels.get(index)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unique("tower", self.towers.iter().map(|t| t.id.as_str()))?;
        check_unique("enemy", self.enemies.iter().map(|e| e.id.as_str()))?;

        for tower in &self.towers {
            let invalid = |reason: &str| ConfigError::InvalidTower {
                id: tower.id.clone(),
                reason: reason.to_string(),
            };
            if !(tower.fire_rate.is_finite() && tower.fire_rate > 0.0) {
                return Err(invalid("fire rate must be positive"));
            }
            if !(tower.range.is_finite() && tower.range >= 0.0) {
                return Err(invalid("range must be non-negative"));
            }
            if !(tower.projectile_speed.is_finite() && tower.projectile_speed > 0.0) {
                return Err(invalid("projectile speed must be positive"));
            }
            if !(tower.splash_radius.is_finite() && tower.splash_radius >= 0.0) {
                return Err(invalid("splash radius must be non-negative"));
            }
        }

        for enemy in &self.enemies {
            let invalid = |reason: &str| ConfigError::InvalidEnemy {
                id: enemy.id.clone(),
                reason: reason.to_string(),
            };
            if !(enemy.speed.is_finite() && enemy.speed >= 0.0) {
                return Err(invalid("speed must be non-negative"));
            }
            if !(enemy.hp.is_finite() && enemy.hp > 0.0) {
                return Err(invalid("hp must be positive"));
            }
        }

        for level in &self.levels {
            level.validate()?;
        }
        Ok(())
    }

    /// Check that every wave segment is well-formed and names a known enemy.
    pub fn validate_waves(&self, waves: &[WaveConfig]) -> Result<(), ConfigError> {
        if waves.is_empty() {
            return Err(ConfigError::NoWaves);
        }
        for wave in waves {
            for segment in &wave.segments {
                if self.enemy(&segment.enemy_id).is_none() {
                    return Err(ConfigError::UnknownEnemy {
                        wave: wave.id,
                        enemy_id: segment.enemy_id.clone(),
                    });
                }
                if !(segment.interval.is_finite() && segment.interval >= 0.0) {
                    return Err(ConfigError::InvalidSegment {
                        wave: wave.id,
                        reason: format!("interval {} must be non-negative", segment.interval),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Parse a JSON wave list. Enemy references are checked by
/// [`GameData::validate_waves`].
pub fn parse_waves(json: &str) -> Result<Vec<WaveConfig>, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

fn check_unique<'a>(
    table: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ConfigError::DuplicateId {
                table,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
