//! Error types surfaced to callers of the engine.

use crate::config::GridPoint;

/// Static configuration failed to parse or validate.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate {table} id '{id}'")]
    DuplicateId { table: &'static str, id: String },

    #[error("tower '{id}': {reason}")]
    InvalidTower { id: String, reason: String },

    #[error("enemy '{id}': {reason}")]
    InvalidEnemy { id: String, reason: String },

    #[error("level {id}: {reason}")]
    InvalidLevel { id: u32, reason: String },

    #[error("wave {wave} references unknown enemy '{enemy_id}'")]
    UnknownEnemy { wave: u32, enemy_id: String },

    #[error("wave {wave}: {reason}")]
    InvalidSegment { wave: u32, reason: String },

    #[error("wave list is empty")]
    NoWaves,
}

/// A level could not be entered.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("no levels configured")]
    NoLevels,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A build request was rejected. Rejections never mutate state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("the game has ended")]
    GameEnded,

    #[error("unknown tower kind '{0}'")]
    UnknownTower(String),

    #[error("cell {0:?} is outside the grid")]
    OutOfBounds(GridPoint),

    #[error("cell {0:?} is not buildable")]
    NotBuildable(GridPoint),

    #[error("cell {0:?} is already occupied")]
    Occupied(GridPoint),

    #[error("insufficient gold: have {gold}, need {cost}")]
    InsufficientGold { gold: u32, cost: u32 },
}
