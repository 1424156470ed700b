//! Player commands sent from the host to the simulation.
//!
//! Commands are queued and applied at the next tick boundary, before any
//! system runs.

use serde::{Deserialize, Serialize};

use crate::config::GridPoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Build a tower of kind `tower` on grid cell `cell`.
    BuildTower { tower: String, cell: GridPoint },
    /// Start the next wave if none is running.
    StartNextWave,
    SetAutoStart { enabled: bool },
    Pause,
    Resume,
}
