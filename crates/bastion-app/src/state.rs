//! State shared between the front end and the game loop thread.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use bastion_core::commands::PlayerCommand;
use bastion_core::state::{FrameSnapshot, ProgressView};

/// Commands sent from the front end to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation.
    PlayerCommand(PlayerCommand),
    /// Change the frame clock's time scale.
    SetTimeScale(f64),
    /// Restart the current level.
    Restart,
    /// Shut down the game loop thread.
    Shutdown,
}

/// Latest snapshot rendered by the game loop, for synchronous polling.
pub type SharedSnapshot = Arc<Mutex<Option<FrameSnapshot>>>;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEnd {
    Victory,
    GameOver,
    TimedOut,
    Shutdown,
}

/// Summary returned when the game loop thread exits.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub level: u32,
    pub end: SessionEnd,
    pub ticks: u64,
    pub progress: ProgressView,
    pub enemies_killed: u32,
    pub enemies_leaked: u32,
}
