//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Target selection policy declared on a tower.
///
/// Acquisition currently always picks the nearest enemy in range; the
/// declared policy is stored but not consulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStrategy {
    #[default]
    Nearest,
    First,
    Last,
}

/// Wave director state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// No wave has been started yet this level.
    #[default]
    Idle,
    /// A wave is active: enemies are spawning or still alive.
    Spawning,
    /// The last wave completed and another one is configured.
    BetweenWaves,
    /// The final configured wave completed.
    Complete,
}

/// Broad role of an entity, derived from its components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityRole {
    Enemy,
    Tower,
    Projectile,
}

/// What changed in the global progress state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressEvent {
    Reset,
    GoldAdded(u32),
    GoldSpent(u32),
    LivesLost(u32),
    WaveAdvanced(u32),
    PausedChanged(bool),
    GameOver,
    Victory,
}
