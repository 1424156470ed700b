//! Outbound events emitted by the simulation for the host and renderer.
//!
//! Events are fire-and-forget: the simulation pushes them onto a queue that
//! the host drains once per frame and never reads them back.

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Floating combat text request: `amount` damage landed at (`x`, `y`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageNotification {
    pub x: f32,
    pub y: f32,
    pub amount: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A projectile damaged an entity.
    Damage(DamageNotification),
    /// An enemy's hp dropped to zero or below.
    EnemyKilled { entity: EntityId, reward: u32 },
    /// An enemy reached the final waypoint.
    EnemyLeaked { entity: EntityId },
    /// Wave `wave` (1-based) started spawning.
    WaveStarted { wave: u32, enemies: u32 },
    /// Wave `wave` was cleared and `reward` gold was granted.
    WaveCompleted { wave: u32, reward: u32 },
    Victory,
    GameOver,
}
