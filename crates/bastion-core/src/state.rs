//! Render-facing state: the read-only view of committed simulation state
//! handed to the external renderer each frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::FIXED_STEP;
use crate::entity::EntityId;
use crate::enums::{EntityRole, WavePhase};

/// Simulation time, advanced once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    pub tick: u64,
    pub elapsed_secs: f64,
}

impl SimTime {
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs = self.tick as f64 * FIXED_STEP;
    }
}

/// Copy of the global progress counters, passed to observers and snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressView {
    pub gold: u32,
    pub lives: u32,
    pub wave: u32,
    pub paused: bool,
    pub game_over: bool,
    pub victory: bool,
}

/// How to draw an entity. `texture` is a key the renderer may fail to
/// resolve; it then draws a `color` primitive of `size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualView {
    pub texture: Option<String>,
    pub color: String,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub role: EntityRole,
    pub position: Vec2,
    pub rotation: f32,
    pub scale: f32,
    /// hp / max_hp for entities with stats.
    pub hp_ratio: Option<f32>,
    pub visual: VisualView,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub time: SimTime,
    /// Interpolation fraction toward the next tick, in `[0, 1)`.
    pub alpha: f64,
    pub progress: ProgressView,
    pub wave_phase: WavePhase,
    pub entities: Vec<EntityView>,
}

impl FrameSnapshot {
    pub fn count_role(&self, role: EntityRole) -> usize {
        self.entities.iter().filter(|e| e.role == role).count()
    }
}
