//! Component records attached to entities.
//!
//! Every component is a plain value owned by its entity. Cross-entity links
//! are weak `EntityId` handles that must be revalidated against the store.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::enums::TargetStrategy;

/// Dense enumeration of component types, used to express queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Transform,
    Sprite,
    PathFollower,
    Stats,
    Tower,
    Targeting,
    Projectile,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: f32,
}

impl Transform {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

/// Visual hints for the renderer. `texture` is optional; when it is missing
/// or fails to load the renderer falls back to a `color` primitive of `size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub color: String,
    pub size: f32,
    pub texture: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathFollower {
    pub speed: f32,
    pub waypoint_index: usize,
    pub reached_end: bool,
}

impl PathFollower {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            waypoint_index: 0,
            reached_end: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: f32,
    pub max_hp: f32,
    pub reward: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    pub range: f32,
    pub damage: f32,
    /// Shots per second.
    pub fire_rate: f32,
    pub projectile_speed: f32,
    pub splash_radius: f32,
    /// Seconds until the tower may fire again.
    pub cooldown: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Targeting {
    pub strategy: TargetStrategy,
    pub target: Option<EntityId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub damage: f32,
    pub target: Option<EntityId>,
    pub speed: f32,
    pub hit_radius: f32,
    pub splash_radius: f32,
}
