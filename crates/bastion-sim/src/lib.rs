//! Simulation engine for BASTION.
//!
//! Owns the columnar entity store, runs the wave director and per-tick
//! systems at a fixed step, and produces `FrameSnapshot`s for the renderer.

pub mod clock;
pub mod ecs;
pub mod engine;
pub mod map;
pub mod persistence;
pub mod progress;
pub mod systems;
pub mod world_setup;

pub use bastion_core as core;
pub use clock::{FrameLoop, LoopHost};
pub use engine::{SimConfig, Simulation};
