//! Per-tick systems, run by the simulation in a fixed order:
//! wave director, movement, combat, projectiles.
//!
//! Systems operate on `&mut World` and see only committed entities. Anything
//! they create or remove takes effect at the end-of-tick commit.

pub mod combat;
pub mod movement;
pub mod projectile;
pub mod snapshot;
pub mod wave_director;
