//! Columnar entity store with deferred, per-tick commit.

pub mod entity;
pub mod world;

pub use entity::{EntityAllocator, EntityId};
pub use world::{CommitReport, World};
