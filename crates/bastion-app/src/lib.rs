//! BASTION headless host.
//!
//! Wires the simulation crates to a command-line front end: a game loop
//! thread drives the frame clock against the wall clock, commands arrive
//! over a channel and the latest snapshot is shared for polling.

pub mod cli;
pub mod game_loop;
pub mod state;

pub use bastion_core as core;
