//! Core types and definitions for the BASTION simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! entity handles, player commands, components, static configuration tables, events,
//! render-facing views and constants. It has no engine logic.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod entity;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
