//! Core types and definitions for the ProNav intercept simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry primitives, components, commands, state snapshots, events,
//! and tuning constants. It has no runtime and no threading.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod geometry;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
