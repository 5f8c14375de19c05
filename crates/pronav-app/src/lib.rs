//! ProNav interactive shell.
//!
//! This crate owns the simulation thread and exposes control handlers
//! that bridge shell input to it via channels and hand-off signals.

pub mod control;
pub mod game_loop;
pub mod state;

pub use pronav_core as core;
