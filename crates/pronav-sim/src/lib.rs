//! Simulation engine for the ProNav intercept sandbox.
//!
//! Owns the hecs ECS world, runs systems at a fixed substep rate,
//! and produces SimSnapshots for the presentation layer.

pub mod aero;
pub mod ballistics;
pub mod body;
pub mod engine;
pub mod environment;
pub mod grid;
pub mod guidance;
pub mod maneuver;
pub mod missile;
pub mod smoothing;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use pronav_core as core;
