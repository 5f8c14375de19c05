//! Simulation snapshot: the complete visible state handed to the presentation
//! layer after each frame. Read-only by construction.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{SimTime, Vec2};

/// Complete simulation state after one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub paused: bool,
    pub guidance: GuidanceKind,
    pub missile_kind: MissileKind,
    pub target_profile: TargetProfile,
    pub platform: BodyView,
    pub targets: Vec<TargetView>,
    pub missiles: Vec<MissileView>,
    pub bullets: Vec<BodyView>,
    pub explosions: Vec<ExplosionView>,
    pub environment: EnvironmentView,
    pub grid: GridView,
    pub events: Vec<SimEvent>,
}

/// Pose and world-space outline of one body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyView {
    pub id: u64,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Degrees.
    pub rotation: f64,
    pub polygon: Vec<Vec2>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
    pub body: BodyView,
    pub profile: TargetProfile,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissileView {
    pub body: BodyView,
    pub target_id: u64,
    pub kind: MissileKind,
    pub guidance: GuidanceKind,
    pub phase: FlightPhase,
    pub fuel: f64,
    pub age: f64,
    pub distance_travelled: f64,
    pub missed: bool,
    /// Raw predicted impact point.
    pub impact_point: Vec2,
    /// Filtered impact point.
    pub stable_aim_point: Vec2,
    /// Point currently steered toward.
    pub current_aim_point: Vec2,
    pub surfaces: Vec<SurfaceView>,
    /// Duty cycle per thruster (kill vehicle only).
    pub thrusters: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceView {
    pub position: Vec2,
    /// Degrees.
    pub rotation: f64,
    pub deflection: f64,
    pub angle_of_attack: f64,
    pub lift: Vec2,
    pub drag: Vec2,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplosionView {
    pub position: Vec2,
    pub radius: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentView {
    pub wind: Vec2,
    pub air_density: f64,
    pub wind_enabled: bool,
    pub turbulence_enabled: bool,
}

/// Spatial grid occupancy, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridView {
    pub columns: usize,
    pub rows: usize,
    pub occupied_cells: usize,
    pub objects: usize,
}
