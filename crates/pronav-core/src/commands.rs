//! Control commands sent from the shell to the simulation.
//!
//! Commands are queued and applied at the next frame boundary, so they never
//! interleave with a substep in progress.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Vec2;

/// All possible control actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Spawning ---
    /// Spawn one target. Without a position it is placed randomly;
    /// without a profile the configured default is used.
    SpawnTarget {
        #[serde(default)]
        position: Option<Vec2>,
        #[serde(default)]
        profile: Option<TargetProfile>,
    },
    /// Spawn `count` targets at random positions.
    SpawnTargets { count: u32 },

    // --- Weapons ---
    /// Fire a missile at one target, or at every live target when
    /// `target_id` is absent.
    FireMissile {
        #[serde(default)]
        target_id: Option<u64>,
        #[serde(default)]
        guidance: Option<GuidanceKind>,
        #[serde(default)]
        kind: Option<MissileKind>,
    },
    /// Start a cannon burst against every live target.
    FireBurst,
    /// Remove every target, missile, bullet and explosion.
    Clear,

    // --- Platform ---
    /// Teleport the launch platform.
    MovePlatform { position: Vec2 },
    /// Rotate the launch platform by `delta` degrees.
    RotatePlatform { delta: f64 },
    /// Toggle the platform's engine.
    SetPlatformThrust { on: bool },

    // --- Defaults & toggles ---
    SetGuidance { guidance: GuidanceKind },
    /// Advance the default guidance law to the next one.
    CycleGuidance,
    SetMissileKind { kind: MissileKind },
    SetTargetProfile { profile: TargetProfile },
    SetWind { enabled: bool },
    SetTurbulence { enabled: bool },
    SetControlSurfaces { enabled: bool },
    SetThrustVectoring { enabled: bool },
    SetExpireOnMiss { enabled: bool },

    // --- Simulation control ---
    Pause,
    Resume,
    /// Run exactly one frame while paused.
    Step,
}
