//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Guidance law flown by a guided missile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuidanceKind {
    /// Lead pursuit toward a point scaled off the line of sight.
    SimplePN,
    /// Closed-form intercept from the cosine-law quadratic.
    QuadraticPN,
    /// Proportional lead-angle controller.
    BasicLOS,
    /// Forward-simulated impact prediction with a filtered aim point.
    #[default]
    Advanced,
}

impl GuidanceKind {
    pub const ALL: [GuidanceKind; 4] = [
        GuidanceKind::SimplePN,
        GuidanceKind::QuadraticPN,
        GuidanceKind::BasicLOS,
        GuidanceKind::Advanced,
    ];

    /// The next law in cycling order.
    pub fn next(self) -> Self {
        match self {
            GuidanceKind::SimplePN => GuidanceKind::QuadraticPN,
            GuidanceKind::QuadraticPN => GuidanceKind::BasicLOS,
            GuidanceKind::BasicLOS => GuidanceKind::Advanced,
            GuidanceKind::Advanced => GuidanceKind::SimplePN,
        }
    }
}

/// Missile airframe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissileKind {
    /// Aerodynamic missile with a rocket motor.
    #[default]
    Guided,
    /// Thruster-steered kill vehicle without aerodynamic surfaces.
    KillVehicle,
}

/// Kinematic behaviour of a spawned target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetProfile {
    Static,
    Linear,
    Rotating,
    /// Random-walk spin and velocity.
    Erratic,
    /// Pick one of the concrete profiles at spawn time.
    #[default]
    Random,
}

impl TargetProfile {
    pub const CONCRETE: [TargetProfile; 4] = [
        TargetProfile::Static,
        TargetProfile::Linear,
        TargetProfile::Rotating,
        TargetProfile::Erratic,
    ];
}

/// Flight phase of a missile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightPhase {
    /// Spawned, not yet integrated.
    #[default]
    Launched,
    /// Burning boost fuel.
    Boosting,
    /// Burning sustainer fuel.
    Cruising,
    /// Fuel exhausted.
    Coasting,
    Expired,
}

/// Why a missile left the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryReason {
    /// Lifespan exceeded.
    Timeout,
    /// Out of fuel and below the minimum speed.
    FuelExhausted,
    OutOfBounds,
    /// Target destroyed or removed.
    TargetLost,
    /// Guidance detected a miss with expire-on-miss enabled.
    Missed,
    /// Struck a target.
    Impact,
}
