//! Missile guidance.
//!
//! Each law turns missile and target kinematics into a desired heading.
//! [`Guidance`] wraps whichever law a missile flies and applies the logic
//! every law shares:
//!
//! - **Arm distance**: right after launch the command is blended from the
//!   current velocity heading toward the law's output in proportion to
//!   distance flown, so missiles leave the rail straight.
//! - **Miss detection**: when the closing rate stalls within
//!   `MISS_TARGET_DIST` of the target the missile is marked as having missed.
//!   Rotation authority then drops and recovers with distance flown since the
//!   miss, up to a re-engage distance that grows with each repeated miss.
//!
//! Zero velocity has no heading, so the wrapper holds the current rotation
//! instead of consulting the law.

pub mod advanced;
pub mod basic_los;
pub mod quadratic_pn;
pub mod simple_pn;

use pronav_core::components::RigidBody;
use pronav_core::constants::*;
use pronav_core::enums::GuidanceKind;
use pronav_core::geometry::{clamp_angle, factor, lerp_angle, vector_angle};
use pronav_core::types::Vec2;

pub use advanced::AdvancedGuidance;
pub use basic_los::BasicLos;
pub use quadratic_pn::QuadraticPn;
pub use simple_pn::SimplePn;

/// What guidance needs to know about a body.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Kinematics {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Degrees.
    pub rotation: f64,
    /// Degrees per second.
    pub rotation_speed: f64,
}

impl Kinematics {
    /// Missile-side view: the body's reference position.
    pub fn of(body: &RigidBody) -> Self {
        Self {
            position: body.position,
            velocity: body.velocity,
            rotation: body.rotation,
            rotation_speed: body.rotation_speed,
        }
    }

    /// Target-side view: aim at the polygon's centre.
    pub fn aim_at(body: &RigidBody) -> Self {
        Self {
            position: body.center(),
            ..Self::of(body)
        }
    }
}

/// Diagnostic points published by the laws.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AimPoints {
    /// Raw predicted impact point.
    pub impact: Vec2,
    /// Filtered impact point (Advanced only; mirrors `impact` otherwise).
    pub stable: Vec2,
    /// The point the missile is steering toward right now.
    pub current: Vec2,
}

/// The four interchangeable laws.
#[derive(Debug, Clone, PartialEq)]
pub enum GuidanceLaw {
    SimplePN(SimplePn),
    QuadraticPN(QuadraticPn),
    BasicLOS(BasicLos),
    Advanced(AdvancedGuidance),
}

impl GuidanceLaw {
    pub fn new(kind: GuidanceKind, missile: &Kinematics) -> Self {
        match kind {
            GuidanceKind::SimplePN => GuidanceLaw::SimplePN(SimplePn),
            GuidanceKind::QuadraticPN => GuidanceLaw::QuadraticPN(QuadraticPn::new(missile.rotation)),
            GuidanceKind::BasicLOS => GuidanceLaw::BasicLOS(BasicLos),
            GuidanceKind::Advanced => GuidanceLaw::Advanced(AdvancedGuidance::default()),
        }
    }

    pub fn kind(&self) -> GuidanceKind {
        match self {
            GuidanceLaw::SimplePN(_) => GuidanceKind::SimplePN,
            GuidanceLaw::QuadraticPN(_) => GuidanceKind::QuadraticPN,
            GuidanceLaw::BasicLOS(_) => GuidanceKind::BasicLOS,
            GuidanceLaw::Advanced(_) => GuidanceKind::Advanced,
        }
    }

    /// Raw heading from the law. Callers guarantee nonzero missile velocity.
    fn heading(
        &mut self,
        missile: &Kinematics,
        target: &Kinematics,
        dt: f64,
        aim: &mut AimPoints,
    ) -> f64 {
        match self {
            GuidanceLaw::SimplePN(law) => law.heading(missile, target, aim),
            GuidanceLaw::QuadraticPN(law) => law.heading(missile, target, aim),
            GuidanceLaw::BasicLOS(law) => law.heading(missile, target, aim),
            GuidanceLaw::Advanced(law) => law.heading(missile, target, dt, aim),
        }
    }
}

/// Result of one guidance update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidanceCommand {
    /// Desired heading in degrees, `[0, 360)`.
    pub heading: f64,
    /// A miss was detected during this update.
    pub new_miss: bool,
}

/// A guidance law plus the shared arm / miss / re-engage state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Guidance {
    law: GuidanceLaw,
    pub aim: AimPoints,
    prev_target_dist: Option<f64>,
    missed: bool,
    miss_count: u32,
    /// Distance flown when the current miss was detected.
    miss_start: f64,
}

impl Guidance {
    pub fn new(kind: GuidanceKind, missile: &Kinematics) -> Self {
        Self {
            law: GuidanceLaw::new(kind, missile),
            aim: AimPoints::default(),
            prev_target_dist: None,
            missed: false,
            miss_count: 0,
            miss_start: 0.0,
        }
    }

    pub fn kind(&self) -> GuidanceKind {
        self.law.kind()
    }

    pub fn law(&self) -> &GuidanceLaw {
        &self.law
    }

    pub fn missed(&self) -> bool {
        self.missed
    }

    pub fn miss_count(&self) -> u32 {
        self.miss_count
    }

    /// Desired heading for this substep.
    pub fn guide_to(
        &mut self,
        missile: &Kinematics,
        target: &Kinematics,
        distance_travelled: f64,
        dt: f64,
    ) -> GuidanceCommand {
        let target_dist = missile.position.distance(target.position);
        let closing_rate = match self.prev_target_dist {
            Some(prev) if dt > 0.0 => (prev - target_dist) / dt,
            _ => f64::INFINITY,
        };
        self.prev_target_dist = Some(target_dist);

        if missile.velocity.length() <= f64::EPSILON {
            return GuidanceCommand {
                heading: clamp_angle(missile.rotation),
                new_miss: false,
            };
        }

        let velocity_heading = vector_angle(missile.velocity);
        let raw = self.law.heading(missile, target, dt, &mut self.aim);
        let law_heading = if raw.is_finite() {
            clamp_angle(raw)
        } else {
            log::trace!("{:?} produced {raw}, holding velocity heading", self.kind());
            velocity_heading
        };

        let mut new_miss = false;
        if !self.missed && target_dist < MISS_TARGET_DIST && closing_rate < MISS_CLOSING_RATE {
            self.missed = true;
            self.miss_count += 1;
            self.miss_start = distance_travelled;
            new_miss = true;
            log::trace!(
                "miss #{} detected at range {target_dist:.1}, closing {closing_rate:.2}",
                self.miss_count
            );
        }

        let mut rotation_factor = 1.0;
        if self.missed {
            let reengage = self.reengage_distance();
            let since_miss = distance_travelled - self.miss_start;
            rotation_factor = factor(since_miss, reengage);
            if since_miss >= reengage {
                self.missed = false;
            }
        }

        let arm_factor = factor(distance_travelled, ARM_DIST);
        GuidanceCommand {
            heading: lerp_angle(velocity_heading, law_heading, arm_factor * rotation_factor),
            new_miss,
        }
    }

    /// Distance to fly after the current miss before regaining full authority.
    pub fn reengage_distance(&self) -> f64 {
        let repeats = self.miss_count.saturating_sub(1) as f64;
        REENGAGE_DIST * (1.0 + REENGAGE_GROWTH * repeats)
    }
}
