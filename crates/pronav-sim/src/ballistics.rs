//! Unguided cannon rounds and their aim solution.

use hecs::Entity;

use pronav_core::components::RigidBody;
use pronav_core::constants::{
    ADV_MAX_PREDICTION_STEPS, BULLET_LIFETIME, BULLET_PREDICTION_DT, BULLET_PROXIMITY_DIST,
    FRAGMENT_LIFETIME,
};
use pronav_core::geometry::{angle_to_vector, normalize_or_zero, vector_angle};
use pronav_core::types::Vec2;

/// A point-body cannon round, optionally fused against one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub target: Option<Entity>,
    pub age: f64,
    pub lifetime: f64,
}

impl Bullet {
    pub fn targeted(target: Entity) -> Self {
        Self {
            target: Some(target),
            age: 0.0,
            lifetime: BULLET_LIFETIME,
        }
    }

    /// Unfused shrapnel from a detonation.
    pub fn fragment() -> Self {
        Self {
            target: None,
            age: 0.0,
            lifetime: FRAGMENT_LIFETIME,
        }
    }

    /// Age the round. Returns true once it has outlived its lifetime.
    pub fn advance(&mut self, dt: f64) -> bool {
        self.age += dt;
        self.age >= self.lifetime
    }

    /// Proximity fuse: close enough to a live target to detonate.
    pub fn should_detonate(&self, position: Vec2, target: &RigidBody) -> bool {
        !target.expired && position.distance(target.position) < BULLET_PROXIMITY_DIST
    }
}

/// Time for a round at `speed` to meet a target offset by `delta` and moving
/// at `relative_velocity`. `None` when the target cannot be caught.
pub fn aim_ahead(delta: Vec2, relative_velocity: Vec2, speed: f64) -> Option<f64> {
    let a = relative_velocity.dot(relative_velocity) - speed * speed;
    let b = 2.0 * relative_velocity.dot(delta);
    let c = delta.dot(delta);

    let det = b * b - 4.0 * a * c;
    if det <= 0.0 {
        return None;
    }
    let time = 2.0 * c / (det.sqrt() - b);
    (time > 0.0 && time.is_finite()).then_some(time)
}

/// Where a target turning at `turn_rate` (degrees per second) will be after
/// `time` seconds, walked in `BULLET_PREDICTION_DT` steps.
pub fn predict_curved(position: Vec2, velocity: Vec2, turn_rate: f64, time: f64) -> Vec2 {
    let steps = time / BULLET_PREDICTION_DT;
    if !(1.0..ADV_MAX_PREDICTION_STEPS).contains(&steps) {
        return position;
    }

    let speed = velocity.length();
    let mut heading = vector_angle(velocity);
    let mut point = position;
    let mut elapsed = 0.0;
    while elapsed < time {
        point += angle_to_vector(heading) * speed * BULLET_PREDICTION_DT;
        heading += turn_rate * BULLET_PREDICTION_DT;
        elapsed += BULLET_PREDICTION_DT;
    }
    point
}

/// Muzzle velocity for a round fired from `origin` at `target`.
///
/// Spinning targets steer their velocity against their spin, so their
/// path is predicted as a curve; everything else gets the straight-line
/// aim-ahead solution. Falls back to aiming at the target itself.
pub fn firing_solution(origin: Vec2, target: &RigidBody, speed: f64) -> Vec2 {
    let delta = target.position - origin;
    let aim_point = if target.rotation_speed == 0.0 {
        aim_ahead(delta, target.velocity, speed)
            .map(|time| target.position + target.velocity * time)
    } else {
        let time_of_arrival = delta.length() / speed;
        Some(predict_curved(
            target.position,
            target.velocity,
            -target.rotation_speed,
            time_of_arrival,
        ))
    };

    let direction = normalize_or_zero(aim_point.unwrap_or(target.position) - origin);
    direction * speed
}
