//! Kinematic integration for everything that is not a missile.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use pronav_core::components::{Explosion, Platform, RigidBody, Target};
use pronav_core::constants::{PLATFORM_DAMPING, PLATFORM_THRUST};
use pronav_core::enums::TargetProfile;
use pronav_core::geometry::angle_to_vector;
use pronav_core::types::WorldSize;

use crate::ballistics::Bullet;
use crate::maneuver::{self, ErraticManeuver};

/// Move targets according to their profile and wrap them at the field edges.
pub fn run_targets(world: &mut World, rng: &mut ChaCha8Rng, world_size: WorldSize, dt: f64) {
    for (_entity, (target, body, erratic)) in
        world.query_mut::<(&Target, &mut RigidBody, Option<&mut ErraticManeuver>)>()
    {
        if body.expired {
            continue;
        }
        match target.profile {
            TargetProfile::Static => continue,
            TargetProfile::Linear | TargetProfile::Random => body.integrate(dt),
            TargetProfile::Rotating => {
                body.integrate(dt);
                maneuver::follow_rotation(body);
            }
            TargetProfile::Erratic => {
                body.integrate(dt);
                if let Some(erratic) = erratic {
                    erratic.update(body, rng);
                }
            }
        }
        body.position = world_size.wrap(body.position);
    }
}

/// Move bullets; expire them at the end of their lifetime or off the field.
pub fn run_bullets(world: &mut World, world_size: WorldSize, dt: f64) {
    for (_entity, (bullet, body)) in world.query_mut::<(&mut Bullet, &mut RigidBody)>() {
        if body.expired {
            continue;
        }
        body.integrate(dt);
        if bullet.advance(dt) || !world_size.contains_padded(body.position, 0.0) {
            body.expired = true;
        }
    }
}

/// Grow explosions and expire the ones that have burnt out.
pub fn run_explosions(world: &mut World, dt: f64) {
    for (_entity, (explosion, body)) in world.query_mut::<(&mut Explosion, &mut RigidBody)>() {
        if explosion.advance(dt) {
            body.expired = true;
        }
    }
}

/// Platform integration. Runs once per frame with the full frame `dt`.
pub fn run_platform(world: &mut World, world_size: WorldSize, dt: f64) {
    for (_entity, (platform, body)) in world.query_mut::<(&Platform, &mut RigidBody)>() {
        if platform.thrust_on {
            body.velocity += angle_to_vector(body.rotation) * PLATFORM_THRUST * dt;
        }
        body.velocity *= PLATFORM_DAMPING;
        body.integrate(dt);
        body.position = world_size.wrap(body.position);
    }
}
