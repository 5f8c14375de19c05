//! Entity spawn factories.
//!
//! Every body is a `RigidBody` plus a marker or behaviour component:
//! `Platform`, `Target` (with `ErraticManeuver` for erratic targets),
//! `GuidedMissile`, `Bullet` or `Explosion`.

use hecs::{Entity, EntityBuilder, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use pronav_core::components::*;
use pronav_core::constants::*;
use pronav_core::enums::{GuidanceKind, MissileKind, TargetProfile};
use pronav_core::geometry::angle_to_vector;
use pronav_core::types::{Vec2, WorldSize};

use crate::ballistics::{self, Bullet};
use crate::maneuver::{self, ErraticManeuver};
use crate::missile::{self, GuidedMissile};

/// Star-shaped random polygon: `points` vertices at even angles with radii
/// drawn from `[radius / 2, radius)`.
pub fn random_polygon(rng: &mut ChaCha8Rng, points: usize, radius: f64) -> Vec<Vec2> {
    let points = points.max(3);
    (0..points)
        .map(|i| {
            let angle = 360.0 * i as f64 / points as f64;
            angle_to_vector(angle) * rng.gen_range(radius * 0.5..radius)
        })
        .collect()
}

/// A random position in the central half of the field.
pub fn random_target_position(rng: &mut ChaCha8Rng, world_size: WorldSize) -> Vec2 {
    let center = world_size.center();
    let half = center * 0.5;
    Vec2::new(
        rng.gen_range(center.x - half.x..center.x + half.x),
        rng.gen_range(center.y - half.y..center.y + half.y),
    )
}

/// Spawn the launch platform, pointing along +x.
pub fn spawn_platform(world: &mut World, position: Vec2) -> Entity {
    let arrow = vec![
        Vec2::new(20.0, 0.0),
        Vec2::new(-12.0, 10.0),
        Vec2::new(-6.0, 0.0),
        Vec2::new(-12.0, -10.0),
    ];
    world.spawn((
        Platform::default(),
        RigidBody::new(position, Vec2::ZERO, 0.0).with_polygon(arrow),
    ))
}

/// Spawn a target. A `Random` profile is resolved to a concrete one here.
pub fn spawn_target(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    position: Vec2,
    profile: TargetProfile,
) -> Entity {
    let profile = maneuver::resolve_profile(profile, rng);
    let radius = maneuver::polygon_radius(profile);
    let (velocity, spin) = maneuver::initial_motion(profile, rng);
    let body = RigidBody::new(position, velocity, 0.0)
        .with_polygon(random_polygon(rng, TARGET_POLY_POINTS, radius))
        .with_rotation_speed(spin);

    let mut builder = EntityBuilder::new();
    if profile == TargetProfile::Erratic {
        builder.add(ErraticManeuver::new(&body));
    }
    builder.add(Target {
        profile,
        radius,
        point_count: TARGET_POLY_POINTS,
    });
    builder.add(body);
    world.spawn(builder.build())
}

/// Launch settings for one missile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchSpec {
    pub kind: MissileKind,
    pub guidance: GuidanceKind,
    pub control_surfaces: bool,
    pub thrust_vectoring: bool,
}

/// Launch a missile from `launcher`'s position, velocity and heading.
pub fn spawn_missile(
    world: &mut World,
    target: Entity,
    launcher: &RigidBody,
    spec: LaunchSpec,
) -> Entity {
    let body = RigidBody::new(launcher.position, launcher.velocity, launcher.rotation);
    match spec.kind {
        MissileKind::Guided => {
            let missile = GuidedMissile::guided(
                target,
                &body,
                spec.guidance,
                spec.control_surfaces,
                spec.thrust_vectoring,
            );
            world.spawn((missile, body.with_polygon(missile::missile_polygon())))
        }
        MissileKind::KillVehicle => {
            let missile = GuidedMissile::kill_vehicle(target, &body);
            world.spawn((missile, body.with_polygon(missile::kill_vehicle_polygon())))
        }
    }
}

/// Fire a targeted round from `origin` with an aim-ahead solution.
pub fn spawn_bullet(
    world: &mut World,
    target: Entity,
    target_body: &RigidBody,
    origin: Vec2,
) -> Entity {
    let velocity = ballistics::firing_solution(origin, target_body, BULLET_SPEED);
    world.spawn((
        Bullet::targeted(target),
        RigidBody::new(origin, velocity, 0.0),
    ))
}

/// Release a ring of `FRAGMENT_COUNT` fragments from `position`, evenly
/// spread starting along +x.
pub fn spawn_fragment_ring(world: &mut World, position: Vec2) -> Vec<Entity> {
    (0..FRAGMENT_COUNT)
        .map(|i| {
            let angle = 360.0 * i as f64 / FRAGMENT_COUNT as f64;
            let velocity = angle_to_vector(angle) * FRAGMENT_SPEED;
            world.spawn((Bullet::fragment(), RigidBody::new(position, velocity, 0.0)))
        })
        .collect()
}

pub fn spawn_explosion(world: &mut World, position: Vec2) -> Entity {
    world.spawn((
        Explosion::new(EXPLOSION_RADIUS, EXPLOSION_DURATION),
        RigidBody::new(position, Vec2::ZERO, 0.0),
    ))
}
