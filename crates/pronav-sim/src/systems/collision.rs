//! Collision resolution, run once per substep after everything has moved.
//!
//! 1. Rebuild the spatial grid.
//! 2. For each live target, test everything in its 3×3 neighbourhood.
//!    Explosions hit by proximity; missiles and bullets by polygon or point
//!    containment plus a one-substep sweep along their velocity.
//! 3. On a hit both sides are flagged expired (explosions persist) and a new
//!    explosion is spawned at the target.
//! 4. Proximity-fused bullets detonate near their own target, releasing a
//!    ring of short-lived fragments that can hit anything from the next
//!    substep on.
//!
//! Nothing is despawned here; the cleanup system removes flagged bodies.

use hecs::{Entity, World};

use pronav_core::components::{Explosion, RigidBody, Target};
use pronav_core::enums::ExpiryReason;
use pronav_core::events::SimEvent;
use pronav_core::types::Vec2;

use crate::ballistics::Bullet;
use crate::body::bodies_collide;
use crate::grid::SpatialGrid;
use crate::missile::GuidedMissile;
use crate::world_setup;

pub fn run(world: &mut World, grid: &mut SpatialGrid, dt: f64, events: &mut Vec<SimEvent>) {
    grid.update(world);

    let targets: Vec<(Entity, RigidBody)> = world
        .query::<(&Target, &RigidBody)>()
        .iter()
        .filter(|(_, (_, body))| !body.expired)
        .map(|(entity, (_, body))| (entity, body.clone()))
        .collect();

    let mut blasts: Vec<Vec2> = Vec::new();
    for (target_entity, target_body) in &targets {
        for candidate in grid.get_nearest(target_body.position) {
            if candidate == *target_entity || world.get::<&Target>(candidate).is_ok() {
                continue;
            }
            if !hits(world, target_body, candidate, dt) {
                continue;
            }

            if let Ok(mut body) = world.get::<&mut RigidBody>(*target_entity) {
                body.expired = true;
            }
            expire_candidate(world, candidate, events);

            events.push(SimEvent::TargetDestroyed {
                id: target_entity.to_bits().get(),
                position: target_body.position,
            });
            blasts.push(target_body.position);
            break;
        }
    }

    for position in blasts {
        let entity = world_setup::spawn_explosion(world, position);
        grid.insert(entity, position);
        events.push(SimEvent::ExplosionSpawned { position });
    }

    for position in detonate_bullets(world) {
        let fragments = world_setup::spawn_fragment_ring(world, position);
        for &fragment in &fragments {
            grid.insert(fragment, position);
        }
        events.push(SimEvent::BulletDetonated {
            position,
            fragments: fragments.len(),
        });
    }
}

/// Does `candidate` hit the target this substep?
fn hits(world: &World, target: &RigidBody, candidate: Entity, dt: f64) -> bool {
    let Ok(body) = world.get::<&RigidBody>(candidate) else {
        return false;
    };
    if body.expired {
        return false;
    }
    match world.get::<&Explosion>(candidate) {
        Ok(explosion) => explosion.covers(body.position, target.position),
        Err(_) => bodies_collide(target, &body, dt),
    }
}

fn expire_candidate(world: &mut World, candidate: Entity, events: &mut Vec<SimEvent>) {
    if world.get::<&Explosion>(candidate).is_ok() {
        return;
    }
    let Ok((body, missile)) =
        world.query_one_mut::<(&mut RigidBody, Option<&mut GuidedMissile>)>(candidate)
    else {
        return;
    };
    match missile {
        Some(missile) => {
            missile.expire(body, ExpiryReason::Impact);
            events.push(SimEvent::MissileExpired {
                id: candidate.to_bits().get(),
                reason: ExpiryReason::Impact,
            });
        }
        None => body.expired = true,
    }
}

/// Flag every bullet within fuse range of its live target and return the
/// detonation points.
fn detonate_bullets(world: &mut World) -> Vec<Vec2> {
    let fused: Vec<(Entity, Vec2)> = world
        .query::<(&Bullet, &RigidBody)>()
        .iter()
        .filter(|(_, (_, body))| !body.expired)
        .filter_map(|(entity, (bullet, body))| {
            let target = world.get::<&RigidBody>(bullet.target?).ok()?;
            bullet
                .should_detonate(body.position, &target)
                .then_some((entity, body.position))
        })
        .collect();

    for (entity, _) in &fused {
        if let Ok(mut body) = world.get::<&mut RigidBody>(*entity) {
            body.expired = true;
        }
    }
    fused.into_iter().map(|(_, position)| position).collect()
}
