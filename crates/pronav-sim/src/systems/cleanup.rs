//! Cleanup system: removes every body flagged expired during the substep.

use hecs::{Entity, World};

use pronav_core::components::{Platform, RigidBody};

/// Collect flagged entities, then despawn them in one pass.
/// Uses a pre-allocated buffer to avoid per-substep allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, (body, platform)) in world.query_mut::<(&RigidBody, Option<&Platform>)>() {
        if body.expired && platform.is_none() {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
