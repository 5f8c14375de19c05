//! Missile flight system: one flight-dynamics substep per missile.

use hecs::{Entity, World};

use pronav_core::components::RigidBody;
use pronav_core::events::SimEvent;

use crate::environment::AirState;
use crate::missile::{FlightContext, GuidedMissile};

/// Step every missile and report misses and expiries.
pub fn run(
    world: &mut World,
    air: &AirState,
    ctx: &FlightContext,
    dt: f64,
    events: &mut Vec<SimEvent>,
) {
    // Snapshot each missile's target first (avoid borrow conflicts with hecs).
    let targets: Vec<(Entity, Option<RigidBody>)> = world
        .query::<&GuidedMissile>()
        .iter()
        .map(|(entity, missile)| {
            let target = world
                .get::<&RigidBody>(missile.target)
                .ok()
                .map(|body| (*body).clone());
            (entity, target)
        })
        .collect();

    for (entity, target) in targets {
        let Ok((missile, body)) =
            world.query_one_mut::<(&mut GuidedMissile, &mut RigidBody)>(entity)
        else {
            continue;
        };
        let outcome = missile.step(body, target.as_ref(), air, ctx, dt);

        let id = entity.to_bits().get();
        if outcome.new_miss {
            events.push(SimEvent::MissileMissed {
                id,
                miss_count: missile.guidance.miss_count(),
            });
        }
        if let Some(reason) = outcome.expired {
            events.push(SimEvent::MissileExpired { id, reason });
        }
    }
}
