//! Snapshot system: queries the ECS world and builds a complete SimSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::{Entity, World};

use pronav_core::components::*;
use pronav_core::events::SimEvent;
use pronav_core::state::*;
use pronav_core::types::SimTime;

use crate::ballistics::Bullet;
use crate::engine::SimConfig;
use crate::missile::GuidedMissile;

/// Everything outside the world that goes into a snapshot.
pub struct SnapshotContext<'a> {
    pub time: SimTime,
    pub paused: bool,
    pub settings: &'a SimConfig,
    pub environment: EnvironmentView,
    pub grid: GridView,
}

/// Build a complete SimSnapshot from the current world state.
pub fn build_snapshot(world: &World, ctx: SnapshotContext<'_>, events: Vec<SimEvent>) -> SimSnapshot {
    SimSnapshot {
        time: ctx.time,
        paused: ctx.paused,
        guidance: ctx.settings.guidance,
        missile_kind: ctx.settings.missile_kind,
        target_profile: ctx.settings.target_profile,
        platform: build_platform(world),
        targets: build_targets(world),
        missiles: build_missiles(world),
        bullets: build_bullets(world),
        explosions: build_explosions(world),
        environment: ctx.environment,
        grid: ctx.grid,
        events,
    }
}

pub fn body_view(entity: Entity, body: &RigidBody) -> BodyView {
    BodyView {
        id: entity.to_bits().get(),
        position: body.position,
        velocity: body.velocity,
        rotation: body.rotation,
        polygon: body.world_polygon(),
    }
}

fn build_platform(world: &World) -> BodyView {
    world
        .query::<(&Platform, &RigidBody)>()
        .iter()
        .next()
        .map(|(entity, (_, body))| body_view(entity, body))
        .unwrap_or_default()
}

fn build_targets(world: &World) -> Vec<TargetView> {
    world
        .query::<(&Target, &RigidBody)>()
        .iter()
        .map(|(entity, (target, body))| TargetView {
            body: body_view(entity, body),
            profile: target.profile,
        })
        .collect()
}

fn build_missiles(world: &World) -> Vec<MissileView> {
    world
        .query::<(&GuidedMissile, &RigidBody)>()
        .iter()
        .map(|(entity, (missile, body))| {
            missile.view(body_view(entity, body), missile.target.to_bits().get())
        })
        .collect()
}

fn build_bullets(world: &World) -> Vec<BodyView> {
    world
        .query::<(&Bullet, &RigidBody)>()
        .iter()
        .map(|(entity, (_, body))| body_view(entity, body))
        .collect()
}

fn build_explosions(world: &World) -> Vec<ExplosionView> {
    world
        .query::<(&Explosion, &RigidBody)>()
        .iter()
        .map(|(_, (explosion, body))| ExplosionView {
            position: body.position,
            radius: explosion.radius,
        })
        .collect()
}
