//! Flight-dynamics integration for guided missiles and kill vehicles.
//!
//! A missile's substep composes, in order: target bookkeeping, guidance,
//! steering (direct rotation, control surfaces or thruster duty cycles),
//! aerodynamic and thrust forces, integration, fuel burn and expiry checks.
//! The target is a non-owning `hecs::Entity`; a target that has vanished or
//! been flagged expired ends the flight on the very next substep.

use hecs::Entity;

use pronav_core::components::RigidBody;
use pronav_core::constants::*;
use pronav_core::enums::{ExpiryReason, FlightPhase, GuidanceKind, MissileKind};
use pronav_core::geometry::{
    angle_diff, angle_to_vector, clamp_angle_180, cross, factor, transform, vector_angle,
};
use pronav_core::state::{BodyView, MissileView};
use pronav_core::types::{Vec2, WorldSize};

use crate::aero::{AeroSurface, FixturePoint};
use crate::environment::AirState;
use crate::guidance::{Guidance, Kinematics};

/// Run-wide switches that affect every missile in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightContext {
    pub world: WorldSize,
    pub expire_on_miss: bool,
}

impl Default for FlightContext {
    fn default() -> Self {
        Self {
            world: WorldSize::default(),
            expire_on_miss: false,
        }
    }
}

/// What happened to a missile during one substep.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    pub new_miss: bool,
    pub expired: Option<ExpiryReason>,
}

/// Movable fins and the fixture points used for torque.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSurfaces {
    pub tail: AeroSurface,
    pub nose: AeroSurface,
    pub center_of_thrust: FixturePoint,
    pub warhead_cm: FixturePoint,
    pub motor_cm: FixturePoint,
    pub thrust_vectoring: bool,
}

impl ControlSurfaces {
    fn new(thrust_vectoring: bool) -> Self {
        Self {
            tail: AeroSurface::new(Vec2::new(-22.0, 0.0), 0.2, 40.0, 7000.0),
            nose: AeroSurface::new(Vec2::new(19.5, 0.0), 0.05, 20.0, 5000.0),
            center_of_thrust: FixturePoint::new(Vec2::new(-22.0, 0.0)),
            warhead_cm: FixturePoint::new(Vec2::new(4.0, 0.0)),
            motor_cm: FixturePoint::new(Vec2::new(-11.0, 0.0)),
            thrust_vectoring,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Airframe {
    /// A finned missile. Without control surfaces it is steered by rotating
    /// the body straight to the guidance heading.
    Aerodynamic {
        hull: AeroSurface,
        controls: Option<ControlSurfaces>,
    },
    /// Symmetric thrusters, no aerodynamics. Values are duty cycles in `[0, 1]`.
    KillVehicle { thrusters: [f64; KV_THRUSTERS] },
}

/// A guided munition in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct GuidedMissile {
    pub target: Entity,
    pub guidance: Guidance,
    pub airframe: Airframe,
    pub age: f64,
    pub fuel: f64,
    pub boost_fuel: f64,
    pub phase: FlightPhase,
    pub distance_travelled: f64,
    pub expiry: Option<ExpiryReason>,
}

impl GuidedMissile {
    /// A finned missile launched from `body`.
    pub fn guided(
        target: Entity,
        body: &RigidBody,
        guidance: GuidanceKind,
        control_surfaces: bool,
        thrust_vectoring: bool,
    ) -> Self {
        let hull = if control_surfaces {
            AeroSurface::new(Vec2::ZERO, 0.15, 0.0, 4000.0)
        } else {
            AeroSurface::fixed(Vec2::ZERO, 0.4)
        };
        Self {
            target,
            guidance: Guidance::new(guidance, &Kinematics::of(body)),
            airframe: Airframe::Aerodynamic {
                hull,
                controls: control_surfaces.then(|| ControlSurfaces::new(thrust_vectoring)),
            },
            age: 0.0,
            fuel: MISSILE_FUEL,
            boost_fuel: MISSILE_BOOST_FUEL,
            phase: FlightPhase::Launched,
            distance_travelled: 0.0,
            expiry: None,
        }
    }

    /// A kill vehicle. It always flies Advanced guidance.
    pub fn kill_vehicle(target: Entity, body: &RigidBody) -> Self {
        Self {
            target,
            guidance: Guidance::new(GuidanceKind::Advanced, &Kinematics::of(body)),
            airframe: Airframe::KillVehicle {
                thrusters: [0.0; KV_THRUSTERS],
            },
            age: 0.0,
            fuel: KV_FUEL,
            boost_fuel: 0.0,
            phase: FlightPhase::Launched,
            distance_travelled: 0.0,
            expiry: None,
        }
    }

    pub fn kind(&self) -> MissileKind {
        match self.airframe {
            Airframe::Aerodynamic { .. } => MissileKind::Guided,
            Airframe::KillVehicle { .. } => MissileKind::KillVehicle,
        }
    }

    pub fn mass(&self) -> f64 {
        match self.airframe {
            Airframe::Aerodynamic { .. } => MISSILE_DRY_MASS + self.fuel + self.boost_fuel,
            Airframe::KillVehicle { .. } => KV_MASS,
        }
    }

    pub fn out_of_fuel(&self) -> bool {
        self.fuel <= 0.0 && self.boost_fuel <= 0.0
    }

    /// Flag the missile and its body for removal. The first reason sticks.
    pub fn expire(&mut self, body: &mut RigidBody, reason: ExpiryReason) {
        if self.expiry.is_none() {
            log::debug!("missile expired: {reason:?}");
            self.expiry = Some(reason);
        }
        self.phase = FlightPhase::Expired;
        body.expired = true;
    }

    /// Advance one substep.
    pub fn step(
        &mut self,
        body: &mut RigidBody,
        target: Option<&RigidBody>,
        air: &AirState,
        ctx: &FlightContext,
        dt: f64,
    ) -> StepOutcome {
        if self.expiry.is_some() {
            return StepOutcome::default();
        }

        let target = match target {
            Some(t) if !t.expired => t,
            _ => return self.finish(body, ExpiryReason::TargetLost, false),
        };

        self.age += dt;
        let aim = Kinematics::aim_at(target);
        let command =
            self.guidance
                .guide_to(&Kinematics::of(body), &aim, self.distance_travelled, dt);

        let mass = self.mass();
        let fuel_weight = self.fuel + self.boost_fuel;
        let thrust = if self.boost_fuel > 0.0 {
            MISSILE_BOOST_THRUST
        } else if self.fuel > 0.0 {
            MISSILE_THRUST
        } else {
            0.0
        };

        let force = match &mut self.airframe {
            Airframe::Aerodynamic { hull, controls } => {
                let force = match controls {
                    Some(controls) => steer_with_surfaces(
                        body,
                        hull,
                        controls,
                        command.heading,
                        thrust,
                        fuel_weight,
                        air,
                        dt,
                    ),
                    None => {
                        body.set_rotation(command.heading);
                        body.rotation_speed = 0.0;
                        hull.update(body, dt);
                        hull.compute_force(body.velocity, air)
                            + angle_to_vector(body.rotation) * thrust
                    }
                };
                burn(
                    &mut self.boost_fuel,
                    &mut self.fuel,
                    MISSILE_BURN_RATE * dt * thrust / MISSILE_THRUST,
                );
                force
            }
            Airframe::KillVehicle { thrusters } => {
                let desired = kill_vehicle_heading(body, aim.position, command.heading);
                let mut force = Vec2::ZERO;
                let mut duty = 0.0;
                for (i, amount) in thrusters.iter_mut().enumerate() {
                    let direction = body.rotation + 360.0 * i as f64 / KV_THRUSTERS as f64;
                    *amount = if self.fuel > 0.0 {
                        1.0 - factor(angle_diff(desired, direction), 90.0)
                    } else {
                        0.0
                    };
                    force += angle_to_vector(direction) * KV_THRUST * *amount;
                    duty += *amount;
                }
                self.fuel = (self.fuel - KV_BURN_RATE * duty * dt).max(0.0);
                force
            }
        };

        body.velocity += force * dt / mass;
        body.integrate(dt);
        self.distance_travelled += body.speed() * dt;

        self.phase = if self.boost_fuel > 0.0 {
            FlightPhase::Boosting
        } else if self.fuel > 0.0 {
            FlightPhase::Cruising
        } else {
            FlightPhase::Coasting
        };

        if command.new_miss && ctx.expire_on_miss {
            return self.finish(body, ExpiryReason::Missed, true);
        }
        if self.age > MISSILE_LIFESPAN {
            return self.finish(body, ExpiryReason::Timeout, command.new_miss);
        }
        if self.out_of_fuel() && body.speed() <= MISSILE_MIN_SPEED {
            return self.finish(body, ExpiryReason::FuelExhausted, command.new_miss);
        }
        if !ctx.world.contains_padded(body.position, MISSILE_OOB_PADDING) {
            return self.finish(body, ExpiryReason::OutOfBounds, command.new_miss);
        }

        StepOutcome {
            new_miss: command.new_miss,
            expired: None,
        }
    }

    fn finish(&mut self, body: &mut RigidBody, reason: ExpiryReason, new_miss: bool) -> StepOutcome {
        self.expire(body, reason);
        StepOutcome {
            new_miss,
            expired: Some(reason),
        }
    }

    pub fn view(&self, body: BodyView, target_id: u64) -> MissileView {
        let (surfaces, thrusters) = match &self.airframe {
            Airframe::Aerodynamic { hull, controls } => {
                let mut surfaces = vec![hull.view()];
                if let Some(c) = controls {
                    surfaces.push(c.tail.view());
                    surfaces.push(c.nose.view());
                }
                (surfaces, Vec::new())
            }
            Airframe::KillVehicle { thrusters } => (Vec::new(), thrusters.to_vec()),
        };
        MissileView {
            body,
            target_id,
            kind: self.kind(),
            guidance: self.guidance.kind(),
            phase: self.phase,
            fuel: self.fuel + self.boost_fuel,
            age: self.age,
            distance_travelled: self.distance_travelled,
            missed: self.guidance.missed(),
            impact_point: self.guidance.aim.impact,
            stable_aim_point: self.guidance.aim.stable,
            current_aim_point: self.guidance.aim.current,
            surfaces,
            thrusters,
        }
    }
}

/// Fin deflection, surface forces and torque for a finned missile.
/// Returns the net linear force and updates the body's rotation speed.
#[allow(clippy::too_many_arguments)]
fn steer_with_surfaces(
    body: &mut RigidBody,
    hull: &mut AeroSurface,
    controls: &mut ControlSurfaces,
    heading: f64,
    thrust: f64,
    fuel_weight: f64,
    air: &AirState,
    dt: f64,
) -> Vec2 {
    let speed = body.speed();
    let velocity_heading = vector_angle(body.velocity);
    let desired = if speed > f64::EPSILON {
        clamp_angle_180(heading - velocity_heading)
    } else {
        0.0
    };

    // Less authority at high speed, high body angle of attack, and while
    // already spinning the way we want to turn.
    let body_aoa = angle_diff(body.rotation, velocity_heading);
    let mut authority = (1.0 - factor(body_aoa, MAX_DEFLECTION_AOA))
        * (1.0 - 0.5 * factor(speed, DEFLECTION_FADE_SPEED));
    if desired * body.rotation_speed > 0.0 {
        authority *= 1.0 - factor(body.rotation_speed.abs(), MAX_DEFLECTION_ROT_SPEED);
    }
    controls
        .tail
        .set_deflection(-desired * TAIL_AUTHORITY * authority);
    controls
        .nose
        .set_deflection(desired * NOSE_AUTHORITY * authority);

    controls.center_of_thrust.update(body);
    controls.warhead_cm.update(body);
    controls.motor_cm.update(body);
    let cg = (controls.warhead_cm.position * MISSILE_DRY_MASS
        + controls.motor_cm.position * fuel_weight)
        / (MISSILE_DRY_MASS + fuel_weight);

    let mut force = Vec2::ZERO;
    let mut torque = 0.0;
    for surface in [hull, &mut controls.tail, &mut controls.nose] {
        surface.update(body, dt);
        let f = surface.compute_force(body.velocity, air);
        torque += cross(surface.position - cg, f);
        force += f;
    }

    let vector_offset = if controls.thrust_vectoring && thrust > 0.0 {
        controls.tail.deflection() * THRUST_VECTOR_AMOUNT
    } else {
        0.0
    };
    let thrust_force = angle_to_vector(body.rotation + vector_offset) * thrust;
    torque += cross(controls.center_of_thrust.position - cg, thrust_force);
    force += thrust_force;

    body.rotation_speed += torque * dt / (MISSILE_DRY_MASS + fuel_weight);
    force
}

/// Thrust direction for a kill vehicle: the guidance heading, rotated
/// against the velocity's lateral drift away from it.
fn kill_vehicle_heading(body: &RigidBody, target: Vec2, heading: f64) -> f64 {
    let speed = body.speed();
    if speed <= f64::EPSILON {
        return vector_angle(target - body.position);
    }
    let drift = cross(angle_to_vector(heading), body.velocity / speed)
        .clamp(-1.0, 1.0)
        .asin()
        .to_degrees();
    heading - drift
}

/// Burn boost fuel first, then sustainer fuel.
fn burn(boost_fuel: &mut f64, fuel: &mut f64, amount: f64) {
    if *boost_fuel > 0.0 {
        *boost_fuel = (*boost_fuel - amount).max(0.0);
    } else {
        *fuel = (*fuel - amount).max(0.0);
    }
}

/// Local-frame outline of a finned missile, nose along +x.
pub fn missile_polygon() -> Vec<Vec2> {
    vec![
        Vec2::new(24.0, 0.0),
        Vec2::new(-22.0, 4.0),
        Vec2::new(-22.0, -4.0),
    ]
}

/// Local-frame outline of a kill vehicle.
pub fn kill_vehicle_polygon() -> Vec<Vec2> {
    (0..4)
        .map(|i| transform(Vec2::new(8.0, 0.0), 45.0 + 90.0 * i as f64, Vec2::ZERO, 1.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecs::World;
    use test_log::test;

    const DT: f64 = 0.0075;

    fn dummy_target() -> Entity {
        World::new().spawn((0u8,))
    }

    fn static_target(position: Vec2) -> RigidBody {
        RigidBody::new(position, Vec2::ZERO, 0.0).with_polygon(
            (0..8)
                .map(|i| angle_to_vector(45.0 * i as f64) * TARGET_POLY_RADIUS)
                .collect(),
        )
    }

    fn launch(kind: GuidanceKind, rotation: f64, surfaces: bool) -> (GuidedMissile, RigidBody) {
        let body = RigidBody::new(Vec2::ZERO, Vec2::ZERO, rotation).with_polygon(missile_polygon());
        let missile = GuidedMissile::guided(dummy_target(), &body, kind, surfaces, false);
        (missile, body)
    }

    /// Fly until the missile expires or `max_steps` pass; returns the closest
    /// approach to the target and the fuel left at that moment.
    fn fly(
        missile: &mut GuidedMissile,
        body: &mut RigidBody,
        target: &RigidBody,
        max_steps: usize,
    ) -> (f64, f64) {
        let ctx = FlightContext::default();
        let air = AirState::default();
        let mut closest = f64::INFINITY;
        let mut fuel_at_closest = missile.fuel;
        for _ in 0..max_steps {
            let outcome = missile.step(body, Some(target), &air, &ctx, DT);
            let d = body.position.distance(target.position);
            if d < closest {
                closest = d;
                fuel_at_closest = missile.fuel + missile.boost_fuel;
            }
            if outcome.expired.is_some() {
                break;
            }
        }
        (closest, fuel_at_closest)
    }

    #[test]
    fn test_simple_pn_reaches_static_target_before_fuel_runs_out() {
        let (mut missile, mut body) = launch(GuidanceKind::SimplePN, 0.0, false);
        let target = static_target(angle_to_vector(3.0) * 1000.0);
        let steps = (MISSILE_LIFESPAN / DT) as usize;
        let (closest, fuel) = fly(&mut missile, &mut body, &target, steps);
        assert!(closest < TARGET_POLY_RADIUS, "closest approach {closest:.1}");
        assert!(fuel > 0.0);
    }

    #[test]
    fn test_every_law_closes_on_static_target() {
        for kind in GuidanceKind::ALL {
            let (mut missile, mut body) = launch(kind, 0.0, false);
            let target = static_target(angle_to_vector(10.0) * 1500.0);
            let (closest, _) = fly(&mut missile, &mut body, &target, 3000);
            assert!(closest < TARGET_POLY_RADIUS, "{kind:?} closest {closest:.1}");
        }
    }

    #[test]
    fn test_expired_target_ends_flight_next_substep() {
        let (mut missile, mut body) = launch(GuidanceKind::Advanced, 0.0, false);
        let mut target = static_target(Vec2::new(2000.0, 0.0));
        let ctx = FlightContext::default();
        let air = AirState::default();
        for _ in 0..50 {
            assert_eq!(
                missile.step(&mut body, Some(&target), &air, &ctx, DT).expired,
                None
            );
        }
        target.expired = true;
        let outcome = missile.step(&mut body, Some(&target), &air, &ctx, DT);
        assert_eq!(outcome.expired, Some(ExpiryReason::TargetLost));
        assert_eq!(missile.phase, FlightPhase::Expired);
        assert!(body.expired);

        // Already expired: later substeps are no-ops.
        let age = missile.age;
        assert_eq!(
            missile.step(&mut body, None, &air, &ctx, DT),
            StepOutcome::default()
        );
        assert_eq!(missile.age, age);
    }

    #[test]
    fn test_missing_target_entity_is_target_lost() {
        let (mut missile, mut body) = launch(GuidanceKind::BasicLOS, 0.0, false);
        let outcome = missile.step(
            &mut body,
            None,
            &AirState::default(),
            &FlightContext::default(),
            DT,
        );
        assert_eq!(outcome.expired, Some(ExpiryReason::TargetLost));
    }

    #[test]
    fn test_flight_phases_follow_fuel() {
        let (mut missile, mut body) = launch(GuidanceKind::SimplePN, 0.0, false);
        body.velocity = Vec2::new(400.0, 0.0);
        assert_eq!(missile.phase, FlightPhase::Launched);
        let target = static_target(Vec2::new(1.0e5, 0.0));
        let ctx = FlightContext {
            world: WorldSize::new(1.0e6, 1.0e6),
            ..Default::default()
        };
        let air = AirState::default();

        missile.step(&mut body, Some(&target), &air, &ctx, DT);
        assert_eq!(missile.phase, FlightPhase::Boosting);

        missile.boost_fuel = 0.0;
        missile.step(&mut body, Some(&target), &air, &ctx, DT);
        assert_eq!(missile.phase, FlightPhase::Cruising);

        missile.fuel = 0.0;
        missile.step(&mut body, Some(&target), &air, &ctx, DT);
        assert_eq!(missile.phase, FlightPhase::Coasting);
    }

    #[test]
    fn test_coasting_missile_expires_below_min_speed() {
        let (mut missile, mut body) = launch(GuidanceKind::SimplePN, 0.0, false);
        missile.fuel = 0.0;
        missile.boost_fuel = 0.0;
        body.velocity = Vec2::new(MISSILE_MIN_SPEED + 1.0, 0.0);
        let target = static_target(Vec2::new(1000.0, 0.0));
        let air = AirState::default();
        let ctx = FlightContext::default();

        let outcome = missile.step(&mut body, Some(&target), &air, &ctx, DT);
        assert_eq!(outcome.expired, None);
        assert_eq!(missile.phase, FlightPhase::Coasting);

        body.velocity = Vec2::new(MISSILE_MIN_SPEED - 1.0, 0.0);
        let outcome = missile.step(&mut body, Some(&target), &air, &ctx, DT);
        assert_eq!(outcome.expired, Some(ExpiryReason::FuelExhausted));
        assert_eq!(missile.phase, FlightPhase::Expired);
    }

    #[test]
    fn test_boost_burns_before_sustainer() {
        let mut boost = 1.0;
        let mut fuel = 10.0;
        burn(&mut boost, &mut fuel, 0.4);
        assert_eq!((boost, fuel), (0.6, 10.0));
        burn(&mut boost, &mut fuel, 5.0);
        assert_eq!((boost, fuel), (0.0, 10.0));
        burn(&mut boost, &mut fuel, 2.5);
        assert_eq!((boost, fuel), (0.0, 7.5));
    }

    #[test]
    fn test_out_of_fuel_and_slow_expires() {
        let (mut missile, mut body) = launch(GuidanceKind::SimplePN, 0.0, false);
        missile.fuel = 0.0;
        missile.boost_fuel = 0.0;
        let target = static_target(Vec2::new(1000.0, 0.0));
        let outcome = missile.step(
            &mut body,
            Some(&target),
            &AirState::default(),
            &FlightContext::default(),
            DT,
        );
        assert_eq!(outcome.expired, Some(ExpiryReason::FuelExhausted));
    }

    #[test]
    fn test_lifespan_timeout() {
        let (mut missile, mut body) = launch(GuidanceKind::SimplePN, 0.0, false);
        missile.age = MISSILE_LIFESPAN;
        let target = static_target(Vec2::new(1000.0, 0.0));
        let outcome = missile.step(
            &mut body,
            Some(&target),
            &AirState::default(),
            &FlightContext::default(),
            DT,
        );
        assert_eq!(outcome.expired, Some(ExpiryReason::Timeout));
    }

    #[test]
    fn test_out_of_bounds() {
        let (mut missile, mut body) = launch(GuidanceKind::SimplePN, 0.0, false);
        body.position = Vec2::new(-MISSILE_OOB_PADDING - 10.0, 0.0);
        let target = static_target(Vec2::new(1000.0, 0.0));
        let outcome = missile.step(
            &mut body,
            Some(&target),
            &AirState::default(),
            &FlightContext::default(),
            DT,
        );
        assert_eq!(outcome.expired, Some(ExpiryReason::OutOfBounds));
    }

    #[test]
    fn test_control_surface_missile_turns_toward_target() {
        let (mut missile, mut body) = launch(GuidanceKind::SimplePN, 0.0, true);
        body.velocity = Vec2::new(400.0, 0.0);
        missile.distance_travelled = ARM_DIST;
        let target = static_target(Vec2::new(1500.0, 600.0));
        let ctx = FlightContext::default();
        let air = AirState::default();
        for _ in 0..40 {
            missile.step(&mut body, Some(&target), &air, &ctx, DT);
        }
        let Airframe::Aerodynamic {
            controls: Some(controls),
            ..
        } = &missile.airframe
        else {
            panic!("expected control surfaces");
        };
        assert!(controls.tail.deflection() < 0.0);
        assert!(body.velocity.y > 0.0, "velocity {:?}", body.velocity);

        let view = missile.view(BodyView::default(), 7);
        assert_eq!(view.surfaces.len(), 3);
        assert!(view.thrusters.is_empty());
    }

    #[test]
    fn test_kill_vehicle_thrusts_at_target_from_rest() {
        let body = RigidBody::new(Vec2::ZERO, Vec2::ZERO, 0.0).with_polygon(kill_vehicle_polygon());
        let mut kv = GuidedMissile::kill_vehicle(dummy_target(), &body);
        let mut body = body;
        assert_eq!(kv.kind(), MissileKind::KillVehicle);
        assert_eq!(kv.guidance.kind(), GuidanceKind::Advanced);

        let target = static_target(Vec2::new(0.0, 800.0));
        kv.step(
            &mut body,
            Some(&target),
            &AirState::default(),
            &FlightContext::default(),
            DT,
        );
        let Airframe::KillVehicle { thrusters } = kv.airframe else {
            panic!("expected kill vehicle");
        };
        // The +y thruster is fully open, the opposite one closed.
        assert_eq!(thrusters[1], 1.0);
        assert_eq!(thrusters[3], 0.0);
        assert!(body.velocity.y > 0.0);
        assert!(kv.fuel < KV_FUEL);
    }

    #[test]
    fn test_kill_vehicle_reaches_target() {
        let body = RigidBody::new(Vec2::ZERO, Vec2::ZERO, 0.0).with_polygon(kill_vehicle_polygon());
        let mut kv = GuidedMissile::kill_vehicle(dummy_target(), &body);
        let mut body = body;
        let target = static_target(Vec2::new(900.0, 300.0));
        let (closest, _) = fly(&mut kv, &mut body, &target, 4000);
        assert!(closest < TARGET_POLY_RADIUS, "closest approach {closest:.1}");
    }
}
