//! Aerodynamic surfaces and fixture points.
//!
//! A surface is a child of its missile: it holds only a local offset and is
//! re-placed from the parent's pose every substep. The parent owns it; the
//! surface never refers back.

use pronav_core::components::RigidBody;
use pronav_core::constants::{MAX_SURFACE_SWEEP_SPEED, PARASITIC_DRAG, STALL_AOA};
use pronav_core::geometry::{angle_to_vector, clamp_angle, cross, factor, transform};
use pronav_core::state::SurfaceView;
use pronav_core::types::Vec2;

use crate::environment::AirState;

/// A point fixed to a parent body, e.g. a centre of mass or thrust.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixturePoint {
    pub offset: Vec2,
    pub position: Vec2,
}

impl FixturePoint {
    pub fn new(offset: Vec2) -> Self {
        Self {
            offset,
            position: offset,
        }
    }

    pub fn update(&mut self, parent: &RigidBody) {
        self.position = transform(self.offset, parent.rotation, parent.position, 1.0);
    }
}

/// Lift and drag acting on one surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AeroForce {
    pub lift: Vec2,
    pub drag: Vec2,
    /// Degrees, signed: positive when the heading is rotated toward +angle
    /// from the direction of travel through the air.
    pub angle_of_attack: f64,
}

impl AeroForce {
    pub fn total(&self) -> Vec2 {
        self.lift + self.drag
    }
}

/// Lift and drag on a flat surface pointing along `heading` in `airflow`
/// (the velocity of the air relative to the surface).
///
/// Lift is perpendicular to the flow and capped at `max_lift`; drag is along
/// the flow. Zero airflow produces no force.
pub fn aerodynamic_force(
    heading: f64,
    airflow: Vec2,
    area: f64,
    max_lift: f64,
    air_density: f64,
) -> AeroForce {
    let speed = airflow.length();
    if speed <= f64::EPSILON {
        return AeroForce::default();
    }

    let flow = airflow / speed;
    let aoa = cross(angle_to_vector(heading), flow).clamp(-1.0, 1.0).asin();
    let aoa_deg = aoa.to_degrees();
    let dynamic_pressure = 0.5 * air_density * speed * speed;

    let stall = 1.0 - factor(aoa_deg.abs(), STALL_AOA).powi(2);
    let lift = (dynamic_pressure * area * (2.0 * aoa).sin() * stall).clamp(-max_lift, max_lift);
    let drag = dynamic_pressure * area * (1.0 - (2.0 * aoa).cos()) + PARASITIC_DRAG * speed;

    AeroForce {
        lift: Vec2::new(flow.y, -flow.x) * lift,
        drag: flow * drag,
        angle_of_attack: aoa_deg,
    }
}

/// A lifting surface (fin, wing or body) attached to a missile.
#[derive(Debug, Clone, PartialEq)]
pub struct AeroSurface {
    pub offset: Vec2,
    pub area: f64,
    pub max_deflection: f64,
    pub max_lift: f64,
    deflection: f64,
    /// World placement, refreshed by `update`.
    pub position: Vec2,
    pub rotation: f64,
    /// Velocity from the surface sweeping around the parent's centre.
    pub swept_velocity: Vec2,
    prev_arm: Option<Vec2>,
    pub force: AeroForce,
}

impl AeroSurface {
    pub fn new(offset: Vec2, area: f64, max_deflection: f64, max_lift: f64) -> Self {
        Self {
            offset,
            area,
            max_deflection,
            max_lift,
            deflection: 0.0,
            position: offset,
            rotation: 0.0,
            swept_velocity: Vec2::ZERO,
            prev_arm: None,
            force: AeroForce::default(),
        }
    }

    /// A fixed surface with no lift cap.
    pub fn fixed(offset: Vec2, area: f64) -> Self {
        Self::new(offset, area, 0.0, f64::INFINITY)
    }

    pub fn deflection(&self) -> f64 {
        self.deflection
    }

    /// Set the control deflection, clamped to `±max_deflection`.
    pub fn set_deflection(&mut self, deflection: f64) {
        self.deflection = deflection.clamp(-self.max_deflection, self.max_deflection);
    }

    /// Follow the parent's pose and derive the swept velocity.
    ///
    /// The first call has no previous placement and reports zero swept
    /// velocity; later ones are capped at `MAX_SURFACE_SWEEP_SPEED`.
    pub fn update(&mut self, parent: &RigidBody, dt: f64) {
        let arm = transform(self.offset, parent.rotation, Vec2::ZERO, 1.0);
        self.position = parent.position + arm;
        self.rotation = clamp_angle(parent.rotation + self.deflection);

        let swept = match self.prev_arm {
            Some(prev) if dt > 0.0 => (arm - prev) / dt,
            _ => Vec2::ZERO,
        };
        self.prev_arm = Some(arm);

        self.swept_velocity = if swept.length() > MAX_SURFACE_SWEEP_SPEED {
            log::trace!("surface sweep {:.1} clamped", swept.length());
            swept.normalize() * MAX_SURFACE_SWEEP_SPEED
        } else {
            swept
        };
    }

    /// Evaluate lift and drag given the parent's velocity and the air.
    pub fn compute_force(&mut self, parent_velocity: Vec2, air: &AirState) -> Vec2 {
        let airflow = air.wind - (parent_velocity + self.swept_velocity);
        self.force = aerodynamic_force(
            self.rotation,
            airflow,
            self.area,
            self.max_lift,
            air.air_density,
        );
        self.force.total()
    }

    pub fn view(&self) -> SurfaceView {
        SurfaceView {
            position: self.position,
            rotation: self.rotation,
            deflection: self.deflection,
            angle_of_attack: self.force.angle_of_attack,
            lift: self.force.lift,
            drag: self.force.drag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use pronav_core::constants::AIR_DENSITY;
    use pronav_core::geometry::vector_angle;

    #[test]
    fn test_no_airflow_no_force() {
        let f = aerodynamic_force(30.0, Vec2::ZERO, 0.4, f64::INFINITY, AIR_DENSITY);
        assert_eq!(f, AeroForce::default());
    }

    #[test]
    fn test_aligned_flow_only_parasitic_drag() {
        // Flying along +x, air comes from +x.
        let airflow = Vec2::new(-300.0, 0.0);
        let f = aerodynamic_force(0.0, airflow, 0.4, f64::INFINITY, AIR_DENSITY);
        assert_abs_diff_eq!(f.angle_of_attack, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(f.lift.length(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(f.drag.x, -PARASITIC_DRAG * 300.0, epsilon = 1e-9);
        assert_abs_diff_eq!(f.drag.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_lift_turns_toward_heading() {
        // Moving along +x with the nose 10 degrees toward +y.
        let airflow = Vec2::new(-400.0, 0.0);
        let f = aerodynamic_force(10.0, airflow, 0.4, f64::INFINITY, AIR_DENSITY);
        assert_abs_diff_eq!(f.angle_of_attack, 10.0, epsilon = 1e-9);
        assert!(f.lift.y > 0.0);
        assert_abs_diff_eq!(f.lift.x, 0.0, epsilon = 1e-6);
        assert!(f.drag.x < 0.0);

        let mirrored = aerodynamic_force(350.0, airflow, 0.4, f64::INFINITY, AIR_DENSITY);
        assert_abs_diff_eq!(mirrored.angle_of_attack, -10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(mirrored.lift.y, -f.lift.y, epsilon = 1e-6);
    }

    #[test]
    fn test_lift_capped() {
        let airflow = Vec2::new(-2000.0, 0.0);
        let f = aerodynamic_force(20.0, airflow, 0.4, 7000.0, AIR_DENSITY);
        assert_abs_diff_eq!(f.lift.length(), 7000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_density_scales_force() {
        let airflow = Vec2::new(-500.0, 0.0);
        let dense = aerodynamic_force(15.0, airflow, 0.2, f64::INFINITY, AIR_DENSITY);
        let thin = aerodynamic_force(15.0, airflow, 0.2, f64::INFINITY, AIR_DENSITY / 2.0);
        assert_abs_diff_eq!(thin.lift.length() * 2.0, dense.lift.length(), epsilon = 1e-6);
    }

    #[test]
    fn test_deflection_clamped() {
        let mut fin = AeroSurface::new(Vec2::new(-22.0, 0.0), 0.2, 40.0, 7000.0);
        fin.set_deflection(75.0);
        assert_eq!(fin.deflection(), 40.0);
        fin.set_deflection(-90.0);
        assert_eq!(fin.deflection(), -40.0);
        fin.set_deflection(12.5);
        assert_eq!(fin.deflection(), 12.5);
    }

    #[test]
    fn test_surface_follows_parent() {
        let mut fin = AeroSurface::new(Vec2::new(-22.0, 0.0), 0.2, 40.0, 7000.0);
        fin.set_deflection(10.0);
        let parent = RigidBody::new(Vec2::new(100.0, 50.0), Vec2::ZERO, 90.0);
        fin.update(&parent, 0.0075);
        assert_abs_diff_eq!(fin.position.x, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fin.position.y, 28.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fin.rotation, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_swept_velocity_guarded_then_bounded() {
        let mut fin = AeroSurface::new(Vec2::new(-22.0, 0.0), 0.2, 40.0, 7000.0);
        let mut parent = RigidBody::new(Vec2::new(5000.0, 5000.0), Vec2::ZERO, 0.0);

        // No previous placement: no spike even far from the origin.
        fin.update(&parent, 0.0075);
        assert_eq!(fin.swept_velocity, Vec2::ZERO);

        // Spinning at 100 deg/s: tip speed 22 * 1.745 ~ 38.4.
        parent.rotation = 0.75;
        fin.update(&parent, 0.0075);
        assert_abs_diff_eq!(fin.swept_velocity.length(), 38.4, epsilon = 0.1);

        // A violent flip is capped.
        parent.rotation = 180.0;
        fin.update(&parent, 0.0075);
        assert_abs_diff_eq!(
            fin.swept_velocity.length(),
            MAX_SURFACE_SWEEP_SPEED,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_wind_enters_airflow() {
        let mut body = AeroSurface::fixed(Vec2::ZERO, 0.4);
        let parent = RigidBody::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        body.update(&parent, 0.0075);

        // Stationary missile in a crosswind blowing toward +y.
        let air = AirState {
            wind: Vec2::new(0.0, 50.0),
            air_density: AIR_DENSITY,
        };
        let force = body.compute_force(Vec2::ZERO, &air);
        assert!(force.y > 0.0);
        assert_abs_diff_eq!(vector_angle(body.force.drag), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fixture_point_rotates_with_parent() {
        let mut cg = FixturePoint::new(Vec2::new(4.0, 0.0));
        let parent = RigidBody::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 180.0);
        cg.update(&parent);
        assert_abs_diff_eq!(cg.position.x, 6.0, epsilon = 1e-9);
        assert_abs_diff_eq!(cg.position.y, 10.0, epsilon = 1e-9);
    }
}
