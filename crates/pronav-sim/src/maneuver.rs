//! Target kinematic profiles.

use rand::Rng;

use pronav_core::components::RigidBody;
use pronav_core::constants::*;
use pronav_core::enums::TargetProfile;
use pronav_core::geometry::angle_to_vector;
use pronav_core::types::Vec2;

use crate::smoothing::RunningAverage;

/// Random-walk manoeuvring for erratic targets.
///
/// Every few hundred substeps the spin reverses and a fresh velocity is
/// drawn; both are eased in through running averages so the target never
/// jerks.
#[derive(Debug, Clone)]
pub struct ErraticManeuver {
    spin_target: f64,
    velocity_target: Vec2,
    spin: RunningAverage<f64>,
    velocity: RunningAverage<Vec2>,
    spin_countdown: u32,
    velocity_countdown: u32,
}

impl ErraticManeuver {
    pub fn new(body: &RigidBody) -> Self {
        Self {
            spin_target: body.rotation_speed,
            velocity_target: body.velocity,
            spin: RunningAverage::new(ERRATIC_SMOOTHING),
            velocity: RunningAverage::new(ERRATIC_SMOOTHING),
            spin_countdown: 0,
            velocity_countdown: 0,
        }
    }

    /// Retarget when due, then ease the body's spin and velocity.
    pub fn update<R: Rng>(&mut self, body: &mut RigidBody, rng: &mut R) {
        if self.spin_countdown == 0 {
            self.spin_target = -body.rotation_speed;
            self.spin_countdown = rng.gen_range(ERRATIC_MIN_FRAMES..ERRATIC_MAX_FRAMES);
        }
        self.spin_countdown -= 1;
        body.rotation_speed = self.spin.add(self.spin_target);

        if self.velocity_countdown == 0 {
            self.velocity_target = random_velocity(rng);
            self.velocity_countdown = rng.gen_range(ERRATIC_MIN_FRAMES..ERRATIC_MAX_FRAMES);
        }
        self.velocity_countdown -= 1;
        body.velocity = self.velocity.add(self.velocity_target);

        follow_rotation(body);
    }
}

/// Point the velocity against the body's rotation, keeping its magnitude.
pub fn follow_rotation(body: &mut RigidBody) {
    body.velocity = angle_to_vector(-body.rotation) * body.velocity.length();
}

/// Each axis drawn uniformly from `±TARGET_MAX_SPEED`.
pub fn random_velocity<R: Rng>(rng: &mut R) -> Vec2 {
    Vec2::new(
        rng.gen_range(-TARGET_MAX_SPEED..TARGET_MAX_SPEED),
        rng.gen_range(-TARGET_MAX_SPEED..TARGET_MAX_SPEED),
    )
}

/// Resolve `Random` to one of the concrete profiles.
pub fn resolve_profile<R: Rng>(profile: TargetProfile, rng: &mut R) -> TargetProfile {
    match profile {
        TargetProfile::Random => {
            TargetProfile::CONCRETE[rng.gen_range(0..TargetProfile::CONCRETE.len())]
        }
        concrete => concrete,
    }
}

/// Initial velocity and spin for a freshly spawned target.
pub fn initial_motion<R: Rng>(profile: TargetProfile, rng: &mut R) -> (Vec2, f64) {
    match profile {
        TargetProfile::Static | TargetProfile::Random => (Vec2::ZERO, 0.0),
        TargetProfile::Linear => (random_velocity(rng), 0.0),
        TargetProfile::Rotating => (
            random_velocity(rng),
            rng.gen_range(-TARGET_MAX_SPIN..TARGET_MAX_SPIN),
        ),
        TargetProfile::Erratic => (
            random_velocity(rng),
            rng.gen_range(-ERRATIC_MAX_SPIN..ERRATIC_MAX_SPIN),
        ),
    }
}

/// Polygon radius for a profile.
pub fn polygon_radius(profile: TargetProfile) -> f64 {
    match profile {
        TargetProfile::Erratic => ERRATIC_POLY_RADIUS,
        _ => TARGET_POLY_RADIUS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use pronav_core::geometry::{angle_diff, vector_angle};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_follow_rotation_keeps_speed() {
        let mut body = RigidBody::new(Vec2::ZERO, Vec2::new(30.0, 40.0), 90.0);
        follow_rotation(&mut body);
        assert_abs_diff_eq!(body.velocity.length(), 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(vector_angle(body.velocity), 270.0, epsilon = 1e-9);
    }

    #[test]
    fn test_random_resolves_to_concrete() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..50 {
            let p = resolve_profile(TargetProfile::Random, &mut rng);
            assert!(TargetProfile::CONCRETE.contains(&p));
        }
        assert_eq!(
            resolve_profile(TargetProfile::Linear, &mut rng),
            TargetProfile::Linear
        );
    }

    #[test]
    fn test_initial_motion_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for profile in TargetProfile::CONCRETE {
            let (v, spin) = initial_motion(profile, &mut rng);
            assert!(v.x.abs() <= TARGET_MAX_SPEED && v.y.abs() <= TARGET_MAX_SPEED);
            assert!(spin.abs() <= TARGET_MAX_SPIN);
            if profile == TargetProfile::Static {
                assert_eq!((v, spin), (Vec2::ZERO, 0.0));
            }
        }
    }

    #[test]
    fn test_erratic_heads_against_rotation_and_flips_spin() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut body =
            RigidBody::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 30.0).with_rotation_speed(40.0);
        let mut maneuver = ErraticManeuver::new(&body);

        maneuver.update(&mut body, &mut rng);
        assert_abs_diff_eq!(body.rotation_speed, -40.0, epsilon = 1e-9);
        assert!(angle_diff(vector_angle(body.velocity), 330.0) < 1e-6);

        for _ in 0..200 {
            maneuver.update(&mut body, &mut rng);
            assert!(body.velocity.length() <= TARGET_MAX_SPEED * 2f64.sqrt());
        }
    }
}
