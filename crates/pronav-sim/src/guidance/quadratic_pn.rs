//! Intercept-triangle guidance.
//!
//! The missile, the target and the intercept point form a triangle whose
//! sides are the current range, the target's travel and the missile's
//! travel. The law of cosines over that triangle gives a quadratic in the
//! missile's travel distance.

use pronav_core::geometry::{angle_between, normalize_or_zero, vector_angle};
use pronav_core::types::Vec2;

use super::{AimPoints, Kinematics};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuadraticPn {
    /// Last commanded heading, held when there is no intercept solution.
    prev_heading: f64,
}

impl QuadraticPn {
    pub fn new(rotation: f64) -> Self {
        Self {
            prev_heading: rotation,
        }
    }

    pub fn heading(&mut self, missile: &Kinematics, target: &Kinematics, aim: &mut AimPoints) -> f64 {
        let speed = missile.velocity.length();
        match intercept_direction(missile.position, target.position, speed, target.velocity) {
            Some((direction, impact)) => {
                aim.impact = impact;
                aim.stable = impact;
                aim.current = impact;
                self.prev_heading = vector_angle(direction);
            }
            None => log::trace!("no intercept solution, holding {:.1}", self.prev_heading),
        }
        self.prev_heading
    }
}

/// Unit direction to fly from `origin` at `missile_speed` to meet a target
/// moving at constant `target_velocity`, with the meeting point.
///
/// Returns `None` when the target cannot be caught or the geometry is
/// degenerate (zero speed or zero range).
pub fn intercept_direction(
    origin: Vec2,
    target_pos: Vec2,
    missile_speed: f64,
    target_velocity: Vec2,
) -> Option<(Vec2, Vec2)> {
    let range = origin.distance(target_pos);
    if missile_speed <= f64::EPSILON || range <= f64::EPSILON {
        return None;
    }

    let target_speed = target_velocity.length();
    let ratio = target_speed / missile_speed;
    // Angle at the target's corner, between the way back to the missile and
    // the target's course.
    let alpha = if target_speed > f64::EPSILON {
        angle_between(origin - target_pos, target_velocity).to_radians()
    } else {
        0.0
    };

    let a = 1.0 - ratio * ratio;
    let b = 2.0 * ratio * range * alpha.cos();
    let c = -range * range;

    let travel = if a.abs() < 1e-9 {
        // Equal speeds: the quadratic collapses to b*s + c = 0.
        if b <= 0.0 {
            return None;
        }
        -c / b
    } else {
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }
        let root = disc.sqrt();
        let s1 = (-b + root) / (2.0 * a);
        let s2 = (-b - root) / (2.0 * a);
        s1.max(s2)
    };
    if travel <= 0.0 || !travel.is_finite() {
        return None;
    }

    let time = travel / missile_speed;
    let impact = target_pos + target_velocity * time;
    let direction = normalize_or_zero(impact - origin);
    if direction == Vec2::ZERO {
        return None;
    }
    Some((direction, impact))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_stationary_target_is_pure_pursuit() {
        let origin = Vec2::new(-50.0, 20.0);
        let target = Vec2::new(300.0, 700.0);
        let (dir, impact) = intercept_direction(origin, target, 450.0, Vec2::ZERO).unwrap();
        let los = (target - origin).normalize();
        assert_abs_diff_eq!(dir.x, los.x, epsilon = 1e-9);
        assert_abs_diff_eq!(dir.y, los.y, epsilon = 1e-9);
        assert_eq!(impact, target);
    }

    #[test]
    fn test_crossing_target_intercept_point() {
        // |(1000, 300t)| = 500t  =>  t = 2.5
        let (dir, impact) =
            intercept_direction(Vec2::ZERO, Vec2::new(1000.0, 0.0), 500.0, Vec2::new(0.0, 300.0))
                .unwrap();
        assert_abs_diff_eq!(impact.x, 1000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(impact.y, 750.0, epsilon = 1e-6);
        assert_abs_diff_eq!(dir.length(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_faster_receding_target_has_no_solution() {
        assert!(intercept_direction(
            Vec2::ZERO,
            Vec2::new(1000.0, 0.0),
            200.0,
            Vec2::new(400.0, 0.0)
        )
        .is_none());
    }

    #[test]
    fn test_no_solution_holds_previous_heading() {
        let mut law = QuadraticPn::new(37.0);
        let m = Kinematics {
            velocity: Vec2::new(200.0, 0.0),
            ..Default::default()
        };
        let t = Kinematics {
            position: Vec2::new(1000.0, 0.0),
            velocity: Vec2::new(400.0, 0.0),
            ..Default::default()
        };
        let mut aim = AimPoints::default();
        assert_eq!(law.heading(&m, &t, &mut aim), 37.0);
    }
}
