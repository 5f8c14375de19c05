//! Simple proportional navigation: steer at the target plus a scaled lead
//! offset.

use pronav_core::constants::SIMPLE_PN_GAIN;
use pronav_core::geometry::vector_angle;

use super::{AimPoints, Kinematics};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimplePn;

impl SimplePn {
    /// The lead offset is the line of sight plus the distance the target
    /// covers while the missile flies that line at its current speed.
    pub fn heading(&self, missile: &Kinematics, target: &Kinematics, aim: &mut AimPoints) -> f64 {
        let speed = missile.velocity.length();
        let los = target.position - missile.position;
        let navigation_time = if speed > f64::EPSILON {
            los.length() / speed
        } else {
            0.0
        };
        let offset = los + target.velocity * navigation_time;

        aim.impact = missile.position + offset;
        aim.stable = aim.impact;
        aim.current = target.position + offset * SIMPLE_PN_GAIN;

        vector_angle(aim.current - missile.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use pronav_core::types::Vec2;

    #[test]
    fn test_static_target_is_pure_pursuit() {
        let m = Kinematics {
            position: Vec2::new(0.0, 0.0),
            velocity: Vec2::new(400.0, 0.0),
            ..Default::default()
        };
        let t = Kinematics {
            position: Vec2::new(600.0, 800.0),
            ..Default::default()
        };
        let mut aim = AimPoints::default();
        let heading = SimplePn.heading(&m, &t, &mut aim);
        assert_abs_diff_eq!(heading, vector_angle(t.position), epsilon = 1e-9);
        assert_eq!(aim.impact, t.position);
    }

    #[test]
    fn test_leads_crossing_target() {
        let m = Kinematics {
            position: Vec2::ZERO,
            velocity: Vec2::new(500.0, 0.0),
            ..Default::default()
        };
        // Target ahead, crossing toward +y.
        let t = Kinematics {
            position: Vec2::new(1000.0, 0.0),
            velocity: Vec2::new(0.0, 200.0),
            ..Default::default()
        };
        let mut aim = AimPoints::default();
        let heading = SimplePn.heading(&m, &t, &mut aim);
        assert!(heading > 0.0 && heading < 90.0);
        assert_abs_diff_eq!(aim.impact.y, 400.0, epsilon = 1e-9);
    }
}
