//! Predictive guidance with a filtered aim point.
//!
//! Each update:
//!
//! 1. Estimates time to impact from range, speed and acceleration.
//! 2. Flies the target forward that many substeps, turning its velocity by
//!    the heading change measured since the previous update.
//! 3. Filters the prediction into a stable aim point. A prediction that
//!    jumps around is trusted less.
//! 4. Aims between the target and the stable point depending on how fast the
//!    range is closing.
//! 5. Turns toward the aim using a normal correction for small errors and a
//!    tangential one for large errors, scaled by a rate that drops with
//!    speed and rises again close to the target.

use pronav_core::constants::*;
use pronav_core::geometry::{
    angle_delta, angle_diff, cross, factor, lerp, normalize_or_zero, transform, vector_angle,
};
use pronav_core::types::Vec2;

use super::{AimPoints, Kinematics};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvancedGuidance {
    prev_impact: Option<Vec2>,
    prev_speed: Option<f64>,
    prev_target_dist: Option<f64>,
    prev_target_heading: Option<f64>,
}

impl AdvancedGuidance {
    pub fn heading(
        &mut self,
        missile: &Kinematics,
        target: &Kinematics,
        dt: f64,
        aim: &mut AimPoints,
    ) -> f64 {
        let speed = missile.velocity.length();
        let velocity_heading = vector_angle(missile.velocity);
        let target_dist = missile.position.distance(target.position);

        // Target turn rate, per substep.
        let target_step = target.velocity * dt;
        let target_heading = (target.velocity != Vec2::ZERO).then(|| vector_angle(target.velocity));
        let heading_delta = match (self.prev_target_heading, target_heading) {
            (Some(prev), Some(now)) => angle_delta(prev, now),
            _ => 0.0,
        };
        self.prev_target_heading = target_heading;

        // Speed gained last substep, in the same per-step units as `speed * dt`.
        let accel = self.prev_speed.map_or(0.0, |prev| (speed - prev) * dt);
        self.prev_speed = Some(speed);

        let steps = impact_time(target_dist, speed * dt, accel);
        let impact = refine_impact(target.position, target_step, heading_delta, steps);

        let stable = match self.prev_impact {
            Some(prev) => {
                let gain = factor(ADV_IMPACT_POINT_DELTA_THRESH, impact.distance(prev));
                aim.stable.lerp(impact, gain)
            }
            None => impact,
        };
        self.prev_impact = Some(impact);

        let closing = self
            .prev_target_dist
            .map_or(0.0, |prev| prev - target_dist);
        self.prev_target_dist = Some(target_dist);
        let close_factor = factor(closing, ADV_MIN_CLOSE_RATE);

        let to_target = normalize_or_zero(target.position - missile.position);
        let to_stable = normalize_or_zero(stable - missile.position);
        let aim_dir = normalize_or_zero(to_target.lerp(to_stable, close_factor));

        aim.impact = impact;
        aim.stable = stable;
        aim.current = target.position.lerp(stable, close_factor);

        if aim_dir == Vec2::ZERO || speed <= f64::EPSILON {
            return velocity_heading;
        }

        // Positive rotation turns counter-clockwise toward the aim.
        let heading_vec = missile.velocity / speed;
        let error = angle_delta(velocity_heading, vector_angle(aim_dir));
        let normal = cross(heading_vec, aim_dir).clamp(-1.0, 1.0).asin().to_degrees();
        let tangent = error.signum() * (1.0 - aim_dir.dot(heading_vec)) * 45.0;
        let rotation = lerp(normal, tangent, factor(angle_diff(0.0, error), 180.0));

        let rate = ADV_MIN_ROT_RATE
            + (ADV_MAX_ROT_RATE - ADV_MIN_ROT_RATE) * (1.0 - factor(speed, ADV_MIN_ROT_SPEED))
            + (1.0 - factor(target_dist, ADV_ROT_MOD_DIST)) * ADV_ROT_MOD_AMT;

        velocity_heading + rotation * rate
    }
}

/// Substeps to cover `distance` starting at `speed` per substep and
/// gaining `accel` per substep each substep.
pub fn impact_time(distance: f64, speed: f64, accel: f64) -> f64 {
    let cruise = if speed > 0.0 {
        distance / speed
    } else {
        f64::INFINITY
    };
    if accel.abs() < 1e-9 {
        return cruise;
    }

    let disc = speed * speed + 2.0 * accel * distance;
    if disc < 0.0 {
        return cruise;
    }
    let steps = (disc.sqrt() - speed) / accel;
    if steps.is_finite() && steps >= 0.0 {
        steps
    } else {
        cruise
    }
}

/// Fly `pos` forward `steps` substeps of `step_velocity`, turning the
/// velocity by `heading_delta` degrees each substep.
///
/// A step count that is non-finite, non-positive or at least
/// `ADV_MAX_PREDICTION_STEPS` predicts no movement: the target's current
/// position is used instead.
pub fn refine_impact(pos: Vec2, step_velocity: Vec2, heading_delta: f64, steps: f64) -> Vec2 {
    if !steps.is_finite() || steps <= 0.0 || steps >= ADV_MAX_PREDICTION_STEPS {
        return pos;
    }
    if heading_delta == 0.0 {
        return pos + step_velocity * steps;
    }

    let whole = steps.floor() as usize;
    let mut point = pos;
    let mut velocity = step_velocity;
    for _ in 0..whole {
        point += velocity;
        velocity = transform(velocity, heading_delta, Vec2::ZERO, 1.0);
    }
    point + velocity * steps.fract()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const DT: f64 = 0.0075;

    #[test]
    fn test_straight_target_prediction_is_linear() {
        let pos = Vec2::new(100.0, -40.0);
        let step = Vec2::new(1.5, 0.5);
        let predicted = refine_impact(pos, step, 0.0, 123.4);
        assert_abs_diff_eq!(predicted.x, pos.x + step.x * 123.4, epsilon = 1e-9);
        assert_abs_diff_eq!(predicted.y, pos.y + step.y * 123.4, epsilon = 1e-9);
    }

    #[test]
    fn test_turning_target_prediction_closes_loop() {
        // Four quarter turns bring the target back where it started.
        let predicted = refine_impact(Vec2::ZERO, Vec2::new(10.0, 0.0), 90.0, 4.0);
        assert_abs_diff_eq!(predicted.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(predicted.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_prediction_beyond_cap_uses_current_position() {
        let pos = Vec2::new(100.0, 0.0);
        let step = Vec2::new(1.5, 0.0);
        assert_eq!(refine_impact(pos, step, 0.0, 10_000.0), pos);
        assert_eq!(refine_impact(pos, step, 5.0, ADV_MAX_PREDICTION_STEPS), pos);
        assert_eq!(refine_impact(Vec2::ZERO, Vec2::X, 1.0, f64::INFINITY), Vec2::ZERO);

        let below = refine_impact(pos, step, 0.0, ADV_MAX_PREDICTION_STEPS - 1.0);
        assert_abs_diff_eq!(below.x, 100.0 + 1.5 * 5999.0, epsilon = 1e-6);
    }

    #[test]
    fn test_launch_from_rest_aims_at_current_position() {
        let mut law = AdvancedGuidance::default();
        let m = Kinematics {
            velocity: Vec2::new(0.5, 0.0),
            ..Default::default()
        };
        let t = Kinematics {
            position: Vec2::new(1500.0, 0.0),
            velocity: Vec2::new(0.0, 200.0),
            ..Default::default()
        };
        let mut aim = AimPoints::default();
        law.heading(&m, &t, DT, &mut aim);
        assert_eq!(aim.impact, t.position);
    }

    #[test]
    fn test_accelerating_missile_leads_crossing_target() {
        // 300 u/s gaining 48 u/s², target 2000 ahead crossing at 200 u/s.
        // 2000 = 300 t + 24 t²  =>  t ≈ 4.813 s, so the target is met near
        // y ≈ 962.6.
        let mut law = AdvancedGuidance::default();
        let t = Kinematics {
            position: Vec2::new(2000.0, 0.0),
            velocity: Vec2::new(0.0, 200.0),
            ..Default::default()
        };
        let mut aim = AimPoints::default();
        let earlier = Kinematics {
            velocity: Vec2::new(300.0 - 48.0 * DT, 0.0),
            ..Default::default()
        };
        law.heading(&earlier, &t, DT, &mut aim);
        let now = Kinematics {
            velocity: Vec2::new(300.0, 0.0),
            ..Default::default()
        };
        law.heading(&now, &t, DT, &mut aim);

        let time = (-300.0 + (300.0f64 * 300.0 + 4.0 * 24.0 * 2000.0).sqrt()) / 48.0;
        assert_abs_diff_eq!(aim.impact.x, 2000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(aim.impact.y, 200.0 * time, epsilon = 0.5);
        assert!(aim.impact.y > 900.0 && aim.impact.y < 1000.0);
    }

    #[test]
    fn test_impact_time_with_and_without_acceleration() {
        assert_abs_diff_eq!(impact_time(100.0, 2.0, 0.0), 50.0, epsilon = 1e-9);
        // 100 = 0*n + n^2  =>  n = 10
        assert_abs_diff_eq!(impact_time(100.0, 0.0, 2.0), 10.0, epsilon = 1e-9);
        assert!(impact_time(100.0, 0.0, 0.0).is_infinite());
        // Decelerating too hard to arrive.
        assert_abs_diff_eq!(impact_time(100.0, 1.0, -1.0), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_target_ahead_keeps_heading() {
        let mut law = AdvancedGuidance::default();
        let m = Kinematics {
            velocity: Vec2::new(300.0, 0.0),
            ..Default::default()
        };
        let t = Kinematics {
            position: Vec2::new(2000.0, 0.0),
            ..Default::default()
        };
        let mut aim = AimPoints::default();
        for _ in 0..3 {
            let heading = law.heading(&m, &t, DT, &mut aim);
            assert_abs_diff_eq!(heading, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_turns_past_offset_target() {
        let mut law = AdvancedGuidance::default();
        let m = Kinematics {
            velocity: Vec2::new(300.0, 0.0),
            ..Default::default()
        };
        let t = Kinematics {
            position: Vec2::new(1000.0, 100.0),
            ..Default::default()
        };
        let mut aim = AimPoints::default();
        let heading = law.heading(&m, &t, DT, &mut aim);
        let los = vector_angle(t.position);
        assert!(heading > los, "heading {heading} should lead los {los}");
        assert!(heading < los * (ADV_MAX_ROT_RATE + ADV_ROT_MOD_AMT) + 1e-9);
    }

    #[test]
    fn test_target_behind_turns_hard() {
        let mut law = AdvancedGuidance::default();
        let m = Kinematics {
            velocity: Vec2::new(300.0, 0.0),
            ..Default::default()
        };
        let t = Kinematics {
            position: Vec2::new(-1000.0, 10.0),
            ..Default::default()
        };
        let mut aim = AimPoints::default();
        let heading = law.heading(&m, &t, DT, &mut aim);
        assert!(heading.is_finite());
        assert!(heading > 45.0);
    }
}
