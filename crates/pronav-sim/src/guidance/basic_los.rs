//! Line-of-sight lead-angle controller.

use pronav_core::constants::{BASIC_LOS_GAIN, BASIC_LOS_MAX_CORRECTION};
use pronav_core::geometry::{angle_delta, vector_angle};

use super::{AimPoints, Kinematics};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BasicLos;

impl BasicLos {
    /// Offset the velocity heading by a multiple of the angle between the
    /// velocity and the line of sight to a lead point.
    pub fn heading(&self, missile: &Kinematics, target: &Kinematics, aim: &mut AimPoints) -> f64 {
        let speed = missile.velocity.length();
        let velocity_heading = vector_angle(missile.velocity);
        let navigation_time = if speed > f64::EPSILON {
            target.position.distance(missile.position) / speed
        } else {
            0.0
        };

        let lead = target.position + target.velocity * navigation_time;
        aim.impact = lead;
        aim.stable = lead;
        aim.current = lead;

        let error = angle_delta(velocity_heading, vector_angle(lead - missile.position));
        if error == 0.0 {
            return velocity_heading;
        }

        let correction =
            (BASIC_LOS_GAIN * error).clamp(-BASIC_LOS_MAX_CORRECTION, BASIC_LOS_MAX_CORRECTION);
        velocity_heading + correction
    }
}
