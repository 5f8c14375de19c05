//! Ambient air: wind and air density, each an independent smoothed random
//! walk that can be toggled on and off.
//!
//! The physics step never reads this directly. It samples an [`AirState`]
//! once per substep and passes it down, so aerodynamic functions stay pure.

use rand::Rng;

use pronav_core::constants::*;
use pronav_core::geometry::{angle_to_vector, factor, lerp, lerp_angle};
use pronav_core::state::EnvironmentView;
use pronav_core::types::Vec2;

/// Snapshot of the ambient air for one substep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirState {
    pub wind: Vec2,
    pub air_density: f64,
}

impl Default for AirState {
    fn default() -> Self {
        Self {
            wind: Vec2::ZERO,
            air_density: AIR_DENSITY,
        }
    }
}

/// A value that drifts linearly toward a random target, then picks another
/// target after a random interval.
#[derive(Debug, Clone)]
struct RandomWalk {
    value: f64,
    from: f64,
    target: f64,
    elapsed: f64,
    interval: f64,
    range: (f64, f64),
    interval_range: (f64, f64),
    /// Interpolate as a heading along the shorter arc.
    angular: bool,
}

impl RandomWalk {
    fn new<R: Rng>(
        rng: &mut R,
        range: (f64, f64),
        interval_range: (f64, f64),
        angular: bool,
    ) -> Self {
        let target = rng.gen_range(range.0..=range.1);
        Self {
            value: target,
            from: target,
            target,
            elapsed: 0.0,
            interval: rng.gen_range(interval_range.0..=interval_range.1),
            range,
            interval_range,
            angular,
        }
    }

    fn update<R: Rng>(&mut self, dt: f64, rng: &mut R) -> f64 {
        if self.elapsed >= self.interval {
            self.from = self.value;
            self.target = rng.gen_range(self.range.0..=self.range.1);
            self.interval = rng.gen_range(self.interval_range.0..=self.interval_range.1);
            self.elapsed = 0.0;
        }

        let t = factor(self.elapsed, self.interval);
        self.value = if self.angular {
            lerp_angle(self.from, self.target, t)
        } else {
            lerp(self.from, self.target, t)
        };
        self.elapsed += dt;
        self.value
    }
}

/// Wind and air density processes.
#[derive(Debug, Clone)]
pub struct Environment {
    pub wind_enabled: bool,
    pub turbulence_enabled: bool,
    density: RandomWalk,
    wind_speed: RandomWalk,
    wind_heading: RandomWalk,
    current: AirState,
}

impl Environment {
    pub fn new<R: Rng>(rng: &mut R, wind_enabled: bool, turbulence_enabled: bool) -> Self {
        let mut environment = Self {
            wind_enabled,
            turbulence_enabled,
            density: RandomWalk::new(
                rng,
                (MIN_AIR_DENSITY, AIR_DENSITY),
                (AIR_DENSITY_STEP_MIN_SECS, AIR_DENSITY_STEP_MAX_SECS),
                false,
            ),
            wind_speed: RandomWalk::new(
                rng,
                (-MAX_WIND_SPEED, MAX_WIND_SPEED),
                (WIND_STEP_MIN_SECS, WIND_STEP_MAX_SECS),
                false,
            ),
            wind_heading: RandomWalk::new(
                rng,
                (0.0, 360.0),
                (WIND_STEP_MIN_SECS, WIND_STEP_MAX_SECS),
                true,
            ),
            current: AirState::default(),
        };
        environment.refresh();
        environment
    }

    /// Advance both processes and return the air for this substep.
    /// Disabled processes are not advanced and report calm sea-level air.
    pub fn update<R: Rng>(&mut self, dt: f64, rng: &mut R) -> AirState {
        if self.turbulence_enabled {
            self.density.update(dt, rng);
        }
        if self.wind_enabled {
            self.wind_speed.update(dt, rng);
            self.wind_heading.update(dt, rng);
        }
        self.refresh();
        self.current
    }

    pub fn current(&self) -> AirState {
        self.current
    }

    pub fn view(&self) -> EnvironmentView {
        EnvironmentView {
            wind: self.current.wind,
            air_density: self.current.air_density,
            wind_enabled: self.wind_enabled,
            turbulence_enabled: self.turbulence_enabled,
        }
    }

    fn refresh(&mut self) {
        self.current = AirState {
            wind: if self.wind_enabled {
                angle_to_vector(self.wind_heading.value) * self.wind_speed.value
            } else {
                Vec2::ZERO
            },
            air_density: if self.turbulence_enabled {
                self.density.value
            } else {
                AIR_DENSITY
            },
        };
    }
}
