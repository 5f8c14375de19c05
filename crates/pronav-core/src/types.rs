//! Fundamental simulation types.

use serde::{Deserialize, Serialize};

/// 2D vector used for every position, velocity and force in the simulation.
/// x grows to the right, y grows downward (screen space), angles are measured
/// in degrees from +x toward +y.
pub type Vec2 = glam::DVec2;

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of completed outer frames.
    pub frame: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one frame of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.frame += 1;
        self.elapsed_secs += dt;
    }
}

/// Extent of the playing field. The origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldSize {
    pub width: f64,
    pub height: f64,
}

impl Default for WorldSize {
    fn default() -> Self {
        Self {
            width: crate::constants::DEFAULT_WORLD_WIDTH,
            height: crate::constants::DEFAULT_WORLD_HEIGHT,
        }
    }
}

impl WorldSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn as_vec(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// True if `pos` lies inside the field grown by `padding` on every side.
    pub fn contains_padded(&self, pos: Vec2, padding: f64) -> bool {
        pos.x >= -padding
            && pos.y >= -padding
            && pos.x <= self.width + padding
            && pos.y <= self.height + padding
    }

    /// Wrap a position to the opposite edge once it leaves the field.
    pub fn wrap(&self, pos: Vec2) -> Vec2 {
        let mut wrapped = pos;
        if wrapped.x < 0.0 {
            wrapped.x = self.width;
        } else if wrapped.x > self.width {
            wrapped.x = 0.0;
        }
        if wrapped.y < 0.0 {
            wrapped.y = self.height;
        } else if wrapped.y > self.height {
            wrapped.y = 0.0;
        }
        wrapped
    }
}
