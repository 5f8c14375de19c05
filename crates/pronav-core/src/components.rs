//! ECS components shared by every body in the simulation.

use crate::enums::TargetProfile;
use crate::geometry::{clamp_angle, point_in_polygon, transform, vertex_centroid};
use crate::types::Vec2;

/// Position, orientation and shape of anything that moves.
///
/// Owned exclusively by its entity. Other entities refer to it only through
/// the entity handle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RigidBody {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Degrees, kept in `[0, 360)`.
    pub rotation: f64,
    /// Degrees per second.
    pub rotation_speed: f64,
    /// Local-frame vertex ring. Empty for point bodies such as bullets.
    pub polygon: Vec<Vec2>,
    /// Set at detection time; the cleanup pass removes the entity.
    pub expired: bool,
}

impl RigidBody {
    pub fn new(position: Vec2, velocity: Vec2, rotation: f64) -> Self {
        Self {
            position,
            velocity,
            rotation: clamp_angle(rotation),
            ..Default::default()
        }
    }

    pub fn with_polygon(mut self, polygon: Vec<Vec2>) -> Self {
        self.polygon = polygon;
        self
    }

    pub fn with_rotation_speed(mut self, rotation_speed: f64) -> Self {
        self.rotation_speed = rotation_speed;
        self
    }

    pub fn is_point(&self) -> bool {
        self.polygon.len() < 3
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = clamp_angle(rotation);
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Explicit Euler step of position and rotation.
    pub fn integrate(&mut self, dt: f64) {
        self.position += self.velocity * dt;
        self.rotation = clamp_angle(self.rotation + self.rotation_speed * dt);
    }

    /// The polygon in world coordinates.
    pub fn world_polygon(&self) -> Vec<Vec2> {
        self.polygon
            .iter()
            .map(|&p| transform(p, self.rotation, self.position, 1.0))
            .collect()
    }

    /// Vertex centroid of the world polygon, or the position for point bodies.
    pub fn center(&self) -> Vec2 {
        if self.is_point() {
            self.position
        } else {
            vertex_centroid(&self.world_polygon())
        }
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        !self.is_point() && point_in_polygon(point, &self.world_polygon())
    }
}

/// Marks a shootable target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// Always a concrete profile, never `Random`.
    pub profile: TargetProfile,
    pub radius: f64,
    pub point_count: usize,
}

/// Expanding blast. Destroys any target whose position it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    pub max_radius: f64,
    pub duration: f64,
    pub age: f64,
    pub radius: f64,
}

impl Explosion {
    pub fn new(max_radius: f64, duration: f64) -> Self {
        Self {
            max_radius,
            duration,
            age: 0.0,
            radius: 0.0,
        }
    }

    /// Grow the blast. Returns true once it has burnt out.
    pub fn advance(&mut self, dt: f64) -> bool {
        self.radius = self.max_radius * (self.age / self.duration).min(1.0);
        self.age += dt;
        self.age >= self.duration
    }

    pub fn covers(&self, center: Vec2, point: Vec2) -> bool {
        center.distance(point) < self.radius
    }
}

/// The controllable launch platform.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Platform {
    pub thrust_on: bool,
}
