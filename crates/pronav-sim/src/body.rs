//! Hit-testing between rigid bodies.
//!
//! Small fast bodies can cross a thin polygon inside one substep, so both
//! tests also sweep the moving body one substep ahead along its velocity.
//! This narrows the tunneling window but does not close it at extreme
//! speed/size ratios.

use pronav_core::components::RigidBody;
use pronav_core::geometry::{point_in_polygon, segments_intersect, vertex_centroid};
use pronav_core::types::Vec2;

/// Hybrid polygon test between a target and a moving polygon body.
pub fn polygons_intersect(target: &RigidBody, mover: &RigidBody, substep_dt: f64) -> bool {
    let target_ring = target.world_polygon();
    let mover_ring = mover.world_polygon();
    if target_ring.len() < 3 || mover_ring.len() < 3 {
        return false;
    }

    let sweep = mover.velocity * substep_dt;
    if sweep != Vec2::ZERO
        && mover_ring
            .iter()
            .any(|&v| segment_crosses_ring(v, v + sweep, &target_ring))
    {
        return true;
    }

    point_in_polygon(vertex_centroid(&mover_ring), &target_ring)
        || point_in_polygon(vertex_centroid(&target_ring), &mover_ring)
        || mover_ring
            .iter()
            .any(|&v| point_in_polygon(v, &target_ring))
        || target_ring
            .iter()
            .any(|&v| point_in_polygon(v, &mover_ring))
}

/// Point body against a target polygon: the current position, the position
/// one substep ahead, and the segment between them.
pub fn point_hits(target: &RigidBody, point: &RigidBody, substep_dt: f64) -> bool {
    let ring = target.world_polygon();
    if ring.len() < 3 {
        return false;
    }

    let start = point.position;
    let end = start + point.velocity * substep_dt;
    point_in_polygon(start, &ring)
        || point_in_polygon(end, &ring)
        || segment_crosses_ring(start, end, &ring)
}

/// Dispatch on the candidate's shape.
pub fn bodies_collide(target: &RigidBody, candidate: &RigidBody, substep_dt: f64) -> bool {
    if candidate.is_point() {
        point_hits(target, candidate, substep_dt)
    } else {
        polygons_intersect(target, candidate, substep_dt)
    }
}

fn segment_crosses_ring(a: Vec2, b: Vec2, ring: &[Vec2]) -> bool {
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        if segments_intersect(a, b, ring[j], ring[i]) {
            return true;
        }
        j = i;
    }
    false
}
