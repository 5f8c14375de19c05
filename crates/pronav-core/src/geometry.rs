//! 2D geometry primitives.
//!
//! All angles are in degrees. Radians only appear at the trigonometric call
//! sites inside this module, so callers never mix units.

use crate::types::Vec2;

/// Wrap an angle into `[0, 360)`.
pub fn clamp_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wrap an angle into `(-180, 180]`.
pub fn clamp_angle_180(angle: f64) -> f64 {
    let wrapped = clamp_angle(angle);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Signed shortest rotation from `from` to `to`, in `(-180, 180]`.
pub fn angle_delta(from: f64, to: f64) -> f64 {
    clamp_angle_180(to - from)
}

/// Minimum unsigned angular distance between two headings, in `[0, 180]`.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    angle_delta(a, b).abs()
}

/// Interpolate from `from` toward `to` along the shorter arc.
pub fn lerp_angle(from: f64, to: f64, t: f64) -> f64 {
    clamp_angle(from + angle_delta(from, to) * t)
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// `value / max` clamped to `[0, 1]`. A zero `max` saturates instead of
/// producing NaN.
pub fn factor(value: f64, max: f64) -> f64 {
    let ratio = value / max;
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// Heading of a vector in `[0, 360)`. The zero vector has heading 0.
pub fn vector_angle(v: Vec2) -> f64 {
    clamp_angle(v.y.atan2(v.x).to_degrees())
}

/// Unit vector pointing along `angle`.
pub fn angle_to_vector(angle: f64) -> Vec2 {
    let (sin, cos) = angle.to_radians().sin_cos();
    Vec2::new(cos, sin)
}

/// Unsigned angle between two vectors, in `[0, 180]`.
pub fn angle_between(a: Vec2, b: Vec2) -> f64 {
    angle_diff(vector_angle(a), vector_angle(b))
}

/// 2D cross product (z component of the 3D cross product).
pub fn cross(a: Vec2, b: Vec2) -> f64 {
    a.perp_dot(b)
}

/// Normalize, returning zero for a zero-length vector.
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len = v.length();
    if len > f64::EPSILON {
        v / len
    } else {
        Vec2::ZERO
    }
}

/// Local to world: scale, then rotate by `rotation` degrees, then translate.
pub fn transform(local: Vec2, rotation: f64, translation: Vec2, scale: f64) -> Vec2 {
    let scaled = local * scale;
    let (sin, cos) = rotation.to_radians().sin_cos();
    Vec2::new(
        scaled.x * cos - scaled.y * sin,
        scaled.x * sin + scaled.y * cos,
    ) + translation
}

/// Even-odd ray casting over an ordered vertex ring.
pub fn point_in_polygon(point: Vec2, ring: &[Vec2]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[j];
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// True if segment `p1-p2` touches segment `q1-q2`, including collinear overlap.
pub fn segments_intersect(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let d1 = cross(q2 - q1, p1 - q1);
    let d2 = cross(q2 - q1, p2 - q1);
    let d3 = cross(p2 - p1, q1 - p1);
    let d4 = cross(p2 - p1, q2 - p1);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

/// Assumes `p` is collinear with `a-b`.
fn on_segment(a: Vec2, b: Vec2, p: Vec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Average of the ring's vertices. Falls back to the origin for an empty ring.
pub fn vertex_centroid(ring: &[Vec2]) -> Vec2 {
    if ring.is_empty() {
        return Vec2::ZERO;
    }
    ring.iter().copied().sum::<Vec2>() / ring.len() as f64
}
