//! Vector helpers that are total over all inputs.
//!
//! Every function here is defined for every finite input. The one case that
//! usually needs a policy - normalizing the zero vector - is defined away:
//! the zero vector normalizes to the zero vector. Callers never branch on a
//! division-by-zero error mid-tick.

use glam::Vec2;

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Returns a vector of length `target` in the direction of `v`.
///
/// The zero vector (and anything short enough to normalize to it) maps to
/// the zero vector regardless of `target`.
///
/// # Example
///
/// ```
/// use glam::Vec2;
///
/// let v = planar::normalize_to(Vec2::new(3.0, 4.0), 10.0);
/// assert!((v.length() - 10.0).abs() < 1e-5);
///
/// assert_eq!(planar::normalize_to(Vec2::ZERO, 10.0), Vec2::ZERO);
/// ```
#[must_use]
pub fn normalize_to(v: Vec2, target: f32) -> Vec2 {
    v.normalize_or_zero() * target
}

/// Rotates `v` by `angle` radians (counter-clockwise) about the origin.
#[must_use]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Angle of `v` relative to the +X axis, in radians.
///
/// Computed as `atan2(y, x)`, range `(-pi, pi]`. The zero vector yields 0.
#[must_use]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}
