//! Velocity reflection off a surface.

use glam::Vec2;

use crate::vector::rotate;

/// Reflects `v` about the unit surface normal `normal`.
///
/// Standard mirror reflection: `v' = v - 2 (v . n) n`. The normal must be
/// unit length for the result to preserve speed; a zero normal returns `v`
/// unchanged (the kernel-wide zero-vector policy).
#[must_use]
pub fn reflect(v: Vec2, normal: Vec2) -> Vec2 {
    v - 2.0 * v.dot(normal) * normal
}

/// Rotates `v` by `offset * gain` radians.
///
/// `offset` is a contact offset in `[-1, 1]` (see
/// [`Segment::offset_of`](crate::Segment::offset_of)); `gain` is the maximum
/// deflection angle applied at the segment tips. Speed is preserved.
#[must_use]
pub fn deflect(v: Vec2, offset: f32, gain: f32) -> Vec2 {
    rotate(v, offset * gain)
}
