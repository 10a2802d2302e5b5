//! Line segments with the queries a paddle/ball loop needs.
//!
//! A [`Segment`] is an ordered endpoint pair. Degenerate segments (both
//! endpoints equal) are legal everywhere: direction is the zero vector,
//! the closest point is the shared endpoint, and the contact offset is 0.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;

/// An ordered pair of endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First endpoint
    pub a: Vec2,
    /// Second endpoint
    pub b: Vec2,
}

impl Segment {
    /// Creates a segment from two endpoints.
    #[must_use]
    pub const fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// Length of the segment.
    #[must_use]
    pub fn length(&self) -> f32 {
        (self.b - self.a).length()
    }

    /// Unit direction from `a` to `b`, or the zero vector for a degenerate
    /// segment.
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        (self.b - self.a).normalize_or_zero()
    }

    /// Midpoint of the segment.
    #[must_use]
    pub fn midpoint(&self) -> Vec2 {
        (self.a + self.b) * 0.5
    }

    /// Returns the segment translated by `delta`.
    #[must_use]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            a: self.a + delta,
            b: self.b + delta,
        }
    }

    /// Closest point on the segment to `p`.
    ///
    /// For a degenerate segment this is the shared endpoint.
    #[must_use]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let ab = self.b - self.a;
        let len_sq = ab.length_squared();
        if len_sq <= f32::EPSILON {
            return self.a;
        }
        let t = ((p - self.a).dot(ab) / len_sq).clamp(0.0, 1.0);
        self.a + ab * t
    }

    /// Distance from `p` to the segment.
    #[must_use]
    pub fn distance_to(&self, p: Vec2) -> f32 {
        (p - self.closest_point(p)).length()
    }

    /// Contact offset of `p` along the segment, in `[-1, 1]`.
    ///
    /// -1 at endpoint `a`, 0 at the midpoint, +1 at endpoint `b`. The
    /// projection is clamped to the segment, so points beyond an endpoint
    /// report that endpoint's offset. Degenerate segments report 0.
    #[must_use]
    pub fn offset_of(&self, p: Vec2) -> f32 {
        let ab = self.b - self.a;
        let len_sq = ab.length_squared();
        if len_sq <= f32::EPSILON {
            return 0.0;
        }
        let t = ((p - self.a).dot(ab) / len_sq).clamp(0.0, 1.0);
        t * 2.0 - 1.0
    }

    /// Largest prefix of `delta` that keeps both endpoints inside `rect`.
    ///
    /// Returns `delta * s` for the greatest `s` in `[0, 1]` such that the
    /// translated segment stays within the rectangle. A segment already
    /// pressed against a wall can still slide along it or move back inside;
    /// it can never be pushed further out.
    #[must_use]
    pub fn clamp_translation(&self, delta: Vec2, rect: &Rect) -> Vec2 {
        let mut scale: f32 = 1.0;

        // Per-axis room toward each wall, expressed as a fraction of delta.
        if delta.x > 0.0 {
            let room = rect.max.x - self.a.x.max(self.b.x);
            scale = scale.min((room / delta.x).max(0.0));
        } else if delta.x < 0.0 {
            let room = self.a.x.min(self.b.x) - rect.min.x;
            scale = scale.min((room / -delta.x).max(0.0));
        }
        if delta.y > 0.0 {
            let room = rect.max.y - self.a.y.max(self.b.y);
            scale = scale.min((room / delta.y).max(0.0));
        } else if delta.y < 0.0 {
            let room = self.a.y.min(self.b.y) - rect.min.y;
            scale = scale.min((room / -delta.y).max(0.0));
        }

        delta * scale.clamp(0.0, 1.0)
    }
}
