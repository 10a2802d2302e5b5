//! # Planar
//!
//! Flat 2D geometry kernel for arcade physics: vectors, segments, polygon
//! containment, and reflection.
//!
//! Planar knows nothing about games. It provides the small set of primitives
//! a tick-based physics loop leans on every frame:
//!
//! - **Vector helpers** that are total over all inputs - the zero vector
//!   normalizes to the zero vector instead of erroring ([`vector`])
//! - **Segments** with closest-point, distance, and contact-offset queries,
//!   plus translation clamping against an axis-aligned rectangle ([`segment`])
//! - **Polygon containment** via an even-odd ray cast ([`polygon`])
//! - **Reflection** of a velocity about a surface normal, with an optional
//!   contact-offset deflection ([`reflect`])
//!
//! ## Quick Start
//!
//! ```
//! use glam::Vec2;
//! use planar::{Rect, Segment};
//!
//! let arena = Rect::from_size(100.0, 100.0);
//! let paddle = Segment::new(Vec2::new(0.0, 40.0), Vec2::new(0.0, 60.0));
//!
//! // Slide the paddle up by 3 units, clamped to the arena.
//! let allowed = paddle.clamp_translation(Vec2::new(0.0, 3.0), &arena);
//! let moved = paddle.translated(allowed);
//! assert!(arena.contains(moved.a) && arena.contains(moved.b));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod polygon;
pub mod reflect;
pub mod segment;
pub mod vector;

// Re-exports for convenience
pub use polygon::contains_point;
pub use reflect::{deflect, reflect};
pub use segment::Segment;
pub use vector::{angle_of, distance, normalize_to, rotate};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle.
///
/// Used as the playable bounds for clamping and containment tests. Both
/// edges are inclusive: a point exactly on the boundary is inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Rect {
    /// Creates a rectangle from explicit corners.
    ///
    /// The caller is responsible for `min <= max` component-wise.
    #[must_use]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Creates a rectangle spanning `[0, width] x [0, height]`.
    #[must_use]
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }

    /// Width of the rectangle.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height of the rectangle.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Center point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Returns true if `p` lies inside the rectangle (boundary inclusive).
    #[must_use]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Clamps `p` to the nearest point inside the rectangle.
    #[must_use]
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}
