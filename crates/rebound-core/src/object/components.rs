//! Per-variant state structs for board objects.
//!
//! Each object kind carries exactly the fields that kind needs; there are no
//! optional fields to check at runtime. The structs are plain data: behavior
//! lives in the resolvers.

use glam::Vec2;
use planar::Segment;
use serde::{Deserialize, Serialize};

use crate::player::PlayerId;

/// Which arena side a damage zone guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The `x = 0` edge
    Left,
    /// The `x = width` edge
    Right,
    /// The `y = height` edge
    Top,
    /// The `y = 0` edge
    Bottom,
}

/// Enumerated power-up kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Temporarily raises the global ball speed factor.
    BallRush,
    /// Temporarily lengthens the claiming player's paddle.
    PaddleGrow,
    /// Spawns an additional ball at the pickup position.
    ExtraBall,
}

/// State for a paddle: the segment endpoints defining its pose.
///
/// The motion axis is the segment direction; a paddle slides along its own
/// length. Degenerate paddles (both anchors equal) are tolerated by the
/// geometry kernel and simply never collide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaddleState {
    /// First segment endpoint
    pub anchor1: Vec2,
    /// Second segment endpoint
    pub anchor2: Vec2,
}

impl PaddleState {
    /// Creates a paddle from its two anchors.
    #[must_use]
    pub const fn new(anchor1: Vec2, anchor2: Vec2) -> Self {
        Self { anchor1, anchor2 }
    }

    /// The paddle as a geometric segment.
    #[must_use]
    pub const fn segment(&self) -> Segment {
        Segment::new(self.anchor1, self.anchor2)
    }

    /// Translates both anchors by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        self.anchor1 += delta;
        self.anchor2 += delta;
    }
}

/// State for a ball.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    /// Center position
    pub center: Vec2,
    /// Collision radius
    pub radius: f32,
    /// Displacement per tick before the global speed factor
    pub velocity: Vec2,
    /// Player who last deflected this ball, if any (credits power-up claims)
    pub last_touch: Option<PlayerId>,
    /// Ticks remaining before the ball may hit a paddle again
    pub paddle_cooldown: u32,
}

impl BallState {
    /// Creates a ball at `center` with the given radius and velocity.
    #[must_use]
    pub const fn new(center: Vec2, radius: f32, velocity: Vec2) -> Self {
        Self {
            center,
            radius,
            velocity,
            last_touch: None,
            paddle_cooldown: 0,
        }
    }

    /// Current speed (displacement magnitude per tick, before effects).
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// State for a damage zone: the protected strip behind a player's goal line.
///
/// `ball_inside` is the per-tick hit flag: set during ball motion when a
/// ball's center is contained in the outline, cleared at the start of the
/// next motion pass. Everything downstream (scoring, external queries) reads
/// this flag rather than re-deriving containment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageZoneState {
    /// Arena side this zone guards
    pub side: Side,
    /// Closed polygon outline of the protected strip
    pub outline: Vec<Vec2>,
    /// True the tick a ball was found inside the outline
    pub ball_inside: bool,
}

impl DamageZoneState {
    /// Creates an un-breached zone on `side` with the given outline.
    #[must_use]
    pub const fn new(side: Side, outline: Vec<Vec2>) -> Self {
        Self {
            side,
            outline,
            ball_inside: false,
        }
    }
}

/// State for a spawned power-up instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerupState {
    /// What the pickup does when claimed
    pub kind: PowerupKind,
    /// Pickup position
    pub position: Vec2,
    /// True once claimed; a started instance cannot be claimed again
    pub started: bool,
    /// Tick at which the instance disappears, claimed or not
    pub expires_at: u64,
}

impl PowerupState {
    /// Creates an unclaimed instance.
    #[must_use]
    pub const fn new(kind: PowerupKind, position: Vec2, expires_at: u64) -> Self {
        Self {
            kind,
            position,
            started: false,
            expires_at,
        }
    }
}

/// Cosmetic map geometry. Never collided, only rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorState {
    /// Polygon outline for rendering
    pub outline: Vec<Vec2>,
}
