//! Board objects as tagged variants.
//!
//! This module provides the entity types for the match board:
//! - [`ObjectId`]: unique identifier, assigned in insertion order
//! - [`ObjectTag`]: kind classification for registry lookup and filtering
//! - [`ObjectInner`]: type-safe storage for kind-specific state
//! - [`Object`]: the complete object container
//!
//! Each kind carries exactly the fields relevant to it - a ball has a
//! velocity, a paddle has anchors, a damage zone has its per-tick hit flag -
//! so match arms are exhaustive and no code path has to check whether an
//! optional field happens to exist.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use rebound_core::object::{BallState, Object, ObjectId, ObjectInner, ObjectTag};
//!
//! let ball = Object::new(
//!     ObjectId::new(7),
//!     "ball",
//!     None,
//!     ObjectInner::Ball(BallState::new(Vec2::new(50.0, 50.0), 1.5, Vec2::ZERO)),
//! );
//!
//! assert_eq!(ball.id().as_u64(), 7);
//! assert_eq!(ball.tag(), ObjectTag::Ball);
//! assert!(ball.as_ball().is_some());
//! ```

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{
    BallState, DamageZoneState, DecorState, PaddleState, PowerupKind, PowerupState, Side,
};

use crate::player::PlayerId;

/// Unique identifier for a board object.
///
/// `ObjectId` wraps a `u64` assigned monotonically by the board, so ID order
/// is insertion order. Iterating objects sorted by ID is therefore both
/// deterministic and stable with respect to spawn order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Creates an `ObjectId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ObjectId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Object kind tag, used for plugin registry lookup and coarse filtering.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectTag {
    /// A player's paddle
    Paddle,
    /// A ball in flight
    Ball,
    /// The protected strip behind a player's goal line
    DamageZone,
    /// A spawned power-up pickup
    Powerup,
    /// Cosmetic map geometry
    Decor,
}

impl fmt::Display for ObjectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paddle => write!(f, "Paddle"),
            Self::Ball => write!(f, "Ball"),
            Self::DamageZone => write!(f, "DamageZone"),
            Self::Powerup => write!(f, "Powerup"),
            Self::Decor => write!(f, "Decor"),
        }
    }
}

/// Type-safe storage for kind-specific object state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectInner {
    /// Paddle state (segment anchors)
    Paddle(PaddleState),
    /// Ball state (center, radius, velocity, touch history)
    Ball(BallState),
    /// Damage zone state (side, outline, per-tick hit flag)
    DamageZone(DamageZoneState),
    /// Power-up instance state (kind, position, lifecycle)
    Powerup(PowerupState),
    /// Decorative geometry
    Decor(DecorState),
}

impl ObjectInner {
    /// Returns the tag corresponding to this storage variant.
    #[must_use]
    pub const fn tag(&self) -> ObjectTag {
        match self {
            Self::Paddle(_) => ObjectTag::Paddle,
            Self::Ball(_) => ObjectTag::Ball,
            Self::DamageZone(_) => ObjectTag::DamageZone,
            Self::Powerup(_) => ObjectTag::Powerup,
            Self::Decor(_) => ObjectTag::Decor,
        }
    }
}

/// A complete board object.
///
/// Combines an [`ObjectId`], a human-readable name (for render layers), an
/// optional owning player, and the kind-specific [`ObjectInner`]. The tag is
/// derived from the inner storage at construction, so tag and storage can
/// never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    id: ObjectId,
    name: String,
    owner: Option<PlayerId>,
    tag: ObjectTag,
    inner: ObjectInner,
}

impl Object {
    /// Creates a new object. The tag is derived from `inner`.
    #[must_use]
    pub fn new(id: ObjectId, name: &str, owner: Option<PlayerId>, inner: ObjectInner) -> Self {
        let tag = inner.tag();
        Self {
            id,
            name: name.to_string(),
            owner,
            tag,
            inner,
        }
    }

    /// Returns the object's unique identifier.
    #[must_use]
    pub const fn id(&self) -> ObjectId {
        self.id
    }

    /// Returns the object's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the owning player, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    /// Returns the object's kind tag.
    #[must_use]
    pub const fn tag(&self) -> ObjectTag {
        self.tag
    }

    /// Returns a reference to the kind-specific storage.
    #[must_use]
    pub const fn inner(&self) -> &ObjectInner {
        &self.inner
    }

    /// Returns the paddle state if this is a paddle.
    #[must_use]
    pub const fn as_paddle(&self) -> Option<&PaddleState> {
        match &self.inner {
            ObjectInner::Paddle(state) => Some(state),
            _ => None,
        }
    }

    /// Returns mutable paddle state if this is a paddle.
    #[must_use]
    pub fn as_paddle_mut(&mut self) -> Option<&mut PaddleState> {
        match &mut self.inner {
            ObjectInner::Paddle(state) => Some(state),
            _ => None,
        }
    }

    /// Returns the ball state if this is a ball.
    #[must_use]
    pub const fn as_ball(&self) -> Option<&BallState> {
        match &self.inner {
            ObjectInner::Ball(state) => Some(state),
            _ => None,
        }
    }

    /// Returns mutable ball state if this is a ball.
    #[must_use]
    pub fn as_ball_mut(&mut self) -> Option<&mut BallState> {
        match &mut self.inner {
            ObjectInner::Ball(state) => Some(state),
            _ => None,
        }
    }

    /// Returns the damage zone state if this is a damage zone.
    #[must_use]
    pub const fn as_damage_zone(&self) -> Option<&DamageZoneState> {
        match &self.inner {
            ObjectInner::DamageZone(state) => Some(state),
            _ => None,
        }
    }

    /// Returns mutable damage zone state if this is a damage zone.
    #[must_use]
    pub fn as_damage_zone_mut(&mut self) -> Option<&mut DamageZoneState> {
        match &mut self.inner {
            ObjectInner::DamageZone(state) => Some(state),
            _ => None,
        }
    }

    /// Returns the power-up state if this is a power-up.
    #[must_use]
    pub const fn as_powerup(&self) -> Option<&PowerupState> {
        match &self.inner {
            ObjectInner::Powerup(state) => Some(state),
            _ => None,
        }
    }

    /// Returns mutable power-up state if this is a power-up.
    #[must_use]
    pub fn as_powerup_mut(&mut self) -> Option<&mut PowerupState> {
        match &mut self.inner {
            ObjectInner::Powerup(state) => Some(state),
            _ => None,
        }
    }

    /// Returns the decor state if this is decor.
    #[must_use]
    pub const fn as_decor(&self) -> Option<&DecorState> {
        match &self.inner {
            ObjectInner::Decor(state) => Some(state),
            _ => None,
        }
    }

    /// Returns `true` if this object is a paddle.
    #[must_use]
    pub const fn is_paddle(&self) -> bool {
        matches!(self.tag, ObjectTag::Paddle)
    }

    /// Returns `true` if this object is a ball.
    #[must_use]
    pub const fn is_ball(&self) -> bool {
        matches!(self.tag, ObjectTag::Ball)
    }

    /// Returns `true` if this object is a damage zone.
    #[must_use]
    pub const fn is_damage_zone(&self) -> bool {
        matches!(self.tag, ObjectTag::DamageZone)
    }

    /// Returns `true` if this object is a power-up.
    #[must_use]
    pub const fn is_powerup(&self) -> bool {
        matches!(self.tag, ObjectTag::Powerup)
    }
}
