//! Match participants and their control sources.
//!
//! A [`Player`] is a board slot with lives, a steering direction, and a
//! control source expressed as a tagged variant ([`PlayerInner`]):
//!
//! - `User` - a remote human with an account identity. The account is only
//!   ever relayed outward on achievement events; the engine performs no
//!   persistence itself.
//! - `Ai` - a heuristic controller with an [`AiBrain`] holding its current
//!   target and next reaction deadline.
//! - `Local` - a second human on the match creator's keyboard.
//!
//! The variant is the capability check: code that needs an account extracts
//! it from the `User` payload, code that needs a brain extracts it from `Ai`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::object::PowerupKind;

/// A player's slot number within a match.
///
/// Slot numbers index map layouts (slot 0 gets the first paddle slot, and so
/// on) and identify object ownership. They are small and dense by design.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(u8);

impl PlayerId {
    /// Creates a `PlayerId` from a raw slot number.
    #[must_use]
    pub const fn new(slot: u8) -> Self {
        Self(slot)
    }

    /// Returns the raw slot number.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({})", self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque account identity of a remote human player.
///
/// Carried through the engine untouched and emitted on achievement events so
/// the collaborator layer can attribute them. The engine never resolves it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(u64);

impl AccountId {
    /// Creates an `AccountId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// An AI player's controller memory.
///
/// Two timescales: `intended_percent` is the current target position along
/// the paddle's travel range as a fraction in `[0, 1]`, recomputed only when
/// `next_recalc_at` passes; steering toward the target happens every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiBrain {
    /// Target position as a fraction of the travel range
    pub intended_percent: f32,
    /// Tick at or after which a new target must be computed
    pub next_recalc_at: u64,
}

impl Default for AiBrain {
    fn default() -> Self {
        Self {
            intended_percent: 0.5,
            next_recalc_at: 0,
        }
    }
}

/// A claimed power-up effect currently applied to a player or to the match.
///
/// `magnitude` records what was actually applied (for paddle growth, the
/// per-end extension after clamping) so expiry can undo it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    /// Which power-up produced this effect
    pub kind: PowerupKind,
    /// Tick at which the effect ends
    pub expires_at: u64,
    /// Applied magnitude, effect-specific
    pub magnitude: f32,
}

/// Control source variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerInner {
    /// Remote human with an account identity
    User {
        /// Account to attribute achievements to
        account: AccountId,
    },
    /// Heuristic AI controller
    Ai {
        /// Skill level, 1 (sluggish) to 10 (sharp)
        level: u8,
        /// Controller memory
        brain: AiBrain,
    },
    /// Second human sharing the creator's keyboard
    Local {
        /// Display label
        label: String,
    },
}

/// A match participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    /// Remaining lives; 0 means eliminated
    pub lives: u32,
    /// Continuous steering value in `[-1, 1]`, sampled once per tick
    pub direction: f32,
    /// Effects currently applied to this player's objects
    pub effects: Vec<ActiveEffect>,
    inner: PlayerInner,
}

impl Player {
    /// Creates a player in the given slot with the given control source.
    #[must_use]
    pub const fn new(id: PlayerId, lives: u32, inner: PlayerInner) -> Self {
        Self {
            id,
            lives,
            direction: 0.0,
            effects: Vec::new(),
            inner,
        }
    }

    /// Returns the player's slot identifier.
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// Returns a reference to the control source.
    #[must_use]
    pub const fn inner(&self) -> &PlayerInner {
        &self.inner
    }

    /// Returns a mutable reference to the control source.
    #[must_use]
    pub fn inner_mut(&mut self) -> &mut PlayerInner {
        &mut self.inner
    }

    /// Returns `true` if the player still has lives.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.lives > 0
    }

    /// Returns the account if this is a remote human.
    #[must_use]
    pub const fn account(&self) -> Option<AccountId> {
        match &self.inner {
            PlayerInner::User { account } => Some(*account),
            _ => None,
        }
    }

    /// Returns `true` if this player is AI-controlled.
    #[must_use]
    pub const fn is_ai(&self) -> bool {
        matches!(self.inner, PlayerInner::Ai { .. })
    }

    /// Returns `true` if this player is steered by external input
    /// (remote or local human).
    #[must_use]
    pub const fn is_human(&self) -> bool {
        matches!(
            self.inner,
            PlayerInner::User { .. } | PlayerInner::Local { .. }
        )
    }

    /// Returns the AI level and brain if this is an AI player.
    #[must_use]
    pub const fn ai(&self) -> Option<(u8, &AiBrain)> {
        match &self.inner {
            PlayerInner::Ai { level, brain } => Some((*level, brain)),
            _ => None,
        }
    }

    /// Returns the mutable AI brain if this is an AI player.
    #[must_use]
    pub fn brain_mut(&mut self) -> Option<&mut AiBrain> {
        match &mut self.inner {
            PlayerInner::Ai { brain, .. } => Some(brain),
            _ => None,
        }
    }
}
