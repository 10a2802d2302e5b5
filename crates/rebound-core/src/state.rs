//! Complete per-match state, double-buffered by the simulation.
//!
//! [`MatchState`] aggregates the board, the player table, globally-scoped
//! power-up effects, and the match phase. The whole struct is cloned into
//! the "next" buffer at the start of each resolution pass and swapped back
//! at the end of the tick, so a tick reads a frozen snapshot and writes a
//! complete successor state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::object::PowerupKind;
use crate::player::{ActiveEffect, Player, PlayerId};

/// Phase of a match.
///
/// A match runs until at most one player has lives left. Per-tick incidents
/// (a player losing a life, a player being eliminated) are reported as
/// events, not phases; `MatchOver` is the only terminal condition and once
/// reached the simulation refuses further ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// The match is being simulated.
    Running,
    /// Terminal: at most one player remains.
    MatchOver {
        /// The surviving player, or `None` for a mutual wipe-out.
        winner: Option<PlayerId>,
    },
}

/// All state for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    /// The arena and its objects
    pub board: Board,
    /// Players keyed by slot; `BTreeMap` for deterministic iteration
    pub players: BTreeMap<PlayerId, Player>,
    /// Match-scoped effects (ball modifiers)
    pub effects: Vec<ActiveEffect>,
    /// Current phase
    pub phase: MatchPhase,
}

impl MatchState {
    /// Creates a running match state around a board and player table.
    #[must_use]
    pub fn new(board: Board, players: BTreeMap<PlayerId, Player>) -> Self {
        Self {
            board,
            players,
            effects: Vec::new(),
            phase: MatchPhase::Running,
        }
    }

    /// Returns a player by slot.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// Returns a mutable player by slot.
    #[must_use]
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    /// Iterator over players in slot order.
    pub fn players_sorted(&self) -> impl Iterator<Item = &Player> + '_ {
        self.players.values()
    }

    /// IDs of players that still have lives, in slot order.
    #[must_use]
    pub fn alive_players(&self) -> Vec<PlayerId> {
        self.players
            .values()
            .filter(|p| p.is_alive())
            .map(Player::id)
            .collect()
    }

    /// True iff `player`'s damage zone was breached by a ball this tick.
    ///
    /// Reads the zone's per-tick flag - the single source of truth computed
    /// once during ball motion. A player with no zone (eliminated, or never
    /// configured) reports `false`.
    #[must_use]
    pub fn has_player_been_hit(&self, player: PlayerId) -> bool {
        self.board
            .damage_zone_of(player)
            .and_then(|o| o.as_damage_zone())
            .is_some_and(|z| z.ball_inside)
    }

    /// The current global speed factor for balls.
    ///
    /// 1.0 with no active effects; each active `BallRush` multiplies in its
    /// recorded magnitude.
    #[must_use]
    pub fn ball_speed_factor(&self) -> f32 {
        self.effects
            .iter()
            .filter(|e| e.kind == PowerupKind::BallRush)
            .map(|e| e.magnitude)
            .product()
    }

    /// True once the match has ended.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self.phase, MatchPhase::MatchOver { .. })
    }
}
