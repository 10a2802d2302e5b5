//! Match configuration, validation, and initial board construction.
//!
//! A [`MatchConfig`] arrives from the collaborator layer already parsed but
//! not yet trusted. Everything that can be wrong with it - no players, an
//! unknown map, more players than the map has slots, out-of-range lives or
//! difficulty - is rejected here with a [`MatchConfigError`] before a single
//! tick runs. Once a simulation exists, its configuration is valid by
//! construction and the tick loop never re-validates.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, BoardMeta};
use crate::object::{BallState, DamageZoneState, DecorState, ObjectInner, PaddleState, Side};
use crate::player::{AccountId, AiBrain, Player, PlayerId, PlayerInner};
use crate::rules::Rules;
use crate::state::MatchState;

/// Depth of the protected strip behind each goal line, in arena units.
///
/// Must exceed the largest per-tick ball displacement so a ball cannot jump
/// the strip entirely between two containment tests.
const ZONE_DEPTH: f32 = 12.0;

/// One requested participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerSpec {
    /// Remote human identified by account.
    User {
        /// Account achievements are attributed to
        account: AccountId,
    },
    /// AI-controlled slot.
    Ai {
        /// Skill level `1..=10`; defaults to the match difficulty
        level: Option<u8>,
    },
    /// Second human on the match creator's keyboard.
    Local {
        /// Display label
        label: String,
    },
}

/// Validated-on-construction match setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Participants in slot order
    pub players: Vec<PlayerSpec>,
    /// Match difficulty, `1..=10`
    pub difficulty: u8,
    /// Whether power-ups spawn
    pub powerups: bool,
    /// Map name, resolved against the built-in layouts
    pub map: String,
    /// Starting lives per player, at least 1
    pub player_lives: u32,
}

impl MatchConfig {
    /// Checks every configuration invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant; see [`MatchConfigError`].
    pub fn validate(&self) -> Result<(), MatchConfigError> {
        if self.players.is_empty() {
            return Err(MatchConfigError::NoPlayers);
        }
        if !(1..=10).contains(&self.difficulty) {
            return Err(MatchConfigError::InvalidDifficulty(self.difficulty));
        }
        if self.player_lives < 1 {
            return Err(MatchConfigError::InvalidLives(self.player_lives));
        }
        for spec in &self.players {
            if let PlayerSpec::Ai { level: Some(level) } = spec {
                if !(1..=10).contains(level) {
                    return Err(MatchConfigError::InvalidAiLevel(*level));
                }
            }
        }
        let layout =
            MapLayout::by_name(&self.map).ok_or_else(|| MatchConfigError::UnknownMap(self.map.clone()))?;
        if self.players.len() > layout.slots.len() {
            return Err(MatchConfigError::TooManyPlayers {
                map: self.map.clone(),
                slots: layout.slots.len(),
                requested: self.players.len(),
            });
        }
        Ok(())
    }
}

/// Why a match configuration was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchConfigError {
    /// The player list was empty.
    #[error("a match needs at least one player")]
    NoPlayers,
    /// The named map is not a built-in layout.
    #[error("unknown map `{0}`")]
    UnknownMap(String),
    /// More players than the map has paddle slots.
    #[error("map `{map}` has {slots} slots but {requested} players were requested")]
    TooManyPlayers {
        /// Map name
        map: String,
        /// Slots the map offers
        slots: usize,
        /// Players requested
        requested: usize,
    },
    /// Difficulty outside `1..=10`.
    #[error("difficulty must be between 1 and 10, got {0}")]
    InvalidDifficulty(u8),
    /// Starting lives below 1.
    #[error("players need at least 1 life, got {0}")]
    InvalidLives(u32),
    /// An explicit AI level outside `1..=10`.
    #[error("AI level must be between 1 and 10, got {0}")]
    InvalidAiLevel(u8),
}

/// A paddle slot in a map layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PaddleSlot {
    /// Arena side this slot defends
    pub side: Side,
    /// Initial first anchor
    pub anchor1: Vec2,
    /// Initial second anchor
    pub anchor2: Vec2,
}

/// A built-in arena layout.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayout {
    /// Map name, matched against [`MatchConfig::map`]
    pub name: &'static str,
    /// Map author credit
    pub author: &'static str,
    /// Playable width
    pub width: f32,
    /// Playable height
    pub height: f32,
    /// Paddle slots in player-slot order
    pub slots: Vec<PaddleSlot>,
    /// Cosmetic outlines
    pub decor: Vec<Vec<Vec2>>,
}

impl MapLayout {
    /// Resolves a layout by name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "classic" => Some(Self::classic()),
            "quad" => Some(Self::quad()),
            _ => None,
        }
    }

    /// Two-slot head-to-head arena: paddles on the left and right walls.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            name: "classic",
            author: "rebound",
            width: 100.0,
            height: 100.0,
            slots: vec![
                PaddleSlot {
                    side: Side::Left,
                    anchor1: Vec2::new(0.0, 40.0),
                    anchor2: Vec2::new(0.0, 60.0),
                },
                PaddleSlot {
                    side: Side::Right,
                    anchor1: Vec2::new(100.0, 40.0),
                    anchor2: Vec2::new(100.0, 60.0),
                },
            ],
            decor: vec![vec![
                Vec2::new(49.5, 0.0),
                Vec2::new(50.5, 0.0),
                Vec2::new(50.5, 100.0),
                Vec2::new(49.5, 100.0),
            ]],
        }
    }

    /// Four-slot free-for-all: one paddle per wall.
    #[must_use]
    pub fn quad() -> Self {
        Self {
            name: "quad",
            author: "rebound",
            width: 100.0,
            height: 100.0,
            slots: vec![
                PaddleSlot {
                    side: Side::Left,
                    anchor1: Vec2::new(0.0, 40.0),
                    anchor2: Vec2::new(0.0, 60.0),
                },
                PaddleSlot {
                    side: Side::Right,
                    anchor1: Vec2::new(100.0, 40.0),
                    anchor2: Vec2::new(100.0, 60.0),
                },
                PaddleSlot {
                    side: Side::Top,
                    anchor1: Vec2::new(40.0, 100.0),
                    anchor2: Vec2::new(60.0, 100.0),
                },
                PaddleSlot {
                    side: Side::Bottom,
                    anchor1: Vec2::new(40.0, 0.0),
                    anchor2: Vec2::new(60.0, 0.0),
                },
            ],
            decor: vec![vec![
                Vec2::new(50.0, 46.0),
                Vec2::new(54.0, 50.0),
                Vec2::new(50.0, 54.0),
                Vec2::new(46.0, 50.0),
            ]],
        }
    }

    /// Outline of the protected strip behind `side`.
    ///
    /// The strip hangs outside the playable rectangle so a ball only enters
    /// it by crossing the goal line.
    #[must_use]
    pub fn zone_outline(&self, side: Side) -> Vec<Vec2> {
        let (w, h, d) = (self.width, self.height, ZONE_DEPTH);
        match side {
            Side::Left => vec![
                Vec2::new(-d, 0.0),
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, h),
                Vec2::new(-d, h),
            ],
            Side::Right => vec![
                Vec2::new(w, 0.0),
                Vec2::new(w + d, 0.0),
                Vec2::new(w + d, h),
                Vec2::new(w, h),
            ],
            Side::Top => vec![
                Vec2::new(0.0, h),
                Vec2::new(w, h),
                Vec2::new(w, h + d),
                Vec2::new(0.0, h + d),
            ],
            Side::Bottom => vec![
                Vec2::new(0.0, -d),
                Vec2::new(w, -d),
                Vec2::new(w, 0.0),
                Vec2::new(0.0, 0.0),
            ],
        }
    }
}

/// Builds the initial match state for a validated configuration.
///
/// Spawn order is fixed (decor, then per-slot paddle and zone, then the
/// ball) so object IDs - and with them iteration order - are identical for
/// identical configurations. The ball is spawned at rest; the simulation
/// serves it with a seed-derived direction before the first tick.
///
/// # Errors
///
/// Propagates [`MatchConfig::validate`] failures.
pub fn build_state(config: &MatchConfig, rules: &Rules) -> Result<MatchState, MatchConfigError> {
    config.validate()?;
    // Validation guarantees the map resolves.
    let layout = MapLayout::by_name(&config.map).ok_or_else(|| MatchConfigError::UnknownMap(config.map.clone()))?;

    let mut board = Board::new(BoardMeta::new(
        layout.name,
        layout.author,
        layout.width,
        layout.height,
    ));

    for (i, outline) in layout.decor.iter().enumerate() {
        board.spawn(
            &format!("decor-{i}"),
            None,
            ObjectInner::Decor(DecorState {
                outline: outline.clone(),
            }),
        );
    }

    let mut players = BTreeMap::new();
    for (slot, spec) in config.players.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let id = PlayerId::new(slot as u8);
        let slot_layout = &layout.slots[slot];

        board.spawn(
            &format!("paddle-{slot}"),
            Some(id),
            ObjectInner::Paddle(PaddleState::new(slot_layout.anchor1, slot_layout.anchor2)),
        );
        board.spawn(
            &format!("zone-{slot}"),
            Some(id),
            ObjectInner::DamageZone(DamageZoneState::new(
                slot_layout.side,
                layout.zone_outline(slot_layout.side),
            )),
        );

        let inner = match spec {
            PlayerSpec::User { account } => PlayerInner::User { account: *account },
            PlayerSpec::Ai { level } => PlayerInner::Ai {
                level: level.unwrap_or(config.difficulty),
                brain: AiBrain::default(),
            },
            PlayerSpec::Local { label } => PlayerInner::Local {
                label: label.clone(),
            },
        };
        players.insert(id, Player::new(id, config.player_lives, inner));
    }

    board.spawn(
        "ball-0",
        None,
        ObjectInner::Ball(BallState::new(board.center(), rules.ball_radius, Vec2::ZERO)),
    );

    Ok(MatchState::new(board, players))
}
