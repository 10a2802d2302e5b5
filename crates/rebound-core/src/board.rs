//! The match board: object storage with deterministic iteration order.
//!
//! The [`Board`] is the container for all objects in a match. Objects are
//! stored in a `BTreeMap` keyed by [`ObjectId`]; IDs are assigned
//! monotonically, so ID order is insertion order and iteration is
//! deterministic across platforms and runs. All simulation code iterates
//! through the sorted accessors.
//!
//! Removal during iteration is never done in place: callers (and
//! [`Board::prune_owned_by`]) collect IDs first, then despawn, so no entry
//! is skipped while the map is being walked.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use rebound_core::board::{Board, BoardMeta};
//! use rebound_core::object::{BallState, ObjectInner};
//!
//! let mut board = Board::new(BoardMeta::new("classic", "rebound", 100.0, 100.0));
//! let ball = board.spawn(
//!     "ball",
//!     None,
//!     ObjectInner::Ball(BallState::new(Vec2::new(50.0, 50.0), 1.5, Vec2::ZERO)),
//! );
//!
//! assert!(board.get(ball).is_some());
//! assert_eq!(board.object_count(), 1);
//! ```

use std::collections::BTreeMap;

use glam::Vec2;
use planar::Rect;
use serde::{Deserialize, Serialize};

use crate::object::{Object, ObjectId, ObjectInner, ObjectTag, Side};
use crate::player::PlayerId;

/// Arena identity and bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardMeta {
    /// Map name
    pub name: String,
    /// Map author
    pub author: String,
    /// Playable width
    pub width: f32,
    /// Playable height
    pub height: f32,
}

impl BoardMeta {
    /// Creates board metadata.
    #[must_use]
    pub fn new(name: &str, author: &str, width: f32, height: f32) -> Self {
        Self {
            name: name.to_string(),
            author: author.to_string(),
            width,
            height,
        }
    }

    /// The playable bounds as a rectangle anchored at the origin.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }
}

/// Container for all objects in a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Arena identity and bounds
    pub meta: BoardMeta,
    /// Monotonically increasing object ID counter.
    next_id: u64,
    /// Object storage; `BTreeMap` gives deterministic, insertion-ordered
    /// iteration because IDs are monotonic.
    objects: BTreeMap<ObjectId, Object>,
    /// Current simulation tick.
    tick: u64,
}

impl Board {
    /// Creates an empty board at tick 0.
    #[must_use]
    pub fn new(meta: BoardMeta) -> Self {
        Self {
            meta,
            next_id: 0,
            objects: BTreeMap::new(),
            tick: 0,
        }
    }

    /// Spawns a new object, assigning it the next ID.
    ///
    /// Returns the assigned ID.
    pub fn spawn(&mut self, name: &str, owner: Option<PlayerId>, inner: ObjectInner) -> ObjectId {
        let id = ObjectId::new(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, Object::new(id, name, owner, inner));
        id
    }

    /// Removes an object, returning it if it existed.
    pub fn despawn(&mut self, id: ObjectId) -> Option<Object> {
        self.objects.remove(&id)
    }

    /// Returns a reference to an object by ID.
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(&id)
    }

    /// Returns a mutable reference to an object by ID.
    #[must_use]
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(&id)
    }

    /// Iterator over object IDs in sorted (insertion) order.
    pub fn object_ids_sorted(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys().copied()
    }

    /// Iterator over objects in sorted (insertion) order.
    pub fn objects_sorted(&self) -> impl Iterator<Item = &Object> + '_ {
        self.objects.values()
    }

    /// Iterator over mutable objects in sorted (insertion) order.
    pub fn objects_sorted_mut(&mut self) -> impl Iterator<Item = &mut Object> + '_ {
        self.objects.values_mut()
    }

    /// Iterator over objects with the given tag, in sorted order.
    pub fn objects_tagged(&self, tag: ObjectTag) -> impl Iterator<Item = &Object> + '_ {
        self.objects.values().filter(move |o| o.tag() == tag)
    }

    /// IDs of objects with the given tag, in sorted order.
    ///
    /// Useful when the caller needs to mutate objects one at a time while
    /// scanning: collect the IDs first, then `get_mut` each.
    #[must_use]
    pub fn ids_tagged(&self, tag: ObjectTag) -> Vec<ObjectId> {
        self.objects
            .values()
            .filter(|o| o.tag() == tag)
            .map(Object::id)
            .collect()
    }

    /// Removes every object owned by `player`.
    ///
    /// IDs are collected first and then despawned, so removal is stable with
    /// respect to iteration. Returns the removed IDs in sorted order.
    pub fn prune_owned_by(&mut self, player: PlayerId) -> Vec<ObjectId> {
        let doomed: Vec<ObjectId> = self
            .objects
            .values()
            .filter(|o| o.owner() == Some(player))
            .map(Object::id)
            .collect();
        for id in &doomed {
            self.objects.remove(id);
        }
        doomed
    }

    /// The paddle owned by `player`, if present.
    #[must_use]
    pub fn paddle_of(&self, player: PlayerId) -> Option<&Object> {
        self.objects
            .values()
            .find(|o| o.is_paddle() && o.owner() == Some(player))
    }

    /// ID of the paddle owned by `player`, if present.
    #[must_use]
    pub fn paddle_id_of(&self, player: PlayerId) -> Option<ObjectId> {
        self.paddle_of(player).map(Object::id)
    }

    /// The damage zone owned by `player`, if present.
    #[must_use]
    pub fn damage_zone_of(&self, player: PlayerId) -> Option<&Object> {
        self.objects
            .values()
            .find(|o| o.is_damage_zone() && o.owner() == Some(player))
    }

    /// The living owner of the damage zone guarding `side`, if any.
    ///
    /// Eliminated players' zones are pruned, so a side with no zone object
    /// behaves as a plain reflecting wall.
    #[must_use]
    pub fn zone_owner_on(&self, side: Side) -> Option<PlayerId> {
        self.objects
            .values()
            .find(|o| o.as_damage_zone().is_some_and(|z| z.side == side))
            .and_then(Object::owner)
    }

    /// Arena center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.meta.bounds().center()
    }

    /// Number of objects on the board.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the board holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns the current simulation tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the simulation tick counter.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{BallState, DamageZoneState, PaddleState};

    fn test_board() -> Board {
        Board::new(BoardMeta::new("classic", "rebound", 100.0, 100.0))
    }

    fn spawn_paddle(board: &mut Board, slot: u8) -> ObjectId {
        board.spawn(
            "paddle",
            Some(PlayerId::new(slot)),
            ObjectInner::Paddle(PaddleState::new(Vec2::new(0.0, 40.0), Vec2::new(0.0, 60.0))),
        )
    }

    fn spawn_zone(board: &mut Board, slot: u8, side: Side) -> ObjectId {
        board.spawn(
            "zone",
            Some(PlayerId::new(slot)),
            ObjectInner::DamageZone(DamageZoneState::new(side, Vec::new())),
        )
    }

    #[test]
    fn spawn_assigns_sequential_ids() {
        let mut board = test_board();
        let a = spawn_paddle(&mut board, 0);
        let b = spawn_paddle(&mut board, 1);
        assert_eq!(a, ObjectId::new(0));
        assert_eq!(b, ObjectId::new(1));
        assert_eq!(board.object_count(), 2);
    }

    #[test]
    fn despawn_removes_object() {
        let mut board = test_board();
        let id = spawn_paddle(&mut board, 0);
        assert!(board.despawn(id).is_some());
        assert!(board.get(id).is_none());
        assert!(board.despawn(id).is_none());
    }

    #[test]
    fn iteration_order_is_insertion_order() {
        let mut board = test_board();
        let ids: Vec<ObjectId> = (0..4).map(|slot| spawn_paddle(&mut board, slot)).collect();
        let walked: Vec<ObjectId> = board.object_ids_sorted().collect();
        assert_eq!(ids, walked);
    }

    #[test]
    fn ids_are_not_reused_after_despawn() {
        let mut board = test_board();
        let a = spawn_paddle(&mut board, 0);
        board.despawn(a);
        let b = spawn_paddle(&mut board, 1);
        assert_ne!(a, b);
        assert_eq!(b, ObjectId::new(1));
    }

    #[test]
    fn prune_owned_by_removes_all_of_a_players_objects() {
        let mut board = test_board();
        let p0_paddle = spawn_paddle(&mut board, 0);
        let p0_zone = spawn_zone(&mut board, 0, Side::Left);
        let p1_paddle = spawn_paddle(&mut board, 1);
        let ball = board.spawn(
            "ball",
            None,
            ObjectInner::Ball(BallState::new(Vec2::new(50.0, 50.0), 1.5, Vec2::ZERO)),
        );

        let removed = board.prune_owned_by(PlayerId::new(0));

        assert_eq!(removed, vec![p0_paddle, p0_zone]);
        assert!(board.get(p0_paddle).is_none());
        assert!(board.get(p0_zone).is_none());
        assert!(board.get(p1_paddle).is_some());
        assert!(board.get(ball).is_some());
    }

    #[test]
    fn per_player_lookups() {
        let mut board = test_board();
        spawn_paddle(&mut board, 0);
        spawn_zone(&mut board, 0, Side::Left);
        spawn_paddle(&mut board, 1);
        spawn_zone(&mut board, 1, Side::Right);

        assert!(board.paddle_of(PlayerId::new(0)).is_some());
        assert!(board.damage_zone_of(PlayerId::new(1)).is_some());
        assert!(board.paddle_of(PlayerId::new(2)).is_none());
        assert_eq!(board.zone_owner_on(Side::Left), Some(PlayerId::new(0)));
        assert_eq!(board.zone_owner_on(Side::Right), Some(PlayerId::new(1)));
        assert_eq!(board.zone_owner_on(Side::Top), None);
    }

    #[test]
    fn zone_owner_gone_after_prune() {
        let mut board = test_board();
        spawn_zone(&mut board, 0, Side::Left);
        board.prune_owned_by(PlayerId::new(0));
        assert_eq!(board.zone_owner_on(Side::Left), None);
    }

    #[test]
    fn tick_counter_advances() {
        let mut board = test_board();
        assert_eq!(board.current_tick(), 0);
        board.advance_tick();
        board.advance_tick();
        assert_eq!(board.current_tick(), 2);
    }

    #[test]
    fn serialization_roundtrip_preserves_counters() {
        let mut board = test_board();
        spawn_paddle(&mut board, 0);
        board.advance_tick();

        let json = serde_json::to_string(&board).unwrap();
        let mut back: Board = serde_json::from_str(&json).unwrap();

        assert_eq!(back.object_count(), 1);
        assert_eq!(back.current_tick(), 1);
        // ID sequence continues after deserialization.
        let next = spawn_paddle(&mut back, 1);
        assert_eq!(next, ObjectId::new(1));
    }
}
