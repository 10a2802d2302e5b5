//! Read-only view of the frozen tick snapshot.
//!
//! Plugins receive a [`WorldView`] instead of the state itself: everything
//! on it is immutable, so a plugin cannot mutate mid-tick no matter what it
//! does. The view also carries the rules table and a few derived queries
//! (travel percents) so controllers do not re-implement arena math.

use glam::Vec2;
use planar::Rect;

use crate::object::{BallState, Object, ObjectId, ObjectTag, PaddleState};
use crate::player::{Player, PlayerId};
use crate::rules::Rules;
use crate::state::MatchState;

/// Immutable view of one tick's starting state.
#[derive(Clone, Copy)]
pub struct WorldView<'a> {
    state: &'a MatchState,
    rules: &'a Rules,
    tick: u64,
}

impl<'a> WorldView<'a> {
    /// Creates a view over `state` for the given tick.
    #[must_use]
    pub const fn new(state: &'a MatchState, rules: &'a Rules, tick: u64) -> Self {
        Self { state, rules, tick }
    }

    /// The tick this view was frozen at.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// The match tuning table.
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        self.rules
    }

    /// The playable bounds.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.state.board.meta.bounds()
    }

    /// Looks up an object by ID.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&'a Object> {
        self.state.board.get(id)
    }

    /// Looks up a player by slot.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&'a Player> {
        self.state.player(id)
    }

    /// The paddle owned by `player`, if present.
    #[must_use]
    pub fn paddle_of(&self, player: PlayerId) -> Option<&'a PaddleState> {
        self.state.board.paddle_of(player).and_then(Object::as_paddle)
    }

    /// Balls on the board, in ID order.
    pub fn balls(&self) -> impl Iterator<Item = &'a BallState> + '_ {
        self.state
            .board
            .objects_tagged(ObjectTag::Ball)
            .filter_map(Object::as_ball)
    }

    /// The lowest-ID ball, if any. This is the ball AI controllers track.
    #[must_use]
    pub fn primary_ball(&self) -> Option<&'a BallState> {
        self.balls().next()
    }

    /// A paddle's current position along its travel axis, in `[0, 1]`.
    ///
    /// Travel is measured by the paddle midpoint across the arena dimension
    /// matching the paddle's dominant axis. Degenerate paddles report
    /// vertical travel.
    #[must_use]
    pub fn paddle_travel_percent(&self, paddle: &PaddleState) -> f32 {
        self.point_travel_percent(paddle, paddle.segment().midpoint())
    }

    /// An arbitrary point expressed on a paddle's travel axis, in `[0, 1]`.
    ///
    /// Used by controllers to project the ball onto the axis a paddle can
    /// actually move along.
    #[must_use]
    pub fn point_travel_percent(&self, paddle: &PaddleState, point: Vec2) -> f32 {
        let axis = paddle.segment().direction();
        let bounds = self.bounds();
        let percent = if axis.x.abs() > axis.y.abs() {
            (point.x - bounds.min.x) / bounds.width()
        } else {
            (point.y - bounds.min.y) / bounds.height()
        };
        percent.clamp(0.0, 1.0)
    }
}
