//! Motion resolver: paddles first, then steering commands, then balls.
//!
//! The internal order matters and is fixed:
//!
//! 1. **Paddle motion** uses the steering directions sampled at tick start
//!    (from `current`), so nothing a plugin emitted this tick can move a
//!    paddle this tick.
//! 2. **Command application** writes `Steer`/`Retarget` outputs into the
//!    next player table; they take effect when the next tick samples them.
//! 3. **Ball motion** advances every ball against the already-moved paddles,
//!    resolves paddle and wall collisions, and sets the damage-zone flags
//!    that scoring reads.
//!
//! A live player without a paddle, a command for an unknown player, or a
//! retarget aimed at a human are transient anomalies: logged and skipped,
//! never fatal.

use glam::Vec2;
use planar::{contains_point, deflect, normalize_to, reflect, Segment};
use tracing::{debug, warn};

use crate::object::{BallState, ObjectTag, Side};
use crate::output::{Command, EventRecord, OutputEnvelope, OutputKind};
use crate::player::PlayerId;
use crate::state::MatchState;

use super::{Resolver, TickContext};

/// Clearance added when pushing a ball out of a paddle, so the contact does
/// not re-trigger on the next tick.
const PUSH_OUT_MARGIN: f32 = 0.01;

/// Resolver for paddle and ball motion.
#[derive(Debug, Clone, Default)]
pub struct MotionResolver;

impl MotionResolver {
    /// Creates a motion resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Moves every live player's paddle by its sampled direction, clamped to
    /// the arena.
    fn move_paddles(ctx: &TickContext<'_>, current: &MatchState, next: &mut MatchState) {
        let bounds = next.board.meta.bounds();
        for player in current.players_sorted() {
            if !player.is_alive() || player.direction == 0.0 {
                continue;
            }
            let Some(paddle_id) = next.board.paddle_id_of(player.id()) else {
                warn!(player = %player.id(), "live player has no paddle, skipping paddle motion");
                continue;
            };
            let Some(paddle) = next.board.get_mut(paddle_id).and_then(|o| o.as_paddle_mut())
            else {
                continue;
            };

            let axis = paddle.segment().direction();
            let desired = axis * player.direction.clamp(-1.0, 1.0) * ctx.rules.paddle_speed;
            let allowed = paddle.segment().clamp_translation(desired, &bounds);
            paddle.translate(allowed);
        }
    }

    /// Applies steering and retarget commands to the next tick's players.
    fn apply_commands(outputs: &[&OutputEnvelope], next: &mut MatchState) {
        for envelope in outputs {
            let Some(command) = envelope.output().as_command() else {
                continue;
            };
            match command {
                Command::Steer { player, direction } => {
                    if let Some(p) = next.player_mut(*player) {
                        p.direction = direction.clamp(-1.0, 1.0);
                    } else {
                        debug!(player = %player, "steer command for unknown player dropped");
                    }
                }
                Command::Retarget {
                    player,
                    intended_percent,
                    next_recalc_at,
                } => {
                    let Some(p) = next.player_mut(*player) else {
                        debug!(player = %player, "retarget for unknown player dropped");
                        continue;
                    };
                    if let Some(brain) = p.brain_mut() {
                        brain.intended_percent = intended_percent.clamp(0.0, 1.0);
                        brain.next_recalc_at = *next_recalc_at;
                    } else {
                        debug!(player = %player, "retarget for non-AI player dropped");
                    }
                }
            }
        }
    }

    /// Advances every ball, resolving paddle bounces, wall bounces, and
    /// goal-line crossings.
    fn move_balls(ctx: &TickContext<'_>, next: &mut MatchState) {
        // The zone flags are per-tick state: clear before recomputing.
        let zone_ids = next.board.ids_tagged(ObjectTag::DamageZone);
        for id in &zone_ids {
            if let Some(zone) = next.board.get_mut(*id).and_then(|o| o.as_damage_zone_mut()) {
                zone.ball_inside = false;
            }
        }

        let factor = next.ball_speed_factor();
        let bounds = next.board.meta.bounds();
        let guarded = [
            (Side::Left, next.board.zone_owner_on(Side::Left).is_some()),
            (Side::Right, next.board.zone_owner_on(Side::Right).is_some()),
            (Side::Top, next.board.zone_owner_on(Side::Top).is_some()),
            (Side::Bottom, next.board.zone_owner_on(Side::Bottom).is_some()),
        ];
        let is_guarded = |side: Side| guarded.iter().any(|(s, g)| *s == side && *g);

        for ball_id in next.board.ids_tagged(ObjectTag::Ball) {
            let Some(mut ball) = next.board.get(ball_id).and_then(|o| o.as_ball()).cloned()
            else {
                continue;
            };

            ball.center += ball.velocity * factor;
            if ball.paddle_cooldown > 0 {
                ball.paddle_cooldown -= 1;
            }

            if ball.paddle_cooldown == 0 {
                Self::bounce_off_paddles(ctx, next, &mut ball);
            }

            // Walls reflect; goal lines guarded by a living player let the
            // ball through into the damage strip.
            if !is_guarded(Side::Left)
                && ball.center.x - ball.radius <= bounds.min.x
                && ball.velocity.x < 0.0
            {
                ball.velocity.x = -ball.velocity.x;
                ball.center.x = bounds.min.x + ball.radius;
            }
            if !is_guarded(Side::Right)
                && ball.center.x + ball.radius >= bounds.max.x
                && ball.velocity.x > 0.0
            {
                ball.velocity.x = -ball.velocity.x;
                ball.center.x = bounds.max.x - ball.radius;
            }
            if !is_guarded(Side::Bottom)
                && ball.center.y - ball.radius <= bounds.min.y
                && ball.velocity.y < 0.0
            {
                ball.velocity.y = -ball.velocity.y;
                ball.center.y = bounds.min.y + ball.radius;
            }
            if !is_guarded(Side::Top)
                && ball.center.y + ball.radius >= bounds.max.y
                && ball.velocity.y > 0.0
            {
                ball.velocity.y = -ball.velocity.y;
                ball.center.y = bounds.max.y - ball.radius;
            }

            // Single containment evaluation per zone per tick; everything
            // downstream reads the flag.
            for zone_id in &zone_ids {
                let breached = next
                    .board
                    .get(*zone_id)
                    .and_then(|o| o.as_damage_zone())
                    .is_some_and(|z| contains_point(&z.outline, ball.center));
                if breached {
                    if let Some(zone) =
                        next.board.get_mut(*zone_id).and_then(|o| o.as_damage_zone_mut())
                    {
                        zone.ball_inside = true;
                    }
                }
            }

            if let Some(slot) = next.board.get_mut(ball_id).and_then(|o| o.as_ball_mut()) {
                *slot = ball;
            }
        }
    }

    /// Reflects a ball off the first paddle it overlaps, with contact-offset
    /// deflection and a capped speed boost.
    fn bounce_off_paddles(ctx: &TickContext<'_>, next: &MatchState, ball: &mut BallState) {
        let reach = ball.radius + ctx.rules.paddle_half_thickness;
        let paddles: Vec<(PlayerId, Segment)> = next
            .board
            .objects_tagged(ObjectTag::Paddle)
            .filter_map(|o| Some((o.owner()?, o.as_paddle()?.segment())))
            .collect();

        for (owner, segment) in paddles {
            if segment.distance_to(ball.center) > reach {
                continue;
            }

            let closest = segment.closest_point(ball.center);
            let mut normal = normalize_to(ball.center - closest, 1.0);
            if normal == Vec2::ZERO {
                // Ball center exactly on the segment: fall back to bouncing
                // straight back.
                normal = normalize_to(-ball.velocity, 1.0);
            }

            let speed = ball.velocity.length();
            let offset = segment.offset_of(ball.center);
            let bounced = deflect(reflect(ball.velocity, normal), offset, ctx.rules.deflection_gain);
            let capped = (speed * ctx.rules.paddle_bounce_boost).min(ctx.rules.ball_max_speed);
            ball.velocity = normalize_to(bounced, capped);
            ball.center = closest + normal * (reach + PUSH_OUT_MARGIN);
            ball.last_touch = Some(owner);
            ball.paddle_cooldown = ctx.rules.ball_cooldown_ticks;
            break;
        }
    }
}

impl Resolver for MotionResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Command]
    }

    fn resolve(
        &self,
        outputs: &[&OutputEnvelope],
        ctx: &TickContext<'_>,
        current: &MatchState,
        next: &mut MatchState,
        _events: &mut Vec<EventRecord>,
    ) {
        Self::move_paddles(ctx, current, next);
        Self::apply_commands(outputs, next);
        Self::move_balls(ctx, next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, BoardMeta};
    use crate::object::{DamageZoneState, ObjectId, ObjectInner, PaddleState};
    use crate::output::{Output, PluginId, PluginInstanceId, TraceId};
    use crate::player::{AccountId, AiBrain, Player, PlayerInner};
    use crate::rules::Rules;
    use std::collections::BTreeMap;

    fn empty_arena_state() -> MatchState {
        let board = Board::new(BoardMeta::new("test", "rebound", 100.0, 100.0));
        MatchState::new(board, BTreeMap::new())
    }

    fn add_user(state: &mut MatchState, slot: u8) -> PlayerId {
        let id = PlayerId::new(slot);
        state.players.insert(
            id,
            Player::new(
                id,
                3,
                PlayerInner::User {
                    account: AccountId::new(u64::from(slot)),
                },
            ),
        );
        id
    }

    fn add_paddle(state: &mut MatchState, owner: PlayerId, a: Vec2, b: Vec2) -> ObjectId {
        state.board.spawn(
            "paddle",
            Some(owner),
            ObjectInner::Paddle(PaddleState::new(a, b)),
        )
    }

    fn add_ball(state: &mut MatchState, center: Vec2, velocity: Vec2) -> ObjectId {
        state.board.spawn(
            "ball",
            None,
            ObjectInner::Ball(BallState::new(center, 1.5, velocity)),
        )
    }

    fn resolve_once(current: &MatchState, outputs: &[&OutputEnvelope]) -> MatchState {
        let rules = Rules::default();
        let ctx = TickContext {
            tick: current.board.current_tick(),
            master_seed: 42,
            rules: &rules,
        };
        let mut next = current.clone();
        let mut events = Vec::new();
        MotionResolver::new().resolve(outputs, &ctx, current, &mut next, &mut events);
        next
    }

    fn envelope(cmd: Command) -> OutputEnvelope {
        OutputEnvelope::new(
            Output::Command(cmd),
            PluginInstanceId::new(ObjectId::new(0), PluginId::new("test")),
            TraceId::new(0),
            0,
            0,
        )
    }

    mod paddle_motion_tests {
        use super::*;

        #[test]
        fn paddle_advances_by_direction_times_speed() {
            let mut state = empty_arena_state();
            let p = add_user(&mut state, 0);
            let paddle_id = add_paddle(&mut state, p, Vec2::new(0.0, 40.0), Vec2::new(0.0, 60.0));
            state.player_mut(p).unwrap().direction = 1.0;

            let next = resolve_once(&state, &[]);

            let paddle = next.board.get(paddle_id).unwrap().as_paddle().unwrap();
            assert_eq!(paddle.anchor1, Vec2::new(0.0, 43.0));
            assert_eq!(paddle.anchor2, Vec2::new(0.0, 63.0));
        }

        #[test]
        fn paddle_stops_at_the_wall() {
            let mut state = empty_arena_state();
            let p = add_user(&mut state, 0);
            let paddle_id = add_paddle(&mut state, p, Vec2::new(0.0, 40.0), Vec2::new(0.0, 60.0));
            state.player_mut(p).unwrap().direction = 1.0;

            // Drive the paddle upward far longer than the arena allows.
            let mut state = state;
            for _ in 0..30 {
                state = resolve_once(&state, &[]);
            }

            let paddle = state.board.get(paddle_id).unwrap().as_paddle().unwrap();
            assert!((paddle.anchor2.y - 100.0).abs() < 1e-3);
            assert!((paddle.anchor1.y - 80.0).abs() < 1e-3);
        }

        #[test]
        fn continuous_direction_scales_linearly() {
            let mut state = empty_arena_state();
            let p = add_user(&mut state, 0);
            let paddle_id = add_paddle(&mut state, p, Vec2::new(0.0, 40.0), Vec2::new(0.0, 60.0));
            state.player_mut(p).unwrap().direction = 0.5;

            let next = resolve_once(&state, &[]);

            let paddle = next.board.get(paddle_id).unwrap().as_paddle().unwrap();
            assert!((paddle.anchor1.y - 41.5).abs() < 1e-6);
        }

        #[test]
        fn eliminated_player_is_skipped() {
            let mut state = empty_arena_state();
            let p = add_user(&mut state, 0);
            let paddle_id = add_paddle(&mut state, p, Vec2::new(0.0, 40.0), Vec2::new(0.0, 60.0));
            state.player_mut(p).unwrap().direction = 1.0;
            state.player_mut(p).unwrap().lives = 0;

            let next = resolve_once(&state, &[]);

            let paddle = next.board.get(paddle_id).unwrap().as_paddle().unwrap();
            assert_eq!(paddle.anchor1, Vec2::new(0.0, 40.0));
        }

        #[test]
        fn missing_paddle_does_not_halt_the_tick() {
            let mut state = empty_arena_state();
            let broken = add_user(&mut state, 0);
            state.player_mut(broken).unwrap().direction = 1.0;

            let healthy = add_user(&mut state, 1);
            let paddle_id =
                add_paddle(&mut state, healthy, Vec2::new(100.0, 40.0), Vec2::new(100.0, 60.0));
            state.player_mut(healthy).unwrap().direction = -1.0;

            let next = resolve_once(&state, &[]);

            // The healthy player still moved.
            let paddle = next.board.get(paddle_id).unwrap().as_paddle().unwrap();
            assert!((paddle.anchor1.y - 37.0).abs() < 1e-6);
        }
    }

    mod command_tests {
        use super::*;

        #[test]
        fn steer_applies_to_next_tick_not_this_one() {
            let mut state = empty_arena_state();
            let p = add_user(&mut state, 0);
            let paddle_id = add_paddle(&mut state, p, Vec2::new(0.0, 40.0), Vec2::new(0.0, 60.0));
            // Direction at tick start is 0; the command arrives mid-tick.
            let env = envelope(Command::Steer {
                player: p,
                direction: 1.0,
            });

            let next = resolve_once(&state, &[&env]);

            // Paddle did not move this tick...
            let paddle = next.board.get(paddle_id).unwrap().as_paddle().unwrap();
            assert_eq!(paddle.anchor1, Vec2::new(0.0, 40.0));
            // ...but the direction is staged for the next one.
            assert!((next.player(p).unwrap().direction - 1.0).abs() < f32::EPSILON);
        }

        #[test]
        fn steer_direction_is_clamped() {
            let mut state = empty_arena_state();
            let p = add_user(&mut state, 0);
            let env = envelope(Command::Steer {
                player: p,
                direction: 7.5,
            });
            let next = resolve_once(&state, &[&env]);
            assert!((next.player(p).unwrap().direction - 1.0).abs() < f32::EPSILON);
        }

        #[test]
        fn retarget_updates_ai_brains_only() {
            let mut state = empty_arena_state();
            let ai = PlayerId::new(0);
            state.players.insert(
                ai,
                Player::new(
                    ai,
                    3,
                    PlayerInner::Ai {
                        level: 5,
                        brain: AiBrain::default(),
                    },
                ),
            );
            let human = add_user(&mut state, 1);

            let retarget_ai = envelope(Command::Retarget {
                player: ai,
                intended_percent: 0.8,
                next_recalc_at: 77,
            });
            let retarget_human = envelope(Command::Retarget {
                player: human,
                intended_percent: 0.1,
                next_recalc_at: 99,
            });

            let next = resolve_once(&state, &[&retarget_ai, &retarget_human]);

            let (_, brain) = next.player(ai).unwrap().ai().unwrap();
            assert!((brain.intended_percent - 0.8).abs() < f32::EPSILON);
            assert_eq!(brain.next_recalc_at, 77);
            // The human is untouched and nothing panicked.
            assert!(next.player(human).unwrap().ai().is_none());
        }

        #[test]
        fn commands_for_unknown_players_are_dropped() {
            let state = empty_arena_state();
            let env = envelope(Command::Steer {
                player: PlayerId::new(9),
                direction: 1.0,
            });
            // Must not panic.
            let _ = resolve_once(&state, &[&env]);
        }
    }

    mod ball_motion_tests {
        use super::*;

        #[test]
        fn ball_advances_by_velocity() {
            let mut state = empty_arena_state();
            let ball_id = add_ball(&mut state, Vec2::new(50.0, 50.0), Vec2::new(3.0, 0.0));

            let next = resolve_once(&state, &[]);

            let ball = next.board.get(ball_id).unwrap().as_ball().unwrap();
            assert_eq!(ball.center, Vec2::new(53.0, 50.0));
        }

        #[test]
        fn unguarded_wall_reflects_x_component() {
            let mut state = empty_arena_state();
            let ball_id = add_ball(&mut state, Vec2::new(50.0, 50.0), Vec2::new(3.0, 0.0));

            let mut state = state;
            for _ in 0..40 {
                state = resolve_once(&state, &[]);
            }

            let ball = state.board.get(ball_id).unwrap().as_ball().unwrap();
            // The ball bounced off x=100 and is heading back.
            assert!(ball.velocity.x < 0.0);
            assert!(ball.center.x < 100.0);
        }

        #[test]
        fn ball_at_rest_stays_at_rest() {
            let mut state = empty_arena_state();
            let ball_id = add_ball(&mut state, Vec2::new(50.0, 50.0), Vec2::ZERO);

            let next = resolve_once(&state, &[]);

            let ball = next.board.get(ball_id).unwrap().as_ball().unwrap();
            assert_eq!(ball.center, Vec2::new(50.0, 50.0));
            assert_eq!(ball.velocity, Vec2::ZERO);
        }

        #[test]
        fn paddle_bounce_reverses_and_caps_speed() {
            let rules = Rules::default();
            let mut state = empty_arena_state();
            let p = add_user(&mut state, 0);
            add_paddle(&mut state, p, Vec2::new(0.0, 40.0), Vec2::new(0.0, 60.0));
            // Ball flying straight at the paddle's midpoint.
            let ball_id = add_ball(&mut state, Vec2::new(4.0, 50.0), Vec2::new(-2.0, 0.0));

            let next = resolve_once(&state, &[]);

            let ball = next.board.get(ball_id).unwrap().as_ball().unwrap();
            assert!(ball.velocity.x > 0.0, "ball should rebound off the paddle");
            assert_eq!(ball.last_touch, Some(p));
            assert!(ball.paddle_cooldown > 0);
            assert!(ball.speed() <= rules.ball_max_speed + 1e-3);
        }

        #[test]
        fn repeated_bounces_never_exceed_the_speed_cap() {
            let rules = Rules::default();
            let mut state = empty_arena_state();
            let p = add_user(&mut state, 0);
            // A wall of paddle in the middle; the ball ping-pongs against
            // the right arena wall forever.
            add_paddle(&mut state, p, Vec2::new(50.0, 0.0), Vec2::new(50.0, 100.0));
            let ball_id = add_ball(&mut state, Vec2::new(75.0, 50.0), Vec2::new(2.0, 0.0));

            let mut state = state;
            for _ in 0..500 {
                state = resolve_once(&state, &[]);
                let ball = state.board.get(ball_id).unwrap().as_ball().unwrap();
                assert!(
                    ball.speed() <= rules.ball_max_speed + 1e-3,
                    "speed cap violated: {}",
                    ball.speed()
                );
            }
        }

        #[test]
        fn offset_contact_deflects_the_rebound() {
            let mut state = empty_arena_state();
            let p = add_user(&mut state, 0);
            add_paddle(&mut state, p, Vec2::new(0.0, 40.0), Vec2::new(0.0, 60.0));
            // Contact near the upper tip of the paddle.
            let ball_id = add_ball(&mut state, Vec2::new(4.0, 58.0), Vec2::new(-2.0, 0.0));

            let next = resolve_once(&state, &[]);

            let ball = next.board.get(ball_id).unwrap().as_ball().unwrap();
            assert!(ball.velocity.x > 0.0);
            // Tip contact rotates the rebound off the straight-back line.
            assert!(ball.velocity.y.abs() > 1e-3);
        }

        #[test]
        fn zero_length_paddle_is_harmless() {
            let mut state = empty_arena_state();
            let p = add_user(&mut state, 0);
            add_paddle(&mut state, p, Vec2::new(20.0, 50.0), Vec2::new(20.0, 50.0));
            let ball_id = add_ball(&mut state, Vec2::new(21.0, 50.0), Vec2::new(-1.0, 0.0));

            let next = resolve_once(&state, &[]);

            let ball = next.board.get(ball_id).unwrap().as_ball().unwrap();
            assert!(ball.velocity.x.is_finite());
            assert!(ball.velocity.y.is_finite());
            assert!(ball.center.x.is_finite());
        }

        #[test]
        fn guarded_side_lets_the_ball_through_and_flags_the_zone() {
            let mut state = empty_arena_state();
            let p = add_user(&mut state, 0);
            let zone_id = state.board.spawn(
                "zone",
                Some(p),
                ObjectInner::DamageZone(DamageZoneState::new(
                    Side::Left,
                    vec![
                        Vec2::new(-12.0, 0.0),
                        Vec2::new(0.0, 0.0),
                        Vec2::new(0.0, 100.0),
                        Vec2::new(-12.0, 100.0),
                    ],
                )),
            );
            let ball_id = add_ball(&mut state, Vec2::new(2.0, 50.0), Vec2::new(-3.0, 0.0));

            let next = resolve_once(&state, &[]);

            let ball = next.board.get(ball_id).unwrap().as_ball().unwrap();
            assert!(ball.center.x < 0.0, "ball should cross the goal line");
            assert!(ball.velocity.x < 0.0, "no reflection on a guarded side");
            let zone = next.board.get(zone_id).unwrap().as_damage_zone().unwrap();
            assert!(zone.ball_inside);
            assert!(next.has_player_been_hit(p));
        }

        #[test]
        fn zone_flag_is_cleared_next_tick() {
            let mut state = empty_arena_state();
            let p = add_user(&mut state, 0);
            let zone_id = state.board.spawn(
                "zone",
                Some(p),
                ObjectInner::DamageZone(DamageZoneState::new(
                    Side::Left,
                    vec![
                        Vec2::new(-12.0, 0.0),
                        Vec2::new(0.0, 0.0),
                        Vec2::new(0.0, 100.0),
                        Vec2::new(-12.0, 100.0),
                    ],
                )),
            );
            // Flag set by hand; no ball anywhere near the zone.
            state
                .board
                .get_mut(zone_id)
                .unwrap()
                .as_damage_zone_mut()
                .unwrap()
                .ball_inside = true;
            add_ball(&mut state, Vec2::new(50.0, 50.0), Vec2::new(1.0, 0.0));

            let next = resolve_once(&state, &[]);

            let zone = next.board.get(zone_id).unwrap().as_damage_zone().unwrap();
            assert!(!zone.ball_inside);
        }
    }
}
