//! Power-up lifecycle resolver: expire, claim, spawn.
//!
//! Order within the tick:
//!
//! 1. **Expire** instances whose `expires_at` has passed - claimed or not -
//!    and effects whose window has closed, undoing exactly what they
//!    applied (paddle growth contracts by the recorded magnitude).
//! 2. **Claim** unclaimed instances touched by a paddle (credited to its
//!    owner) or a ball (credited to the last player who deflected it). A
//!    claim flips `started`, applies the effect, and emits an event; the
//!    instance itself stays on the board until its own expiry.
//! 3. **Spawn** a new instance on the configured interval while fewer than
//!    the maximum number of unclaimed instances exist, at a seed-derived
//!    position in the central region.
//!
//! Everything here is gated on the match's power-up toggle; a match created
//! with power-ups disabled never enters this resolver's body.

use glam::Vec2;
use planar::Rect;
use rand::Rng;
use tracing::debug;

use crate::object::{BallState, ObjectId, ObjectInner, ObjectTag, PowerupKind, PowerupState};
use crate::output::{EventRecord, MatchEvent, OutputEnvelope, OutputKind};
use crate::player::{ActiveEffect, PlayerId};
use crate::state::MatchState;

use super::{Resolver, TickContext};

/// Resolver for the power-up lifecycle.
#[derive(Debug, Clone, Default)]
pub struct PowerupResolver;

impl PowerupResolver {
    /// Creates a power-up resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Removes instances past their expiry and unwinds elapsed effects.
    fn expire(ctx: &TickContext<'_>, next: &mut MatchState) {
        for id in next.board.ids_tagged(ObjectTag::Powerup) {
            let expired = next
                .board
                .get(id)
                .and_then(|o| o.as_powerup())
                .is_some_and(|p| p.expires_at <= ctx.tick);
            if expired {
                next.board.despawn(id);
            }
        }

        next.effects.retain(|e| e.expires_at > ctx.tick);

        let bounds = next.board.meta.bounds();
        let player_ids: Vec<PlayerId> = next.players.keys().copied().collect();
        for pid in player_ids {
            let expired: Vec<ActiveEffect> = {
                let Some(player) = next.player_mut(pid) else {
                    continue;
                };
                let (done, keep): (Vec<ActiveEffect>, Vec<ActiveEffect>) = player
                    .effects
                    .iter()
                    .copied()
                    .partition(|e| e.expires_at <= ctx.tick);
                player.effects = keep;
                done
            };
            for effect in expired {
                if effect.kind == PowerupKind::PaddleGrow {
                    Self::stretch_paddle(next, pid, -effect.magnitude, &bounds);
                }
            }
        }
    }

    /// Extends (positive) or contracts (negative) a paddle symmetrically
    /// along its own axis, clamped to the arena.
    ///
    /// Returns the per-end amount actually applied (absolute value).
    fn stretch_paddle(next: &mut MatchState, pid: PlayerId, amount: f32, bounds: &Rect) -> f32 {
        let Some(paddle_id) = next.board.paddle_id_of(pid) else {
            return 0.0;
        };
        let Some(paddle) = next.board.get_mut(paddle_id).and_then(|o| o.as_paddle_mut()) else {
            return 0.0;
        };

        let dir = paddle.segment().direction();
        if dir == Vec2::ZERO {
            return 0.0;
        }

        let applied = if amount >= 0.0 {
            let room1 = ray_room(paddle.anchor1, -dir, bounds);
            let room2 = ray_room(paddle.anchor2, dir, bounds);
            amount.min(room1).min(room2).max(0.0)
        } else {
            // Contraction can never over-shrink past the midpoint.
            amount.max(-(paddle.segment().length() / 2.0))
        };

        paddle.anchor1 -= dir * applied;
        paddle.anchor2 += dir * applied;
        applied.abs()
    }

    /// Detects contact claims and applies effects.
    fn claim(ctx: &TickContext<'_>, next: &mut MatchState, events: &mut Vec<EventRecord>) {
        let unclaimed: Vec<(ObjectId, PowerupKind, Vec2)> = next
            .board
            .objects_tagged(ObjectTag::Powerup)
            .filter_map(|o| {
                let p = o.as_powerup()?;
                (!p.started).then_some((o.id(), p.kind, p.position))
            })
            .collect();

        for (id, kind, position) in unclaimed {
            let Some(claimer) = Self::toucher(ctx, next, position) else {
                continue;
            };

            if let Some(pickup) = next.board.get_mut(id).and_then(|o| o.as_powerup_mut()) {
                pickup.started = true;
            }
            Self::apply_effect(ctx, next, id, kind, claimer);
            events.push(EventRecord {
                tick: ctx.tick,
                event: MatchEvent::PowerupClaimed {
                    object: id,
                    kind,
                    by: claimer,
                },
            });
        }
    }

    /// Finds who touched the pickup this tick, if anyone.
    ///
    /// Paddles claim for their owner; a ball claims for whoever last
    /// deflected it (possibly nobody). `Some(None)` therefore means
    /// "claimed, unattributed".
    fn toucher(
        ctx: &TickContext<'_>,
        next: &MatchState,
        position: Vec2,
    ) -> Option<Option<PlayerId>> {
        let paddle_reach = ctx.rules.powerup_pickup_radius + ctx.rules.paddle_half_thickness;
        for object in next.board.objects_tagged(ObjectTag::Paddle) {
            let Some(paddle) = object.as_paddle() else {
                continue;
            };
            if paddle.segment().distance_to(position) <= paddle_reach {
                return Some(object.owner());
            }
        }

        for object in next.board.objects_tagged(ObjectTag::Ball) {
            let Some(ball) = object.as_ball() else {
                continue;
            };
            let reach = ctx.rules.powerup_pickup_radius + ball.radius;
            if (ball.center - position).length() <= reach {
                return Some(ball.last_touch);
            }
        }

        None
    }

    /// Applies a claimed power-up's effect.
    fn apply_effect(
        ctx: &TickContext<'_>,
        next: &mut MatchState,
        id: ObjectId,
        kind: PowerupKind,
        claimer: Option<PlayerId>,
    ) {
        let expires_at = ctx.tick + ctx.rules.effect_duration;
        match kind {
            PowerupKind::BallRush => {
                next.effects.push(ActiveEffect {
                    kind,
                    expires_at,
                    magnitude: ctx.rules.ball_rush_factor,
                });
            }
            PowerupKind::PaddleGrow => {
                let Some(pid) = claimer else {
                    debug!(pickup = %id, "unattributed paddle-grow claim has no effect");
                    return;
                };
                let bounds = next.board.meta.bounds();
                let applied =
                    Self::stretch_paddle(next, pid, ctx.rules.paddle_grow, &bounds);
                if let Some(player) = next.player_mut(pid) {
                    player.effects.push(ActiveEffect {
                        kind,
                        expires_at,
                        magnitude: applied,
                    });
                }
            }
            PowerupKind::ExtraBall => {
                let mut rng = ctx.stream_rng("extra_ball", id.as_u64());
                let angle = rng.gen::<f32>() * std::f32::consts::TAU;
                let position = next
                    .board
                    .get(id)
                    .and_then(|o| o.as_powerup())
                    .map_or_else(|| next.board.center(), |p| p.position);
                next.board.spawn(
                    &format!("ball-{}", ctx.tick),
                    None,
                    ObjectInner::Ball(BallState::new(
                        position,
                        ctx.rules.ball_radius,
                        Vec2::from_angle(angle) * ctx.rules.ball_serve_speed,
                    )),
                );
            }
        }
    }

    /// Spawns a new instance on the configured cadence.
    fn spawn(ctx: &TickContext<'_>, next: &mut MatchState, events: &mut Vec<EventRecord>) {
        if ctx.tick == 0 || ctx.tick % ctx.rules.powerup_spawn_interval != 0 {
            return;
        }
        let unclaimed = next
            .board
            .objects_tagged(ObjectTag::Powerup)
            .filter(|o| o.as_powerup().is_some_and(|p| !p.started))
            .count();
        if unclaimed >= ctx.rules.powerup_max_active {
            return;
        }

        let mut rng = ctx.stream_rng("powerup", 0);
        let kind = match rng.gen_range(0..3) {
            0 => PowerupKind::BallRush,
            1 => PowerupKind::PaddleGrow,
            _ => PowerupKind::ExtraBall,
        };
        let bounds = next.board.meta.bounds();
        let position = Vec2::new(
            bounds.min.x + (0.25 + 0.5 * rng.gen::<f32>()) * bounds.width(),
            bounds.min.y + (0.25 + 0.5 * rng.gen::<f32>()) * bounds.height(),
        );

        let id = next.board.spawn(
            &format!("powerup-{}", ctx.tick),
            None,
            ObjectInner::Powerup(PowerupState::new(
                kind,
                position,
                ctx.tick + ctx.rules.powerup_lifetime,
            )),
        );
        events.push(EventRecord {
            tick: ctx.tick,
            event: MatchEvent::PowerupSpawned { object: id, kind },
        });
    }
}

impl Resolver for PowerupResolver {
    fn handles(&self) -> &[OutputKind] {
        &[]
    }

    fn resolve(
        &self,
        _outputs: &[&OutputEnvelope],
        ctx: &TickContext<'_>,
        _current: &MatchState,
        next: &mut MatchState,
        events: &mut Vec<EventRecord>,
    ) {
        if !ctx.rules.powerups {
            return;
        }
        Self::expire(ctx, next);
        Self::claim(ctx, next, events);
        Self::spawn(ctx, next, events);
    }
}

/// Distance `p` can travel along unit direction `d` before leaving `bounds`.
fn ray_room(p: Vec2, d: Vec2, bounds: &Rect) -> f32 {
    let mut room = f32::INFINITY;
    if d.x > f32::EPSILON {
        room = room.min((bounds.max.x - p.x) / d.x);
    } else if d.x < -f32::EPSILON {
        room = room.min((bounds.min.x - p.x) / d.x);
    }
    if d.y > f32::EPSILON {
        room = room.min((bounds.max.y - p.y) / d.y);
    } else if d.y < -f32::EPSILON {
        room = room.min((bounds.min.y - p.y) / d.y);
    }
    room.max(0.0)
}
