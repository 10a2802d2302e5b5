//! Scoring resolver: hits, lives, eliminations, match over.
//!
//! Runs after motion, reading the damage-zone flags motion computed. In
//! player-slot order: a flagged zone costs its owner one life and re-serves
//! every ball found inside the strip from the arena center with a
//! seed-derived direction. A player dropping to zero lives has every owned
//! object pruned from the board (IDs collected first, then despawned) and is
//! announced as eliminated. When fewer than two players remain alive the
//! match transitions to its terminal phase.
//!
//! The cosmetic lucky-achievement draw also lives here: each surviving
//! remote human gets an independent, rules-tunable per-tick chance. It
//! touches no physics and no scoring - it only appends an event.

use glam::Vec2;
use planar::contains_point;
use rand::Rng;
use tracing::debug;

use crate::object::ObjectTag;
use crate::output::{EventRecord, MatchEvent, OutputEnvelope, OutputKind};
use crate::player::{Player, PlayerId};
use crate::state::{MatchPhase, MatchState};

use super::{Resolver, TickContext};

/// Achievement key for the per-tick lucky draw.
const LUCKY_KEY: &str = "lucky_charm";
/// Achievement key granted to a user who wins the match.
const WINNER_KEY: &str = "match_winner";

/// Resolver for hit detection consequences and match termination.
#[derive(Debug, Clone, Default)]
pub struct ScoringResolver;

impl ScoringResolver {
    /// Creates a scoring resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Decrements lives for every breached zone and re-serves the balls
    /// that caused it.
    fn settle_hits(ctx: &TickContext<'_>, next: &mut MatchState, events: &mut Vec<EventRecord>) {
        let player_ids: Vec<PlayerId> = next.players.keys().copied().collect();
        for pid in player_ids {
            if !next.player(pid).is_some_and(Player::is_alive) {
                continue;
            }
            if !next.has_player_been_hit(pid) {
                continue;
            }

            let Some(player) = next.player_mut(pid) else {
                continue;
            };
            player.lives = player.lives.saturating_sub(1);
            let lives_left = player.lives;
            events.push(EventRecord {
                tick: ctx.tick,
                event: MatchEvent::LifeLost {
                    player: pid,
                    lives_left,
                },
            });

            Self::reserve_balls_in_zone(ctx, next, pid);
        }
    }

    /// Re-serves every ball inside `pid`'s damage strip from the center.
    fn reserve_balls_in_zone(ctx: &TickContext<'_>, next: &mut MatchState, pid: PlayerId) {
        let Some(outline) = next
            .board
            .damage_zone_of(pid)
            .and_then(|o| o.as_damage_zone())
            .map(|z| z.outline.clone())
        else {
            return;
        };

        let center = next.board.center();
        let mut serve_rng = ctx.stream_rng("serve", u64::from(pid.as_u8()));
        for ball_id in next.board.ids_tagged(ObjectTag::Ball) {
            let inside = next
                .board
                .get(ball_id)
                .and_then(|o| o.as_ball())
                .is_some_and(|b| contains_point(&outline, b.center));
            if !inside {
                continue;
            }
            let angle = serve_rng.gen::<f32>() * std::f32::consts::TAU;
            if let Some(ball) = next.board.get_mut(ball_id).and_then(|o| o.as_ball_mut()) {
                ball.center = center;
                ball.velocity = Vec2::from_angle(angle) * ctx.rules.ball_serve_speed;
                ball.last_touch = None;
                ball.paddle_cooldown = 0;
            }
        }
    }

    /// Prunes every object of players who ran out of lives this tick.
    fn settle_eliminations(
        ctx: &TickContext<'_>,
        current: &MatchState,
        next: &mut MatchState,
        events: &mut Vec<EventRecord>,
    ) {
        let player_ids: Vec<PlayerId> = next.players.keys().copied().collect();
        for pid in player_ids {
            let was_alive = current.player(pid).is_some_and(Player::is_alive);
            let is_alive = next.player(pid).is_some_and(Player::is_alive);
            if !was_alive || is_alive {
                continue;
            }

            let removed = next.board.prune_owned_by(pid);
            debug!(player = %pid, objects = removed.len(), "player eliminated");
            events.push(EventRecord {
                tick: ctx.tick,
                event: MatchEvent::PlayerEliminated { player: pid },
            });
        }
    }

    /// Transitions to `MatchOver` once fewer than two players remain.
    ///
    /// A match that *starts* with a single player keeps running (practice
    /// setups); termination requires that somebody was actually eliminated.
    fn settle_match_over(
        ctx: &TickContext<'_>,
        next: &mut MatchState,
        events: &mut Vec<EventRecord>,
    ) {
        if next.is_over() {
            return;
        }
        let alive = next.alive_players();
        if alive.len() > 1 || alive.len() >= next.players.len() {
            return;
        }

        let winner = alive.first().copied();
        next.phase = MatchPhase::MatchOver { winner };
        events.push(EventRecord {
            tick: ctx.tick,
            event: MatchEvent::MatchOver { winner },
        });

        let winner_account = winner
            .and_then(|pid| next.player(pid))
            .and_then(Player::account);
        if let Some(account) = winner_account {
            events.push(EventRecord {
                tick: ctx.tick,
                event: MatchEvent::AchievementUnlocked {
                    account,
                    key: WINNER_KEY.to_string(),
                },
            });
        }
    }

    /// Independent per-tick lucky draw for surviving remote humans.
    fn lucky_draw(ctx: &TickContext<'_>, next: &MatchState, events: &mut Vec<EventRecord>) {
        if next.is_over() {
            return;
        }
        for player in next.players_sorted() {
            if !player.is_alive() {
                continue;
            }
            let Some(account) = player.account() else {
                continue;
            };
            let mut rng = ctx.stream_rng("lucky", u64::from(player.id().as_u8()));
            if rng.gen::<f64>() < ctx.rules.lucky_charm_chance {
                events.push(EventRecord {
                    tick: ctx.tick,
                    event: MatchEvent::AchievementUnlocked {
                        account,
                        key: LUCKY_KEY.to_string(),
                    },
                });
            }
        }
    }
}

impl Resolver for ScoringResolver {
    fn handles(&self) -> &[OutputKind] {
        &[]
    }

    fn resolve(
        &self,
        _outputs: &[&OutputEnvelope],
        ctx: &TickContext<'_>,
        current: &MatchState,
        next: &mut MatchState,
        events: &mut Vec<EventRecord>,
    ) {
        Self::settle_hits(ctx, next, events);
        Self::settle_eliminations(ctx, current, next, events);
        Self::settle_match_over(ctx, next, events);
        Self::lucky_draw(ctx, next, events);
    }
}
