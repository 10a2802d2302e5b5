//! Match tuning values.
//!
//! Everything numeric that shapes gameplay lives here, derived once from the
//! match difficulty at construction and never mutated afterwards. Resolvers
//! and plugins receive the table by reference; nothing reaches for global
//! constants.
//!
//! Distances are arena units; speeds are arena units per tick; durations are
//! ticks.

use serde::{Deserialize, Serialize};

/// Tuning table for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    /// Paddle travel per tick at full steering deflection
    pub paddle_speed: f32,
    /// Collision half-thickness of a paddle segment
    pub paddle_half_thickness: f32,
    /// Ball collision radius
    pub ball_radius: f32,
    /// Ball speed on serve and re-serve
    pub ball_serve_speed: f32,
    /// Hard cap on ball speed, no matter how many bounces
    pub ball_max_speed: f32,
    /// Speed multiplier applied on each paddle bounce (capped above)
    pub paddle_bounce_boost: f32,
    /// Maximum deflection angle (radians) at the paddle tip
    pub deflection_gain: f32,
    /// Ticks a ball ignores paddles after bouncing off one
    pub ball_cooldown_ticks: u32,
    /// Whether power-ups spawn at all
    pub powerups: bool,
    /// Ticks between power-up spawn attempts
    pub powerup_spawn_interval: u64,
    /// Ticks an instance stays on the board, claimed or not
    pub powerup_lifetime: u64,
    /// Maximum simultaneous unclaimed instances
    pub powerup_max_active: usize,
    /// Contact radius for claiming a pickup
    pub powerup_pickup_radius: f32,
    /// Duration of a claimed effect
    pub effect_duration: u64,
    /// Ball speed factor contributed by one `BallRush`
    pub ball_rush_factor: f32,
    /// Paddle extension per end from one `PaddleGrow`
    pub paddle_grow: f32,
    /// Independent per-tick chance of the cosmetic lucky achievement,
    /// per surviving human player
    pub lucky_charm_chance: f64,
    /// Steering dead zone around an AI's target, as a travel fraction
    pub ai_dead_zone: f32,
}

impl Rules {
    /// Builds the tuning table for a match at the given difficulty.
    ///
    /// `difficulty` is expected in `1..=10` (validated at configuration
    /// time). Higher difficulty serves a faster ball, raises the speed cap
    /// proportionally, and spawns power-ups more often.
    #[must_use]
    pub fn for_match(difficulty: u8, powerups: bool) -> Self {
        let d = f32::from(difficulty.clamp(1, 10));
        Self {
            paddle_speed: 3.0,
            paddle_half_thickness: 1.0,
            ball_radius: 1.5,
            ball_serve_speed: 0.7 + 0.15 * d,
            ball_max_speed: (0.7 + 0.15 * d) * 2.5,
            paddle_bounce_boost: 1.05,
            deflection_gain: 0.6,
            ball_cooldown_ticks: 4,
            powerups,
            powerup_spawn_interval: 420 - 24 * u64::from(difficulty.clamp(1, 10)),
            powerup_lifetime: 600,
            powerup_max_active: 2,
            powerup_pickup_radius: 3.0,
            effect_duration: 480,
            ball_rush_factor: 1.25,
            paddle_grow: 5.0,
            lucky_charm_chance: 1e-4,
            ai_dead_zone: 0.02,
        }
    }

    /// Reaction-delay window `(min, max)` in ticks for an AI at `level`.
    ///
    /// Both bounds shrink monotonically as the level rises, so a sharper AI
    /// retargets sooner. With a fixed random draw, the sampled interval is
    /// therefore non-increasing in level.
    #[must_use]
    pub fn ai_recalc_window(&self, level: u8) -> (u64, u64) {
        let slack = u64::from(10 - level.clamp(1, 10));
        (12 + 4 * slack, 30 + 9 * slack)
    }

    /// Targeting noise amplitude (travel fraction) for an AI at `level`.
    ///
    /// Monotonically shrinking: a sharper AI tracks the ball more tightly.
    #[must_use]
    pub fn ai_noise_amplitude(&self, level: u8) -> f32 {
        0.02 + 0.028 * f32::from(10 - level.clamp(1, 10))
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::for_match(5, true)
    }
}
