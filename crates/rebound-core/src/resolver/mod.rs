//! Resolvers: the write phase of a tick.
//!
//! Resolvers turn the frozen snapshot plus the tick's plugin outputs into
//! the next state. They run in a fixed order that *is* the per-tick
//! contract:
//!
//! 1. [`MotionResolver`] - paddle motion from the directions sampled at tick
//!    start, steering/retarget commands applied for the next tick, ball
//!    advance and collision, damage-zone flagging.
//! 2. [`ScoringResolver`] - hit evaluation, life loss, ball re-serve,
//!    elimination pruning, match-over transition, lucky achievement draw.
//! 3. [`PowerupResolver`] - expiry, claims, effect bookkeeping, spawning.
//!
//! Because the order is fixed, a later resolver may read what an earlier
//! one wrote to `next` (scoring reads the zone flags motion set). Each
//! resolver must still be deterministic given the same inputs and order.
//!
//! Facts discovered during resolution (a life lost, a match ending) are
//! appended to the tick's event sink; the simulation exposes them to the
//! collaborator layer after the tick.

mod motion;
mod powerup;
mod scoring;

pub use motion::MotionResolver;
pub use powerup::PowerupResolver;
pub use scoring::ScoringResolver;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::output::{EventRecord, OutputEnvelope, OutputKind};
use crate::rules::Rules;
use crate::state::MatchState;

/// Per-tick context shared by all resolvers.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    /// The tick being resolved
    pub tick: u64,
    /// Master seed of the match
    pub master_seed: u64,
    /// Match tuning table
    pub rules: &'a Rules,
}

impl TickContext<'_> {
    /// Derives a deterministic RNG stream for one subsystem on this tick.
    ///
    /// The stream seed hashes (master seed, tick, label, salt), so distinct
    /// subsystems and distinct salts (usually a player or object ID) draw
    /// from independent, replayable streams.
    #[must_use]
    pub fn stream_rng(&self, label: &str, salt: u64) -> ChaCha8Rng {
        let mut hasher = DefaultHasher::new();
        self.master_seed.hash(&mut hasher);
        self.tick.hash(&mut hasher);
        label.hash(&mut hasher);
        salt.hash(&mut hasher);
        ChaCha8Rng::seed_from_u64(hasher.finish())
    }
}

/// A resolver processes outputs and mutates the next state.
pub trait Resolver: Send + Sync {
    /// The output kinds routed to this resolver.
    ///
    /// Resolvers driven purely by state (scoring, power-ups) return an
    /// empty slice and receive no outputs.
    fn handles(&self) -> &[OutputKind];

    /// Resolves one tick's worth of changes.
    ///
    /// # Arguments
    ///
    /// * `outputs` - plugin outputs routed by [`Resolver::handles`]
    /// * `ctx` - tick number, master seed, rules
    /// * `current` - the frozen snapshot the tick started from
    /// * `next` - the state being built; earlier resolvers' writes are
    ///   visible here
    /// * `events` - the tick's event sink
    fn resolve(
        &self,
        outputs: &[&OutputEnvelope],
        ctx: &TickContext<'_>,
        current: &MatchState,
        next: &mut MatchState,
        events: &mut Vec<EventRecord>,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn resolver_is_object_safe() {
        fn _accepts_boxed(_resolver: Box<dyn Resolver>) {}
        fn _accepts_slice(_resolvers: &[Box<dyn Resolver>]) {}
    }

    #[test]
    fn stream_rng_is_deterministic() {
        let rules = Rules::default();
        let ctx = TickContext {
            tick: 7,
            master_seed: 42,
            rules: &rules,
        };
        let a: f64 = ctx.stream_rng("serve", 1).gen();
        let b: f64 = ctx.stream_rng("serve", 1).gen();
        assert!((a - b).abs() < f64::EPSILON);
    }

    #[test]
    fn stream_rng_varies_by_label_salt_and_tick() {
        let rules = Rules::default();
        let ctx = TickContext {
            tick: 7,
            master_seed: 42,
            rules: &rules,
        };
        let base: f64 = ctx.stream_rng("serve", 1).gen();
        let other_label: f64 = ctx.stream_rng("lucky", 1).gen();
        let other_salt: f64 = ctx.stream_rng("serve", 2).gen();
        let other_tick: f64 = TickContext {
            tick: 8,
            master_seed: 42,
            rules: &rules,
        }
        .stream_rng("serve", 1)
        .gen();

        assert!((base - other_label).abs() > f64::EPSILON);
        assert!((base - other_salt).abs() > f64::EPSILON);
        assert!((base - other_tick).abs() > f64::EPSILON);
    }
}
