//! The tick engine.
//!
//! [`Simulation`] owns one match: double-buffered [`MatchState`], the plugin
//! registry, the ordered resolver list, the master seed, and the input
//! queue. An external scheduler calls [`Simulation::step`] once per tick;
//! the engine never blocks, never suspends mid-tick, and never panics on
//! malformed per-tick state.
//!
//! # Execution phases
//!
//! 1. **INPUT**: drain the steering queue into the current player table.
//!    This is the only externally-written state and it is sampled exactly
//!    once, here.
//! 2. **PLUGIN**: run every registered plugin over the frozen current state
//!    in object-ID order, collecting enveloped outputs; plugin-emitted
//!    events go straight to the event log.
//! 3. **RESOLUTION**: clone current into next and run the resolvers in
//!    order - motion, scoring, power-ups - each appending to the tick's
//!    event log.
//! 4. **APPLY**: swap the buffers and advance the tick counter.
//!
//! Once the phase is `MatchOver`, `step` returns immediately; the scheduler
//! can simply stop calling.
//!
//! # Determinism
//!
//! Tick N is a pure function of tick N-1 plus the inputs drained at tick
//! N's start. All randomness flows from the master seed through hashed
//! per-(tick, subsystem, entity) stream seeds, and plugin outputs are
//! sorted into a canonical order before resolution. Two simulations built
//! from the same configuration, seed, and input script produce identical
//! states, tick for tick.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use tracing::{debug, warn};

use crate::config::{self, MatchConfig, MatchConfigError};
use crate::input::{InputHandle, InputQueue};
use crate::object::ObjectTag;
use crate::output::{EventRecord, OutputEnvelope, PluginInstanceId, TraceId};
use crate::plugin::{PluginContext, PluginRegistry};
use crate::plugins::AiBrainPlugin;
use crate::resolver::{MotionResolver, PowerupResolver, Resolver, ScoringResolver, TickContext};
use crate::rules::Rules;
use crate::state::{MatchPhase, MatchState};
use crate::world_view::WorldView;

/// The match tick engine.
pub struct Simulation {
    /// Current state (read-only during the plugin phase).
    current: MatchState,
    /// Next state (written by resolvers).
    next: MatchState,
    /// Registry of plugins organized by object tag.
    plugins: PluginRegistry,
    /// Resolvers in execution order.
    resolvers: Vec<Box<dyn Resolver>>,
    /// Tuning table derived from the configuration.
    rules: Rules,
    /// Master seed for all derived randomness.
    master_seed: u64,
    /// Cross-thread steering queue, drained once per tick.
    inputs: InputQueue,
    /// Events accumulated since the last drain.
    events: Vec<EventRecord>,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.current.board.current_tick())
            .field("phase", &self.current.phase)
            .field("players", &self.current.players.len())
            .field("objects", &self.current.board.object_count())
            .field("resolvers", &format!("[{} resolvers]", self.resolvers.len()))
            .field("master_seed", &self.master_seed)
            .finish()
    }
}

impl Simulation {
    /// Creates a simulation from a validated configuration and master seed.
    ///
    /// Builds the initial board, serves the opening ball with a
    /// seed-derived direction, and installs the default plugin (AI brain)
    /// and resolvers (motion, scoring, power-ups).
    ///
    /// # Errors
    ///
    /// Returns a [`MatchConfigError`] if the configuration is invalid; no
    /// partially-built simulation escapes.
    pub fn from_config(config: &MatchConfig, seed: u64) -> Result<Self, MatchConfigError> {
        let rules = Rules::for_match(config.difficulty, config.powerups);
        let mut state = config::build_state(config, &rules)?;

        // Opening serve, deterministic in the seed.
        let serve_ctx = TickContext {
            tick: 0,
            master_seed: seed,
            rules: &rules,
        };
        let angle = serve_ctx.stream_rng("opening_serve", 0).gen::<f32>() * std::f32::consts::TAU;
        for ball_id in state.board.ids_tagged(ObjectTag::Ball) {
            if let Some(ball) = state.board.get_mut(ball_id).and_then(|o| o.as_ball_mut()) {
                ball.velocity = Vec2::from_angle(angle) * rules.ball_serve_speed;
            }
        }

        let mut plugins = PluginRegistry::new();
        plugins.register(ObjectTag::Paddle, Arc::new(AiBrainPlugin::new()));

        Ok(Self {
            next: state.clone(),
            current: state,
            plugins,
            resolvers: vec![
                Box::new(MotionResolver::new()),
                Box::new(ScoringResolver::new()),
                Box::new(PowerupResolver::new()),
            ],
            rules,
            master_seed: seed,
            inputs: InputQueue::new(),
            events: Vec::new(),
        })
    }

    /// Executes one tick. No-op once the match is over.
    pub fn step(&mut self) {
        if self.current.is_over() {
            return;
        }
        let tick = self.current.board.current_tick();

        // PHASE 1: INPUT
        self.drain_inputs();

        // PHASE 2: PLUGIN
        let outputs = self.run_plugins(tick);
        for envelope in &outputs {
            if let Some(event) = envelope.output().as_event() {
                self.events.push(EventRecord {
                    tick,
                    event: event.clone(),
                });
            }
        }

        // PHASE 3: RESOLUTION
        self.next.clone_from(&self.current);
        let ctx = TickContext {
            tick,
            master_seed: self.master_seed,
            rules: &self.rules,
        };
        for resolver in &self.resolvers {
            let relevant: Vec<&OutputEnvelope> = outputs
                .iter()
                .filter(|o| resolver.handles().contains(&o.output().kind()))
                .collect();
            resolver.resolve(&relevant, &ctx, &self.current, &mut self.next, &mut self.events);
        }

        // PHASE 4: APPLY
        std::mem::swap(&mut self.current, &mut self.next);
        self.current.board.advance_tick();
    }

    /// Applies queued steering to the current player table.
    ///
    /// Out-of-range values are clamped, non-finite values dropped, AI
    /// players are never externally steered, and unknown players are
    /// logged - none of it halts the tick.
    fn drain_inputs(&mut self) {
        for input in self.inputs.drain() {
            let Some(player) = self.current.player_mut(input.player) else {
                warn!(player = %input.player, "steering input for unknown player dropped");
                continue;
            };
            if player.is_ai() {
                debug!(player = %input.player, "steering input for AI player dropped");
                continue;
            }
            if !player.is_alive() {
                debug!(player = %input.player, "steering input for eliminated player dropped");
                continue;
            }
            if !input.direction.is_finite() {
                warn!(player = %input.player, "non-finite steering input dropped");
                continue;
            }
            if input.direction.abs() > 1.0 {
                debug!(
                    player = %input.player,
                    direction = input.direction,
                    "steering input clamped"
                );
            }
            player.direction = input.direction.clamp(-1.0, 1.0);
        }
    }

    /// Runs all plugins over the frozen snapshot in object-ID order.
    ///
    /// Outputs are sorted by (object, plugin, sequence) into a canonical
    /// order before resolution.
    fn run_plugins(&self, tick: u64) -> Vec<OutputEnvelope> {
        let view = WorldView::new(&self.current, &self.rules, tick);
        let mut outputs = Vec::new();

        for object in self.current.board.objects_sorted() {
            for (idx, plugin) in self.plugins.plugins_for(object.tag()).iter().enumerate() {
                let trace_id = self.generate_trace_id(tick, object.id().as_u64(), idx as u64);
                let ctx = PluginContext {
                    object_id: object.id(),
                    tick,
                    trace_id,
                };
                for (seq, output) in plugin.run(&ctx, &view).into_iter().enumerate() {
                    #[allow(clippy::cast_possible_truncation)]
                    outputs.push(OutputEnvelope::new(
                        output,
                        PluginInstanceId::new(object.id(), plugin.declaration().id.clone()),
                        trace_id,
                        tick,
                        seq as u32,
                    ));
                }
            }
        }

        outputs.sort_by(|a, b| {
            a.source()
                .object_id()
                .cmp(&b.source().object_id())
                .then_with(|| {
                    a.source()
                        .plugin_id()
                        .as_str()
                        .cmp(b.source().plugin_id().as_str())
                })
                .then_with(|| a.sequence().cmp(&b.sequence()))
        });
        outputs
    }

    /// Derives a deterministic trace ID for one plugin run.
    fn generate_trace_id(&self, tick: u64, object: u64, plugin: u64) -> TraceId {
        let mut hasher = DefaultHasher::new();
        self.master_seed.hash(&mut hasher);
        tick.hash(&mut hasher);
        object.hash(&mut hasher);
        plugin.hash(&mut hasher);
        TraceId::new(hasher.finish())
    }

    /// The current state, for snapshotting/broadcast after a tick.
    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.current
    }

    /// An owned snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> MatchState {
        self.current.clone()
    }

    /// Mutable access to the current state.
    ///
    /// Intended for scenario setup (placing balls, adjusting lives) before
    /// stepping. Avoid mutating mid-match from outside the tick loop - that
    /// is what the input queue and plugins are for.
    #[must_use]
    pub fn state_mut(&mut self) -> &mut MatchState {
        &mut self.current
    }

    /// The current match phase.
    #[must_use]
    pub const fn phase(&self) -> MatchPhase {
        self.current.phase
    }

    /// The current tick.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.current.board.current_tick()
    }

    /// The master seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.master_seed
    }

    /// The tuning table in effect.
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// A handle the transport layer steers players through.
    #[must_use]
    pub fn input_handle(&self) -> InputHandle {
        self.inputs.handle()
    }

    /// Drains every event recorded since the last call.
    ///
    /// Fire-and-forget: the engine keeps no copy and never waits on the
    /// consumer.
    #[must_use]
    pub fn take_events(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.events)
    }

    /// Mutable access to the plugin registry, for attaching custom
    /// controllers before the match starts.
    #[must_use]
    pub fn plugins_mut(&mut self) -> &mut PluginRegistry {
        &mut self.plugins
    }

    /// Appends a custom resolver after the built-in ones.
    pub fn add_resolver(&mut self, resolver: Box<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    /// Number of installed resolvers.
    #[must_use]
    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }
}
