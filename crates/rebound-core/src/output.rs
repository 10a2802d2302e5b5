//! Plugin outputs and match events.
//!
//! Plugins never mutate state directly: they emit [`Output`]s - proposals
//! routed to resolvers by [`OutputKind`]. Two categories exist here:
//!
//! - [`Command`]: state-change requests (steering, AI retargeting), applied
//!   by the motion resolver to the *next* tick's player table.
//! - [`MatchEvent`]: fire-and-forget notifications for the collaborator
//!   layer (eliminations, match over, achievements, power-up lifecycle).
//!   Events are also what resolvers append when they discover facts during
//!   resolution; the simulation collects them per tick as [`EventRecord`]s.
//!
//! Every plugin output travels in an [`OutputEnvelope`] carrying its source
//! instance, a deterministic trace ID, the tick, and a sequence number -
//! enough to sort outputs into a canonical order and to attribute any output
//! to the plugin run that produced it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::object::{ObjectId, PowerupKind};
use crate::player::{AccountId, PlayerId};

// =============================================================================
// Plugin Identification
// =============================================================================

/// Unique identifier for a plugin type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginId(String);

impl PluginId {
    /// Creates a `PluginId` from a string.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Returns the plugin ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PluginId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A specific plugin instance: one plugin type bound to one object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginInstanceId {
    object_id: ObjectId,
    plugin_id: PluginId,
}

impl PluginInstanceId {
    /// Creates a plugin instance identifier.
    #[must_use]
    pub fn new(object_id: ObjectId, plugin_id: PluginId) -> Self {
        Self {
            object_id,
            plugin_id,
        }
    }

    /// The object this instance runs on.
    #[must_use]
    pub const fn object_id(&self) -> ObjectId {
        self.object_id
    }

    /// The plugin type of this instance.
    #[must_use]
    pub fn plugin_id(&self) -> &PluginId {
        &self.plugin_id
    }
}

impl fmt::Display for PluginInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.plugin_id, self.object_id)
    }
}

/// Deterministic identifier tying an output back to the plugin run that
/// produced it.
///
/// Derived by hashing (master seed, tick, object, plugin index), so identical
/// simulations produce identical trace IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(u64);

impl TraceId {
    /// Creates a trace ID from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trace:{}", self.0)
    }
}

// =============================================================================
// Output Categories
// =============================================================================

/// State-change requests emitted by plugins.
///
/// Commands target the *next* tick's player table: steering computed from
/// this tick's snapshot never retroactively changes this tick's paddle
/// motion, which keeps the per-tick ordering feedback-free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Set a player's steering direction for the next tick.
    Steer {
        /// Player being steered
        player: PlayerId,
        /// Direction in `[-1, 1]`
        direction: f32,
    },
    /// Update an AI player's brain memory.
    Retarget {
        /// AI player being retargeted
        player: PlayerId,
        /// New target position as a travel fraction in `[0, 1]`
        intended_percent: f32,
        /// Tick at which the next retarget is due
        next_recalc_at: u64,
    },
}

impl Command {
    /// The player this command targets.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        match self {
            Self::Steer { player, .. } | Self::Retarget { player, .. } => *player,
        }
    }
}

/// Discrete things that happened during a tick.
///
/// Fire-and-forget: the engine records them and the collaborator drains
/// them; nothing waits for acknowledgment and nothing is persisted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    /// A ball breached a player's damage zone.
    LifeLost {
        /// Player who was scored against
        player: PlayerId,
        /// Lives remaining after the loss
        lives_left: u32,
    },
    /// A player ran out of lives; their objects were removed.
    PlayerEliminated {
        /// Eliminated player
        player: PlayerId,
    },
    /// At most one player remains; the match is over.
    MatchOver {
        /// Winning player, or `None` for a mutual wipe-out
        winner: Option<PlayerId>,
    },
    /// A cosmetic or milestone achievement fired for a user account.
    AchievementUnlocked {
        /// Account to attribute the achievement to
        account: AccountId,
        /// Achievement key, interpreted by the collaborator layer
        key: String,
    },
    /// A power-up instance appeared.
    PowerupSpawned {
        /// Object ID of the instance
        object: ObjectId,
        /// What it does
        kind: PowerupKind,
    },
    /// A power-up instance was claimed.
    PowerupClaimed {
        /// Object ID of the instance
        object: ObjectId,
        /// What it does
        kind: PowerupKind,
        /// Claiming player, if attributable
        by: Option<PlayerId>,
    },
}

/// Output kind for resolver routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// Command outputs (state change requests)
    Command,
    /// Event outputs (notifications)
    Event,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "Command"),
            Self::Event => write!(f, "Event"),
        }
    }
}

/// A plugin output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// A state-change request
    Command(Command),
    /// A notification
    Event(MatchEvent),
}

impl Output {
    /// Returns the kind of this output for routing.
    #[must_use]
    pub const fn kind(&self) -> OutputKind {
        match self {
            Self::Command(_) => OutputKind::Command,
            Self::Event(_) => OutputKind::Event,
        }
    }

    /// Returns the command if this is a command output.
    #[must_use]
    pub const fn as_command(&self) -> Option<&Command> {
        match self {
            Self::Command(cmd) => Some(cmd),
            Self::Event(_) => None,
        }
    }

    /// Returns the event if this is an event output.
    #[must_use]
    pub const fn as_event(&self) -> Option<&MatchEvent> {
        match self {
            Self::Event(event) => Some(event),
            Self::Command(_) => None,
        }
    }
}

impl From<Command> for Output {
    fn from(cmd: Command) -> Self {
        Self::Command(cmd)
    }
}

impl From<MatchEvent> for Output {
    fn from(event: MatchEvent) -> Self {
        Self::Event(event)
    }
}

// =============================================================================
// Envelope and Event Log
// =============================================================================

/// Wrapper carrying an output with attribution metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEnvelope {
    output: Output,
    source: PluginInstanceId,
    trace_id: TraceId,
    tick: u64,
    sequence: u32,
}

impl OutputEnvelope {
    /// Creates an envelope.
    #[must_use]
    pub fn new(
        output: Output,
        source: PluginInstanceId,
        trace_id: TraceId,
        tick: u64,
        sequence: u32,
    ) -> Self {
        Self {
            output,
            source,
            trace_id,
            tick,
            sequence,
        }
    }

    /// The wrapped output.
    #[must_use]
    pub fn output(&self) -> &Output {
        &self.output
    }

    /// The plugin instance that emitted this output.
    #[must_use]
    pub fn source(&self) -> &PluginInstanceId {
        &self.source
    }

    /// The trace ID of the producing plugin run.
    #[must_use]
    pub const fn trace_id(&self) -> TraceId {
        self.trace_id
    }

    /// The tick the output was emitted on.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Emission order within one plugin run.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }
}

/// A match event stamped with the tick it happened on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Tick the event occurred on
    pub tick: u64,
    /// What happened
    pub event: MatchEvent,
}
