//! # Rebound Core
//!
//! Deterministic match simulation engine for the Rebound paddle arena.
//!
//! This crate is the hard core of the game: a tick-driven 2D physics and AI
//! loop advancing paddle positions, ball trajectories, collisions, player
//! elimination, and power-up lifecycle for any mix of human, remote, and
//! AI-controlled players sharing one arena. It knows nothing about HTTP,
//! sessions, persistence, or rendering - collaborators create a match from a
//! validated configuration, feed steering input through a queue, read the
//! state snapshot after each tick, and drain the discrete events the engine
//! emits.
//!
//! ## Architecture
//!
//! Each tick runs four phases over double-buffered state:
//!
//! - **INPUT**: the steering queue is drained into the player table
//! - **PLUGIN**: controllers (the AI brain) read a frozen snapshot and
//!   propose commands
//! - **RESOLUTION**: the motion, scoring, and power-up resolvers build the
//!   next state in a fixed order
//! - **APPLY**: buffers swap and the tick advances
//!
//! Given one configuration, seed, and input script, the whole run is
//! reproducible tick for tick.
//!
//! ## Usage
//!
//! ```
//! use rebound_core::config::{MatchConfig, PlayerSpec};
//! use rebound_core::player::{AccountId, PlayerId};
//! use rebound_core::simulation::Simulation;
//!
//! let config = MatchConfig {
//!     players: vec![
//!         PlayerSpec::User { account: AccountId::new(1) },
//!         PlayerSpec::Ai { level: Some(7) },
//!     ],
//!     difficulty: 5,
//!     powerups: true,
//!     map: "classic".to_string(),
//!     player_lives: 3,
//! };
//!
//! let mut sim = Simulation::from_config(&config, 42).unwrap();
//! let input = sim.input_handle();
//!
//! input.steer(PlayerId::new(0), 1.0);
//! sim.step();
//!
//! assert_eq!(sim.tick(), 1);
//! for record in sim.take_events() {
//!     // relay to the broadcast/achievement layer
//!     let _ = record;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod board;
pub mod config;
pub mod input;
pub mod object;
pub mod output;
pub mod player;
pub mod plugin;
pub mod plugins;
pub mod resolver;
pub mod rules;
pub mod simulation;
pub mod state;
pub mod world_view;

// Re-exports for the common entry points
pub use config::{MatchConfig, MatchConfigError, PlayerSpec};
pub use input::InputHandle;
pub use output::{EventRecord, MatchEvent};
pub use player::{AccountId, PlayerId};
pub use rules::Rules;
pub use simulation::Simulation;
pub use state::{MatchPhase, MatchState};

#[cfg(test)]
mod tests;
