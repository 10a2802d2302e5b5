//! Built-in plugins.
//!
//! One controller ships with the engine: [`AiBrainPlugin`], which steers
//! AI-owned paddles. Human players are steered by the input queue and need
//! no plugin.

mod ai_brain;

pub use ai_brain::AiBrainPlugin;
