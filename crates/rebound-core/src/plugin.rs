//! Plugin layer: per-object controllers that propose, never mutate.
//!
//! A plugin runs once per matching object per tick against a frozen
//! [`WorldView`](crate::world_view::WorldView) and returns [`Output`]s. The
//! built-in AI controller is a plugin; the trait is the seam for any other
//! controller a collaborator wants to attach without touching the resolvers.
//!
//! # Determinism
//!
//! Plugins must be pure functions of `(context, view)`. The only sanctioned
//! randomness is a generator seeded from the context's trace ID, which the
//! simulation derives from the master seed - same seed, same outputs.

use std::collections::HashMap;
use std::sync::Arc;

use crate::object::{ObjectId, ObjectTag};
use crate::output::{Output, OutputKind, PluginId, TraceId};
use crate::world_view::WorldView;

/// Declaration of a plugin's identity and capabilities.
#[derive(Debug, Clone)]
pub struct PluginDeclaration {
    /// Unique identifier for this plugin type.
    pub id: PluginId,
    /// Object tags this plugin runs on.
    pub required_tags: Vec<ObjectTag>,
    /// Output kinds this plugin may emit; used for resolver routing checks.
    pub emits: Vec<OutputKind>,
}

impl PluginDeclaration {
    /// Checks whether this plugin runs on objects with `tag`.
    #[must_use]
    pub fn supports_tag(&self, tag: ObjectTag) -> bool {
        self.required_tags.contains(&tag)
    }

    /// Checks whether this plugin may emit `kind`.
    #[must_use]
    pub fn emits_output(&self, kind: OutputKind) -> bool {
        self.emits.contains(&kind)
    }
}

/// Context handed to a plugin for one run.
#[derive(Debug, Clone, Copy)]
pub struct PluginContext {
    /// The object this plugin instance operates on.
    pub object_id: ObjectId,
    /// The current simulation tick.
    pub tick: u64,
    /// Deterministic trace ID for this run; doubles as the RNG seed.
    pub trace_id: TraceId,
}

/// A controller that reads the frozen world and proposes outputs.
///
/// Implementations must be `Send + Sync` and side-effect free: all effects
/// go through the returned outputs.
pub trait Plugin: Send + Sync {
    /// Returns the plugin's declaration.
    fn declaration(&self) -> &PluginDeclaration;

    /// Executes the plugin for one object on one tick.
    fn run(&self, ctx: &PluginContext, view: &WorldView<'_>) -> Vec<Output>;
}

/// Registry of plugins bundled by object tag.
#[derive(Default)]
pub struct PluginRegistry {
    bundles: HashMap<ObjectTag, Vec<Arc<dyn Plugin>>>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bundles: HashMap::new(),
        }
    }

    /// Registers a plugin to run on objects with `tag`.
    ///
    /// Plugins registered for the same tag run in registration order.
    pub fn register(&mut self, tag: ObjectTag, plugin: Arc<dyn Plugin>) {
        self.bundles.entry(tag).or_default().push(plugin);
    }

    /// Returns the plugins registered for `tag`.
    #[must_use]
    pub fn plugins_for(&self, tag: ObjectTag) -> &[Arc<dyn Plugin>] {
        self.bundles.get(&tag).map_or(&[], Vec::as_slice)
    }

    /// Total number of registered plugins across all tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bundles.values().map(Vec::len).sum()
    }

    /// Returns true if no plugins are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&str> = self
            .bundles
            .values()
            .flatten()
            .map(|p| p.declaration().id.as_str())
            .collect();
        ids.sort_unstable();
        f.debug_struct("PluginRegistry").field("plugins", &ids).finish()
    }
}
