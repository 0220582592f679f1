//! The pluggable dispatcher pipeline (C2-C4): Path, Chained, Index, Default.
//!
//! Each [`DispatchType`] is tried in precedence order by the orchestrator
//! (`super::orchestrator`) until one matches or all are exhausted.

pub mod chained;
pub mod default;
pub mod index;
pub mod lifecycle;
pub mod orchestrator;
pub mod path;

use crate::action::{Action, ActionRegistry};
use crate::context::DispatchResult;

pub use chained::ChainedDispatcher;
pub use default::DefaultDispatcher;
pub use index::IndexDispatcher;
pub use lifecycle::{
    context_to_response, handle_request, mount_dispatch_core, request_to_context, NoopHooks,
    RequestHooks,
};
pub use orchestrator::Dispatcher;
pub use path::PathDispatcher;

/// A polymorphic match strategy (§3 `DispatchType`).
///
/// Implementors build their index once from the frozen [`ActionRegistry`]
/// (`freeze`) and are read-only for the remainder of the process.
pub trait DispatchType<T>: Send + Sync {
    /// Build this dispatcher's index from every registered action. Called
    /// once, after all controllers are registered.
    fn freeze(&mut self, registry: &ActionRegistry<T>);

    /// Attempt to match `segments` (already split on `/`, percent-decoded
    /// later by the orchestrator). Returns `None` on no match.
    fn try_match(&self, registry: &ActionRegistry<T>, segments: &[String]) -> Option<DispatchResult>;

    /// Whether this is a low-precedence dispatcher (Index, Default), tried
    /// only after all high-precedence dispatchers fail.
    fn is_low_precedence(&self) -> bool {
        false
    }

    /// Stable name used to order dispatchers within the same precedence
    /// class (§3: "ordered by stable name").
    fn name(&self) -> &'static str;

    /// Whether this dispatcher's frozen index would ever match `action`.
    /// Used only for the §4.1 step 5 post-freeze diagnostic ("at least one
    /// [DispatchType] must accept it, else a diagnostic is logged") — not on
    /// the request path. Default `false`.
    fn claims(&self, _action: &Action<T>) -> bool {
        false
    }

    /// Reverse a private action name plus its captures/args back into a
    /// root-relative path (no leading `/`, no query string). Returns `None`
    /// if this dispatcher does not own `private_name` or the supplied
    /// captures don't cover every `CaptureArgs`/`Args` slot in the chain.
    ///
    /// Only Path and Chained carry enough structure to be addressable this
    /// way; Index and Default keep the trait default of `None`.
    fn uri_for(
        &self,
        _registry: &ActionRegistry<T>,
        _private_name: &str,
        _captures: &[String],
        _args: &[String],
    ) -> Option<String> {
        None
    }
}

/// The ordered set of dispatchers, sorted once at freeze time: high
/// precedence first, low precedence last, stable by name within a class.
pub struct DispatchTypeSet<T> {
    dispatchers: Vec<Box<dyn DispatchType<T>>>,
}

impl<T> DispatchTypeSet<T> {
    pub fn standard() -> Self {
        Self {
            dispatchers: vec![
                Box::new(PathDispatcher::new()),
                Box::new(ChainedDispatcher::new()),
                Box::new(IndexDispatcher::new()),
                Box::new(DefaultDispatcher::new()),
            ],
        }
    }

    pub fn freeze(&mut self, registry: &ActionRegistry<T>) {
        self.dispatchers
            .sort_by_key(|d| (d.is_low_precedence(), d.name()));
        for dispatcher in self.dispatchers.iter_mut() {
            dispatcher.freeze(registry);
        }

        // §4.1 step 5: "Register the action with every DispatchType; at
        // least one must accept it, else a diagnostic is logged." Public,
        // valid actions unclaimed by every dispatcher are unreachable and
        // would otherwise fail silently.
        for action in registry.iter() {
            if action.is_private() || !action.valid {
                continue;
            }
            if !self.dispatchers.iter().any(|d| d.claims(action)) {
                tracing::warn!(
                    private_name = %action.private_name,
                    "action was not accepted by any DispatchType and is unreachable"
                );
            }
        }
    }

    /// Try every dispatcher in precedence order, returning the first match.
    pub fn try_match(&self, registry: &ActionRegistry<T>, segments: &[String]) -> Option<DispatchResult> {
        self.dispatchers
            .iter()
            .find_map(|d| d.try_match(registry, segments))
    }

    /// Ask every dispatcher in turn to reverse `private_name` into a path;
    /// the first one that owns the action wins.
    pub fn uri_for(
        &self,
        registry: &ActionRegistry<T>,
        private_name: &str,
        captures: &[String],
        args: &[String],
    ) -> Option<String> {
        self.dispatchers
            .iter()
            .find_map(|d| d.uri_for(registry, private_name, captures, args))
    }
}

/// Split a raw request path into non-empty-aware segments.
///
/// Percent-decoding happens per segment (§4.5), independently, after a
/// dispatcher match — this function only splits.
pub fn split_path(path: &str) -> Vec<String> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').map(|s| s.to_string()).collect()
    }
}

pub fn percent_decode_segment(segment: &str) -> String {
    percent_encoding::percent_decode_str(segment)
        .decode_utf8_lossy()
        .into_owned()
}
