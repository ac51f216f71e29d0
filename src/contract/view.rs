//! # View: the transient observer.

use std::sync::Arc;

use super::Feature;

/// Renders states and reacts to one-off events.
///
/// Both methods are invoked synchronously on the owner context. A view may
/// call back into the engine (for example dispatch an action) from either.
pub trait View<F: Feature>: Send + Sync + 'static {
    fn on_state(&self, state: &F::State);

    fn on_event(&self, event: &F::Event);
}

/// Shared handle to a view.
pub type ViewRef<F> = Arc<dyn View<F>>;
