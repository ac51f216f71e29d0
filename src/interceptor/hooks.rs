//! # Core interceptor trait.

use std::fmt;

use crate::contract::Feature;
use crate::lifecycle::LifecycleStage;

/// Kind of item flowing through an interceptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    State,
    Action,
    Reducer,
    Event,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::State => "state",
            ItemKind::Action => "action",
            ItemKind::Reducer => "reducer",
            ItemKind::Event => "event",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hook set invoked on every item before it is processed.
///
/// Every method has a pass-through default, so implementors override only
/// what they need. Hooks run on the owner context and must not call back
/// into the engine.
///
/// # Example
/// ```rust
/// use coreactor::{Feature, Interceptor};
///
/// /// Vetoes every event.
/// struct Mute;
///
/// impl<F: Feature> Interceptor<F> for Mute {
///     fn intercept_event(&self, _event: F::Event) -> Option<F::Event> {
///         None
///     }
/// }
/// ```
pub trait Interceptor<F: Feature>: Send + Sync + 'static {
    fn intercept_state(&self, state: F::State) -> Option<F::State> {
        Some(state)
    }

    fn intercept_action(&self, action: F::Action) -> Option<F::Action> {
        Some(action)
    }

    fn intercept_reducer(&self, reducer: F::Reducer) -> Option<F::Reducer> {
        Some(reducer)
    }

    fn intercept_event(&self, event: F::Event) -> Option<F::Event> {
        Some(event)
    }

    /// Observes stage changes; cannot veto them.
    fn on_lifecycle_changed(&self, _stage: LifecycleStage) {}

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Interceptor that passes every item through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl<F: Feature> Interceptor<F> for Passthrough {
    fn name(&self) -> &'static str {
        "passthrough"
    }
}
