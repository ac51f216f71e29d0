//! # Feature logic plugged into a [`Coreactor`](crate::Coreactor).
//!
//! A feature owns the screen-specific behavior: it creates the initial state
//! and turns actions into reducers and events through the [`Scope`] it is
//! handed. Long-running work is started with `Scope::launch_when`, which ties
//! it to a lifecycle window.
//!
//! ## Example
//! ```rust
//! use coreactor::{ActionError, Deliver, Emission, Feature, Reduce, Scope};
//!
//! struct Counter;
//!
//! #[derive(Debug, Clone)]
//! enum CounterAction { Increment, Decrement }
//!
//! #[derive(Debug, Clone)]
//! enum CounterReducer { Add(i64) }
//!
//! impl Reduce<i64> for CounterReducer {
//!     fn reduce(&self, state: &i64) -> i64 {
//!         match self { CounterReducer::Add(n) => state + n }
//!     }
//! }
//!
//! #[derive(Debug, Clone)]
//! struct Toast(String);
//! impl Deliver for Toast {}
//!
//! impl Feature for Counter {
//!     type State = i64;
//!     type Action = CounterAction;
//!     type Reducer = CounterReducer;
//!     type Event = Toast;
//!
//!     fn create_initial_state(&self) -> i64 { 0 }
//!
//!     fn on_action(&self, scope: &Scope<Self>, action: CounterAction) -> Result<(), ActionError> {
//!         let step = match action {
//!             CounterAction::Increment => 1,
//!             CounterAction::Decrement => -1,
//!         };
//!         scope.emit(Emission::Reducer(CounterReducer::Add(step)))?;
//!         Ok(())
//!     }
//! }
//! ```

use std::fmt::Debug;

use crate::core::Scope;
use crate::error::ActionError;
use crate::lifecycle::LifecycleStage;

use super::{Deliver, Reduce};

/// Screen-specific logic driven by the engine.
///
/// All hooks run on the owner context; they must not block for long. Any
/// async work belongs in a task started through the [`Scope`].
pub trait Feature: Send + Sync + Sized + 'static {
    /// Immutable rendering-relevant data; replaced, never mutated in place.
    type State: Clone + Debug + Send + Sync + 'static;
    /// Intent sent by the view.
    type Action: Clone + Debug + Send + Sync + 'static;
    /// Pure transition over [`Feature::State`].
    type Reducer: Reduce<Self::State> + Clone + Debug;
    /// One-off notification carrying its delivery policy.
    type Event: Deliver + Clone + Debug + Send + Sync + 'static;

    /// Called exactly once, on the first attach.
    fn create_initial_state(&self) -> Self::State;

    /// Handles one action. An error is returned to the `dispatch` caller.
    fn on_action(&self, scope: &Scope<Self>, action: Self::Action) -> Result<(), ActionError>;

    /// Observes every lifecycle stage change.
    fn on_lifecycle(&self, _scope: &Scope<Self>, _stage: LifecycleStage) {}

    /// Observes every newly recorded current state (whether or not it reaches the view).
    fn on_state(&self, _scope: &Scope<Self>, _state: &Self::State) {}
}

/// A reducer or an event, as produced by feature logic.
#[derive(Debug, Clone)]
pub enum Emission<R, E> {
    Reducer(R),
    Event(E),
}

/// [`Emission`] specialised for a feature.
pub type EmissionOf<F> = Emission<<F as Feature>::Reducer, <F as Feature>::Event>;
