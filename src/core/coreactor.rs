//! # Coreactor: the host-facing handle.
//!
//! The host (whatever owns the view and the lifecycle source) talks to the
//! engine through [`Coreactor`]:
//!
//! ```text
//! host container ── attach(view) / detach(is_finishing) ──┐
//! lifecycle src  ── on_host_stage_changed(stage) ─────────┼──► Coreactor ──► Feature
//! view           ── dispatch(action) ─────────────────────┘        │
//!                                                                   └──► View::on_state / on_event
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use coreactor::{ActionError, Coreactor, Deliver, Emission, Feature, HostEvent, Reduce, Scope, View};
//!
//! struct Counter;
//!
//! #[derive(Debug, Clone)]
//! struct Add(i64);
//! impl Reduce<i64> for Add {
//!     fn reduce(&self, state: &i64) -> i64 { state + self.0 }
//! }
//!
//! #[derive(Debug, Clone)]
//! struct Never;
//! impl Deliver for Never {}
//!
//! impl Feature for Counter {
//!     type State = i64;
//!     type Action = i64;
//!     type Reducer = Add;
//!     type Event = Never;
//!
//!     fn create_initial_state(&self) -> i64 { 0 }
//!
//!     fn on_action(&self, scope: &Scope<Self>, step: i64) -> Result<(), ActionError> {
//!         scope.emit(Emission::Reducer(Add(step)))?;
//!         Ok(())
//!     }
//! }
//!
//! struct Print;
//! impl View<Counter> for Print {
//!     fn on_state(&self, state: &i64) { println!("counter = {state}"); }
//!     fn on_event(&self, _event: &Never) {}
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), coreactor::CoreactorError> {
//! let engine = Coreactor::builder(Counter).build()?;
//! engine.attach(Arc::new(Print))?;
//! engine.on_host_stage_changed(HostEvent::Create);
//! engine.on_host_stage_changed(HostEvent::Start);
//! engine.dispatch(5)?;
//! assert_eq!(engine.state()?, 5);
//! engine.detach(true);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::contract::{Feature, ViewRef};
use crate::error::CoreactorError;
use crate::lifecycle::LifecycleStage;

use super::{CoreactorBuilder, Scope, engine::Engine};

/// Single-writer runtime binding one feature to a lifecycle and a view.
///
/// Cloning yields another handle to the same engine.
pub struct Coreactor<F: Feature> {
    engine: Arc<Engine<F>>,
}

impl<F: Feature> Clone for Coreactor<F> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<F: Feature> Coreactor<F> {
    /// Starts building an engine for `feature`.
    pub fn builder(feature: F) -> CoreactorBuilder<F> {
        CoreactorBuilder::new(feature)
    }

    /// Engine with default config, no interceptors and no observers.
    pub fn new(feature: F) -> Result<Self, CoreactorError> {
        Self::builder(feature).build()
    }

    pub(crate) fn from_engine(engine: Arc<Engine<F>>) -> Self {
        Self { engine }
    }

    /// Binds `view`.
    ///
    /// The first attach creates the initial state and moves to `Attached`.
    /// A later attach (after a non-finishing detach) reuses the existing state
    /// and, if the host is already started, pushes it to the new view.
    ///
    /// # Errors
    /// - [`CoreactorError::DoubleAttach`] if a view is still bound;
    /// - [`CoreactorError::AlreadyDetached`] after a finishing detach.
    pub fn attach(&self, view: ViewRef<F>) -> Result<(), CoreactorError> {
        self.engine.attach(view)
    }

    /// Unbinds the view.
    ///
    /// With `is_finishing` the engine moves to `Destroyed` and then
    /// `Detached`, cancelling every scoped task and discarding those that
    /// never started. Without it only the view reference is dropped.
    pub fn detach(&self, is_finishing: bool) {
        self.engine.detach(is_finishing);
    }

    /// Routes `action` to the feature.
    ///
    /// # Errors
    /// - [`CoreactorError::NotAttached`] before the first attach;
    /// - [`CoreactorError::AlreadyDetached`] after a finishing detach;
    /// - [`CoreactorError::ActionFailed`] if the feature's handler fails.
    pub fn dispatch(&self, action: F::Action) -> Result<(), CoreactorError> {
        self.engine.dispatch(action)
    }

    /// Feeds one host stage change (`Created` through `Destroyed`).
    ///
    /// Accepts a [`LifecycleStage`] or a [`HostEvent`](crate::HostEvent).
    /// Repeated stages are ignored, as are changes before the first attach
    /// or after a finishing detach.
    pub fn on_host_stage_changed(&self, stage: impl Into<LifecycleStage>) {
        self.engine.on_host_stage_changed(stage.into());
    }

    /// Current state; [`CoreactorError::UninitializedState`] before the first attach.
    pub fn state(&self) -> Result<F::State, CoreactorError> {
        self.engine.state()
    }

    pub fn lifecycle(&self) -> LifecycleStage {
        self.engine.lifecycle()
    }

    pub fn is_attached(&self) -> bool {
        self.engine.is_attached()
    }

    /// Feature-facing handle, for hosts that drive streams or tasks directly.
    pub fn scope(&self) -> Scope<F> {
        Scope::new(Arc::clone(&self.engine))
    }

    pub fn feature(&self) -> &F {
        &self.engine.feature
    }

    pub fn tag(&self) -> &str {
        &self.engine.tag
    }
}
