//! # Scope: the feature's handle on its engine.
//!
//! A [`Scope`] is handed to every [`Feature`] hook. It is cheap to clone and
//! `Send`, so it can be moved into scoped tasks, which then emit reducers and
//! events or wait for items the same way the action handler does.
//!
//! ## Wait-until combinators
//! Every `wait_*` method opens its subscription **when called**, not when the
//! returned future is first polled. Items published in between are not missed.
//! The futures never time out on their own; wrap them in
//! `tokio::time::timeout` if needed.
//!
//! | stream     | replays latest | predicate form          | equality form        |
//! |------------|----------------|-------------------------|----------------------|
//! | states     | yes            | `wait_until_state`      | `wait_for_state`     |
//! | lifecycles | yes            | `wait_until_lifecycle`  | `wait_for_lifecycle` |
//! | actions    | no             | `wait_until_action`     | `wait_for_action`    |
//! | reducers   | no             | `wait_until_reducer`    | `wait_for_reducer`   |
//! | events     | no             | `wait_until_event`      | `wait_for_event`     |

use std::future::Future;
use std::sync::Arc;

use crate::contract::{Emission, EmissionOf, Feature, FnReducer};
use crate::error::CoreactorError;
use crate::lifecycle::{LifecycleStage, Window};
use crate::scheduler::JobHandle;
use crate::streams::{Subscription, wait_until};
use crate::tasks::Task;

use super::engine::Engine;

/// Feature-facing handle: emit, launch, read and wait.
pub struct Scope<F: Feature> {
    engine: Arc<Engine<F>>,
}

impl<F: Feature> Clone for Scope<F> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<F: Feature> Scope<F> {
    pub(crate) fn new(engine: Arc<Engine<F>>) -> Self {
        Self { engine }
    }

    /// Engine tag from [`Config::tag`](crate::Config::tag).
    pub fn tag(&self) -> &str {
        &self.engine.tag
    }

    /// Routes a reducer or an event.
    ///
    /// A reducer emitted before the first attach fails with
    /// [`CoreactorError::UninitializedState`].
    pub fn emit(&self, emission: EmissionOf<F>) -> Result<(), CoreactorError> {
        match emission {
            Emission::Reducer(reducer) => self.reduce(reducer),
            Emission::Event(event) => {
                self.emit_event(event);
                Ok(())
            }
        }
    }

    /// Applies `reducer` to the current state.
    pub fn reduce(&self, reducer: F::Reducer) -> Result<(), CoreactorError> {
        self.engine.reduce(reducer)
    }

    /// Emits a closure reducer.
    pub fn emit_reducer<R>(&self, f: R) -> Result<(), CoreactorError>
    where
        F::Reducer: From<FnReducer<F::State>>,
        R: Fn(&F::State) -> F::State + Send + Sync + 'static,
    {
        self.reduce(FnReducer::anonymous(f).into())
    }

    /// Routes `event` through its delivery policy.
    pub fn emit_event(&self, event: F::Event) {
        self.engine.emit_event(event);
    }

    /// Dispatches an action as if the view had sent it.
    pub fn dispatch(&self, action: F::Action) -> Result<(), CoreactorError> {
        self.engine.dispatch(action)
    }

    /// Runs `task` while the lifecycle is inside `window`.
    ///
    /// The task starts now if the lifecycle is already inside `window`,
    /// otherwise on the next entry. It is cancelled when the window is left.
    pub fn launch_when(&self, window: Window, task: impl Task) -> JobHandle {
        self.engine.schedule(Some(window), Box::new(task))
    }

    /// Runs `task` now; it is only cancelled by a finishing detach.
    pub fn launch(&self, task: impl Task) -> JobHandle {
        self.engine.schedule(None, Box::new(task))
    }

    pub fn state(&self) -> Result<F::State, CoreactorError> {
        self.engine.state()
    }

    pub fn lifecycle(&self) -> LifecycleStage {
        self.engine.lifecycle()
    }

    /// New subscription to recorded states; the current one comes first.
    pub fn states(&self) -> Subscription<F::State> {
        self.engine.states.subscribe()
    }

    /// New subscription to stage changes; the current stage comes first.
    pub fn lifecycles(&self) -> Subscription<LifecycleStage> {
        self.engine.lifecycles.subscribe()
    }

    pub fn actions(&self) -> Subscription<F::Action> {
        self.engine.actions.subscribe()
    }

    pub fn reducers(&self) -> Subscription<F::Reducer> {
        self.engine.reducers.subscribe()
    }

    pub fn events(&self) -> Subscription<F::Event> {
        self.engine.events.subscribe()
    }

    pub fn wait_until_state<P>(&self, predicate: P) -> impl Future<Output = Result<F::State, CoreactorError>> + Send + use<F, P>
    where
        P: FnMut(&F::State) -> bool + Send + 'static,
    {
        wait_until(self.states(), predicate)
    }

    pub fn wait_for_state(&self, state: F::State) -> impl Future<Output = Result<F::State, CoreactorError>> + Send + use<F>
    where
        F::State: PartialEq,
    {
        self.wait_until_state(move |s| *s == state)
    }

    pub fn wait_until_lifecycle<P>(
        &self,
        predicate: P,
    ) -> impl Future<Output = Result<LifecycleStage, CoreactorError>> + Send + use<F, P>
    where
        P: FnMut(&LifecycleStage) -> bool + Send + 'static,
    {
        wait_until(self.lifecycles(), predicate)
    }

    pub fn wait_for_lifecycle(
        &self,
        stage: LifecycleStage,
    ) -> impl Future<Output = Result<LifecycleStage, CoreactorError>> + Send + use<F> {
        self.wait_until_lifecycle(move |s| *s == stage)
    }

    pub fn wait_until_action<P>(&self, predicate: P) -> impl Future<Output = Result<F::Action, CoreactorError>> + Send + use<F, P>
    where
        P: FnMut(&F::Action) -> bool + Send + 'static,
    {
        wait_until(self.actions(), predicate)
    }

    pub fn wait_for_action(&self, action: F::Action) -> impl Future<Output = Result<F::Action, CoreactorError>> + Send + use<F>
    where
        F::Action: PartialEq,
    {
        self.wait_until_action(move |a| *a == action)
    }

    pub fn wait_until_reducer<P>(
        &self,
        predicate: P,
    ) -> impl Future<Output = Result<F::Reducer, CoreactorError>> + Send + use<F, P>
    where
        P: FnMut(&F::Reducer) -> bool + Send + 'static,
    {
        wait_until(self.reducers(), predicate)
    }

    pub fn wait_for_reducer(
        &self,
        reducer: F::Reducer,
    ) -> impl Future<Output = Result<F::Reducer, CoreactorError>> + Send + use<F>
    where
        F::Reducer: PartialEq,
    {
        self.wait_until_reducer(move |r| *r == reducer)
    }

    pub fn wait_until_event<P>(&self, predicate: P) -> impl Future<Output = Result<F::Event, CoreactorError>> + Send + use<F, P>
    where
        P: FnMut(&F::Event) -> bool + Send + 'static,
    {
        wait_until(self.events(), predicate)
    }

    pub fn wait_for_event(&self, event: F::Event) -> impl Future<Output = Result<F::Event, CoreactorError>> + Send + use<F>
    where
        F::Event: PartialEq,
    {
        self.wait_until_event(move |e| *e == event)
    }
}
