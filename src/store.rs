//! # StateStore: the single current state.
//!
//! Holds the canonical current state, applies reducers synchronously and
//! decides whether a new state is pushed to the view now.
//!
//! ## Rules
//! - Exactly one state is current at a time; it is replaced, never mutated.
//! - Every candidate state passes the interceptors; a vetoed state is not recorded.
//! - Outside the started window a new state is only **recorded** (overwriting);
//!   intermediate states are not queued. Entering the started window pushes
//!   the latest recorded state once ([`StateStore::flush_pending_on_start`]).
//! - Every recorded state is published on the conflated state bus.

use std::sync::Arc;

use crate::contract::{Feature, Reduce};
use crate::error::CoreactorError;
use crate::interceptor::{InterceptorChain, ItemKind};
use crate::lifecycle::LifecycleStage;
use crate::observers::{ObserverSet, RecordKind};
use crate::streams::ConflatedBus;

/// A state that became current.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed<S> {
    pub state: S,
    /// True if the state must be pushed to the view right away.
    pub push_now: bool,
}

/// Owner of the current state.
pub struct StateStore<F: Feature> {
    current: Option<F::State>,
    bus: Arc<ConflatedBus<F::State>>,
    chain: Arc<InterceptorChain<F>>,
    observers: Arc<ObserverSet<F>>,
}

impl<F: Feature> StateStore<F> {
    pub fn new(
        bus: Arc<ConflatedBus<F::State>>,
        chain: Arc<InterceptorChain<F>>,
        observers: Arc<ObserverSet<F>>,
    ) -> Self {
        Self {
            current: None,
            bus,
            chain,
            observers,
        }
    }

    /// Current state; fails before the initial state is set.
    pub fn current(&self) -> Result<&F::State, CoreactorError> {
        self.current.as_ref().ok_or(CoreactorError::UninitializedState)
    }

    /// Records the initial state. Pushed only if `stage` is already in the started window.
    pub fn set_initial(&mut self, state: F::State, stage: LifecycleStage) -> Option<Committed<F::State>> {
        self.commit(state, stage)
    }

    /// Applies `reducer` to the current state and records the result.
    ///
    /// Returns `Ok(None)` if an interceptor vetoed the new state.
    pub fn apply_reducer(
        &mut self,
        reducer: &F::Reducer,
        stage: LifecycleStage,
    ) -> Result<Option<Committed<F::State>>, CoreactorError> {
        let old = self.current()?;
        let new = reducer.reduce(old);
        self.observers.emit(|| RecordKind::Reducer {
            old: old.clone(),
            reducer: reducer.clone(),
            new: new.clone(),
        });
        Ok(self.commit(new, stage))
    }

    /// Latest recorded state, to be pushed when the started window is (re-)entered.
    pub fn flush_pending_on_start(&self) -> Option<F::State> {
        self.current.clone()
    }

    fn commit(&mut self, state: F::State, stage: LifecycleStage) -> Option<Committed<F::State>> {
        let Some(state) = self.chain.state(state) else {
            self.observers.emit(|| RecordKind::Dropped(ItemKind::State));
            return None;
        };
        self.observers
            .emit(|| RecordKind::StateReceived(state.clone()));
        self.current = Some(state.clone());
        self.bus.publish(state.clone());
        Some(Committed {
            state,
            push_now: stage.is_in_started_window(),
        })
    }
}

#[cfg(test)]
mod tests {
    use tokio::runtime::Handle;

    use super::*;
    use crate::interceptor::Interceptor;
    use crate::testing::{Counter, CounterReducer, CounterState};

    fn store_with(hooks: Vec<Arc<dyn Interceptor<Counter>>>) -> (StateStore<Counter>, Arc<ConflatedBus<CounterState>>) {
        let bus = Arc::new(ConflatedBus::new());
        let observers = Arc::new(ObserverSet::new(Arc::from("test"), Vec::new(), &Handle::current()));
        let store = StateStore::new(bus.clone(), Arc::new(InterceptorChain::new(hooks)), observers);
        (store, bus)
    }

    fn state(counter: i64) -> CounterState {
        CounterState { counter }
    }

    struct VetoNegative;

    impl Interceptor<Counter> for VetoNegative {
        fn intercept_state(&self, state: CounterState) -> Option<CounterState> {
            (state.counter >= 0).then_some(state)
        }
    }

    #[tokio::test]
    async fn uninitialized_access_fails() {
        let (mut store, _) = store_with(Vec::new());
        assert!(matches!(store.current(), Err(CoreactorError::UninitializedState)));
        let res = store.apply_reducer(&CounterReducer::Add(1), LifecycleStage::Started);
        assert!(matches!(res, Err(CoreactorError::UninitializedState)));
    }

    #[tokio::test]
    async fn initial_state_is_recorded_but_not_pushed_before_start() {
        let (mut store, bus) = store_with(Vec::new());
        let committed = store.set_initial(state(0), LifecycleStage::Attached);
        assert_eq!(committed, Some(Committed { state: state(0), push_now: false }));
        assert_eq!(store.current().ok(), Some(&state(0)));
        assert_eq!(bus.latest(), Some(state(0)));
    }

    #[tokio::test]
    async fn reducers_push_only_in_started_window() {
        let (mut store, _) = store_with(Vec::new());
        store.set_initial(state(0), LifecycleStage::Attached);

        let created = store.apply_reducer(&CounterReducer::Add(1), LifecycleStage::Created);
        assert_eq!(created.ok().flatten().map(|c| c.push_now), Some(false));

        let resumed = store.apply_reducer(&CounterReducer::Add(1), LifecycleStage::Resumed);
        assert_eq!(
            resumed.ok().flatten(),
            Some(Committed { state: state(2), push_now: true })
        );
    }

    #[tokio::test]
    async fn only_latest_state_is_pending() {
        let (mut store, _) = store_with(Vec::new());
        store.set_initial(state(0), LifecycleStage::Attached);
        for _ in 0..3 {
            let _ = store.apply_reducer(&CounterReducer::Add(1), LifecycleStage::Created);
        }
        assert_eq!(store.flush_pending_on_start(), Some(state(3)));
    }

    #[tokio::test]
    async fn vetoed_state_keeps_previous() {
        let (mut store, bus) = store_with(vec![Arc::new(VetoNegative)]);
        store.set_initial(state(0), LifecycleStage::Started);

        let res = store.apply_reducer(&CounterReducer::Add(-5), LifecycleStage::Started);
        assert_eq!(res.ok().flatten(), None);
        assert_eq!(store.current().ok(), Some(&state(0)));
        assert_eq!(bus.latest(), Some(state(0)));
    }
}
