//! Shared fixtures for unit tests: a counter feature and a recording view.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::contract::{Deliver, DeliveryBehavior, Emission, Feature, FnReducer, Reduce, View};
use crate::core::Scope;
use crate::error::ActionError;
use crate::lifecycle::LifecycleStage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterState {
    pub counter: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterAction {
    Increment,
    Decrement,
    Notify(&'static str, DeliveryBehavior),
    Fail,
}

#[derive(Debug, Clone)]
pub enum CounterReducer {
    Add(i64),
    Custom(FnReducer<CounterState>),
}

impl Reduce<CounterState> for CounterReducer {
    fn reduce(&self, state: &CounterState) -> CounterState {
        match self {
            CounterReducer::Add(n) => CounterState {
                counter: state.counter + n,
            },
            CounterReducer::Custom(f) => f.reduce(state),
        }
    }
}

impl From<FnReducer<CounterState>> for CounterReducer {
    fn from(f: FnReducer<CounterState>) -> Self {
        CounterReducer::Custom(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub msg: &'static str,
    pub behavior: DeliveryBehavior,
}

impl Deliver for Notice {
    fn delivery(&self) -> DeliveryBehavior {
        self.behavior
    }
}

#[derive(Debug, thiserror::Error)]
#[error("requested failure")]
pub struct Requested;

/// Counter starting at `initial`; counts how often the initial state is
/// created and remembers every stage and state it was told about.
#[derive(Default)]
pub struct Counter {
    pub initial: i64,
    pub created: Mutex<u32>,
    pub stages: Mutex<Vec<LifecycleStage>>,
    pub states: Mutex<Vec<i64>>,
}

impl Feature for Counter {
    type State = CounterState;
    type Action = CounterAction;
    type Reducer = CounterReducer;
    type Event = Notice;

    fn create_initial_state(&self) -> CounterState {
        *self.created.lock() += 1;
        CounterState {
            counter: self.initial,
        }
    }

    fn on_action(&self, scope: &Scope<Self>, action: CounterAction) -> Result<(), ActionError> {
        match action {
            CounterAction::Increment => scope.emit(Emission::Reducer(CounterReducer::Add(1)))?,
            CounterAction::Decrement => scope.emit(Emission::Reducer(CounterReducer::Add(-1)))?,
            CounterAction::Notify(msg, behavior) => {
                scope.emit(Emission::Event(Notice { msg, behavior }))?
            }
            CounterAction::Fail => return Err(Box::new(Requested)),
        }
        Ok(())
    }

    fn on_lifecycle(&self, _scope: &Scope<Self>, stage: LifecycleStage) {
        self.stages.lock().push(stage);
    }

    fn on_state(&self, _scope: &Scope<Self>, state: &CounterState) {
        self.states.lock().push(state.counter);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seen<S, E> {
    State(S),
    Event(E),
}

/// View that records everything it is shown, in order.
pub struct RecordingView<F: Feature> {
    seen: Mutex<Vec<Seen<F::State, F::Event>>>,
}

impl<F: Feature> RecordingView<F> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn seen(&self) -> Vec<Seen<F::State, F::Event>> {
        self.seen.lock().clone()
    }

    pub fn states(&self) -> Vec<F::State> {
        self.seen
            .lock()
            .iter()
            .filter_map(|s| match s {
                Seen::State(state) => Some(state.clone()),
                Seen::Event(_) => None,
            })
            .collect()
    }

    pub fn events(&self) -> Vec<F::Event> {
        self.seen
            .lock()
            .iter()
            .filter_map(|s| match s {
                Seen::Event(event) => Some(event.clone()),
                Seen::State(_) => None,
            })
            .collect()
    }
}

impl<F: Feature> View<F> for RecordingView<F> {
    fn on_state(&self, state: &F::State) {
        self.seen.lock().push(Seen::State(state.clone()));
    }

    fn on_event(&self, event: &F::Event) {
        self.seen.lock().push(Seen::Event(event.clone()));
    }
}
