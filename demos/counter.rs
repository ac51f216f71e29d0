//! # Counter Example
//!
//! Drives a counter feature through a simulated host lifecycle.
//!
//! Shows:
//! - state pushed to the view only inside the started window;
//! - a toast emitted before `Start` waiting for it, a hint emitted while
//!   stopped being discarded;
//! - a ticker task tied to the resumed window, cancelled on `Pause`;
//! - records rendered through the built-in `LogWriter` observer.
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example counter
//! ```

use std::{sync::Arc, time::Duration};

use coreactor::{
    ActionError, Config, Coreactor, Deliver, DeliveryBehavior, Emission, Feature, HostEvent, LogWriter, Observe,
    Reduce, Scope, TaskError, TaskFn, View, Window,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq)]
struct CounterState {
    value: i64,
}

#[derive(Debug, Clone)]
enum CounterAction {
    Increment,
    Decrement,
    StartTicker,
    Hint(&'static str),
}

#[derive(Debug, Clone)]
enum CounterReducer {
    Add(i64),
}

impl Reduce<CounterState> for CounterReducer {
    fn reduce(&self, state: &CounterState) -> CounterState {
        match self {
            CounterReducer::Add(n) => CounterState { value: state.value + n },
        }
    }
}

#[derive(Debug, Clone)]
enum CounterEvent {
    Toast(String),
    Hint(&'static str),
}

impl Deliver for CounterEvent {
    fn delivery(&self) -> DeliveryBehavior {
        match self {
            CounterEvent::Toast(_) => DeliveryBehavior::ToStartedOrWait,
            CounterEvent::Hint(_) => DeliveryBehavior::ToStartedOrDiscard,
        }
    }
}

struct Counter;

impl Feature for Counter {
    type State = CounterState;
    type Action = CounterAction;
    type Reducer = CounterReducer;
    type Event = CounterEvent;

    fn create_initial_state(&self) -> CounterState {
        CounterState { value: 0 }
    }

    fn on_action(&self, scope: &Scope<Self>, action: CounterAction) -> Result<(), ActionError> {
        match action {
            CounterAction::Increment => {
                scope.emit(Emission::Reducer(CounterReducer::Add(1)))?;
            }
            CounterAction::Decrement => {
                scope.emit(Emission::Reducer(CounterReducer::Add(-1)))?;
                scope.emit(Emission::Event(CounterEvent::Toast("went down".into())))?;
            }
            CounterAction::Hint(text) => {
                scope.emit(Emission::Event(CounterEvent::Hint(text)))?;
            }
            CounterAction::StartTicker => {
                let ticks = scope.clone();
                scope.launch_when(
                    Window::Resumed,
                    TaskFn::new("ticker", move |ctx: CancellationToken| async move {
                        loop {
                            tokio::select! {
                                _ = ctx.cancelled() => break,
                                _ = tokio::time::sleep(Duration::from_millis(50)) => {
                                    ticks.reduce(CounterReducer::Add(10)).map_err(TaskError::fail)?;
                                }
                            }
                        }
                        Err::<(), _>(TaskError::Canceled)
                    }),
                );
            }
        }
        Ok(())
    }
}

struct Console;

impl View<Counter> for Console {
    fn on_state(&self, state: &CounterState) {
        println!("[view] counter = {}", state.value);
    }

    fn on_event(&self, event: &CounterEvent) {
        match event {
            CounterEvent::Toast(text) => println!("[view] toast: {text}"),
            CounterEvent::Hint(text) => println!("[view] hint: {text}"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let observers: Vec<Arc<dyn Observe<Counter>>> = vec![Arc::new(LogWriter::new())];
    let engine = Coreactor::builder(Counter)
        .with_config(Config { tag: "counter".into() })
        .with_observers(observers)
        .build()?;

    engine.attach(Arc::new(Console))?;
    engine.on_host_stage_changed(HostEvent::Create);

    // Not started yet: the state is recorded, the toast waits.
    engine.dispatch(CounterAction::Increment)?;
    engine.dispatch(CounterAction::Decrement)?;
    engine.dispatch(CounterAction::StartTicker)?;

    engine.on_host_stage_changed(HostEvent::Start);
    engine.on_host_stage_changed(HostEvent::Resume);

    let scope = engine.scope();
    let reached = scope.wait_until_state(|s: &CounterState| s.value >= 30);
    engine.dispatch(CounterAction::Increment)?;
    let state = tokio::time::timeout(Duration::from_secs(2), reached).await??;
    println!("ticker pushed the counter to {}", state.value);

    engine.on_host_stage_changed(HostEvent::Pause);
    let paused = engine.state()?;
    tokio::time::sleep(Duration::from_millis(150)).await;
    println!("after pause: {} (was {})", engine.state()?.value, paused.value);

    engine.on_host_stage_changed(HostEvent::Stop);
    engine.dispatch(CounterAction::Hint("never shown"))?;

    engine.on_host_stage_changed(HostEvent::Destroy);
    engine.detach(true);
    println!("final stage: {}", engine.lifecycle());

    // Let observer workers drain their queues.
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
