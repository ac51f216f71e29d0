//! # coreactor
//!
//! **Coreactor** is a lifecycle-aware, single-writer state runtime.
//!
//! It binds one long-lived feature (state + action handling) to an externally
//! driven lifecycle and to a transient, possibly absent view. The crate
//! provides the dispatch and scheduling core: a state store, a policy-driven
//! event delivery state machine, a scheduler for work scoped to lifecycle
//! windows, and wait-until primitives built on fan-out broadcast streams.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  view ── dispatch(action) ──┐        host ── on_host_stage_changed(stage)
//!                             ▼                          │
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  Coreactor (owner context, reentrant lock)                            │
//! │   ActionRouter ─► Feature::on_action ─► Scope::emit                   │
//! │                                           ├─ Reducer ─► ReducerRouter │
//! │                                           │              └► StateStore│
//! │                                           └─ Event ───► EventRouter   │
//! │   ScopedTaskScheduler ◄── window entered / left ◄── stage change      │
//! │   InterceptorChain (every state/action/reducer/event)                 │
//! └──────┬──────────────────────────┬──────────────────────────┬──────────┘
//!        ▼                          ▼                          ▼
//!  View::on_state/on_event   broadcast streams          ObserverSet
//!  (started / created         states, lifecycles:        (per-observer
//!   window only)              replay latest;             queues, workers)
//!                             actions, reducers,
//!                             events: pure fan-out
//! ```
//!
//! ### Lifecycle windows
//! ```text
//! Initial ─► Attached ─► Created ─► Started ─► Resumed ─► Paused ─► Stopped ─► Destroyed ─► Detached
//!                          │◄────────────── created window ──────────────►│
//!                                     │◄───── started window ─────►│
//!                                              │ resumed │
//!
//! entering Created  ─► start Created tasks, flush events waiting for Created
//! entering Started  ─► start Started tasks, push latest state, flush events waiting for Started
//! entering Resumed  ─► start Resumed tasks
//! leaving a window  ─► cancel its tasks (Paused / Stopped / Destroyed)
//! finishing detach  ─► Destroyed, Detached, cancel everything, discard waiting tasks
//! ```
//!
//! ## Features
//! | Area          | Description                                                         | Key types                          |
//! |---------------|---------------------------------------------------------------------|------------------------------------|
//! | **Contract**  | Feature logic, reducers, events with delivery policies, the view    | [`Feature`], [`Reduce`], [`View`]  |
//! | **Engine**    | Attach/detach, dispatch, host stage changes                         | [`Coreactor`], [`Scope`]           |
//! | **Delivery**  | `EveryTime`, `ToStartedOrWait`, `ToStartedOrDiscard`                | [`DeliveryBehavior`]               |
//! | **Tasks**     | Work started and cancelled at window boundaries                     | [`Task`], [`TaskFn`], [`JobHandle`]|
//! | **Streams**   | Fan-out buses and wait-until                                        | [`Subscription`], [`wait_until`]   |
//! | **Intercept** | Pass, replace or veto every item                                    | [`Interceptor`]                    |
//! | **Observe**   | Read-only diagnostics records                                       | [`Observe`], [`Record`]            |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a built-in observer that renders records through `tracing` (enabled by default).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use coreactor::{
//!     ActionError, Coreactor, Deliver, DeliveryBehavior, Emission, Feature, HostEvent, Reduce,
//!     Scope, View,
//! };
//!
//! struct Greeter;
//!
//! #[derive(Debug, Clone)]
//! enum Action { Greet(&'static str) }
//!
//! #[derive(Debug, Clone)]
//! struct Count;
//! impl Reduce<u32> for Count {
//!     fn reduce(&self, n: &u32) -> u32 { n + 1 }
//! }
//!
//! #[derive(Debug, Clone)]
//! struct Toast(&'static str);
//! impl Deliver for Toast {
//!     fn delivery(&self) -> DeliveryBehavior { DeliveryBehavior::ToStartedOrWait }
//! }
//!
//! impl Feature for Greeter {
//!     type State = u32;
//!     type Action = Action;
//!     type Reducer = Count;
//!     type Event = Toast;
//!
//!     fn create_initial_state(&self) -> u32 { 0 }
//!
//!     fn on_action(&self, scope: &Scope<Self>, action: Action) -> Result<(), ActionError> {
//!         let Action::Greet(name) = action;
//!         scope.emit(Emission::Reducer(Count))?;
//!         scope.emit(Emission::Event(Toast(name)))?;
//!         Ok(())
//!     }
//! }
//!
//! struct Screen;
//! impl View<Greeter> for Screen {
//!     fn on_state(&self, greeted: &u32) { println!("greeted {greeted} people"); }
//!     fn on_event(&self, toast: &Toast) { println!("hello, {}!", toast.0); }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = Coreactor::builder(Greeter).build()?;
//!     engine.attach(Arc::new(Screen))?;
//!     engine.on_host_stage_changed(HostEvent::Create);
//!
//!     // Toast waits for the started window; state is recorded but not pushed.
//!     engine.dispatch(Action::Greet("ferris"))?;
//!     engine.on_host_stage_changed(HostEvent::Start);
//!
//!     engine.detach(true);
//!     Ok(())
//! }
//! ```
mod config;
mod contract;
mod core;
mod error;
mod interceptor;
mod lifecycle;
mod observers;
mod routing;
mod scheduler;
mod store;
mod streams;
mod tasks;

#[cfg(test)]
mod testing;

// ---- Public re-exports ----

pub use config::Config;
pub use contract::{Deliver, DeliveryBehavior, Emission, EmissionOf, Feature, FnReducer, Reduce, View, ViewRef};
pub use self::core::{Coreactor, CoreactorBuilder, Scope};
pub use error::{ActionError, CoreactorError, TaskError};
pub use interceptor::{Interceptor, ItemKind, Passthrough};
pub use lifecycle::{HostEvent, LifecycleStage, Window};
pub use observers::{Observe, Record, RecordKind, RecordOf};
pub use scheduler::JobHandle;
pub use routing::DispatchDecision;
pub use streams::{Bus, ConflatedBus, Subscription, wait_until};
pub use tasks::{BoxTaskFuture, Task, TaskFn, TaskRef};

// Optional: built-in observer that renders records through `tracing`.
// Enable with: `--features logging` (on by default)
#[cfg(feature = "logging")]
pub use observers::LogWriter;
