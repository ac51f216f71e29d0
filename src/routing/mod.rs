//! # Routers: actions, reducers and events on their way through the engine.
//!
//! ```text
//! dispatch(action) ─► ActionRouter ──(intercept, publish)──► Feature::on_action
//!                                                                 │ emit
//!                         ┌───────────────────────────────────────┴───────────┐
//!                         ▼                                                   ▼
//!                  ReducerRouter ──(intercept, publish)──► StateStore   EventRouter
//!                                                                        ├─ dispatch now ─► view
//!                                                                        ├─ wait for created / started
//!                                                                        └─ discard
//! ```
//!
//! - [`ActionRouter`] / [`ReducerRouter`] are thin: intercept, broadcast, hand on.
//! - [`EventRouter`] owns the delivery policy state machine and its two queues.

mod actions;
mod events;
mod reducers;

pub use actions::ActionRouter;
pub use events::{DispatchDecision, EventRouter};
pub use reducers::ReducerRouter;
