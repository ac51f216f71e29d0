//! Fan-out broadcast streams and the wait-until primitive built on them.
//!
//! ## Contents
//! - [`Bus`] pure fan-out: a subscriber sees only items published after it subscribed
//! - [`ConflatedBus`] fan-out plus a latest-value cache replayed to new subscribers
//! - [`Subscription`] independent receiver handed out by both buses
//! - [`wait_until`] resolve with the first item matching a predicate
//!
//! ## Quick reference
//! ```text
//!   actions / reducers / events ──► Bus<T>          (no replay)
//!   states / lifecycle stages  ──► ConflatedBus<T> (replays latest)
//!
//!   publish(x) ─┬─► Subscription 1 ─► wait_until(pred) ─► first match, then close
//!               ├─► Subscription 2
//!               └─► Subscription N
//! ```
//!
//! Every subscription observes the whole sequence published after it was
//! opened; concurrent waiters never steal items from one another.

mod bus;
mod conflated;
mod subscription;
mod wait;

pub use bus::Bus;
pub use conflated::ConflatedBus;
pub use subscription::Subscription;
pub use wait::wait_until;
