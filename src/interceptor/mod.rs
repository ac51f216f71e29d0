//! # Interceptors: pluggable hooks in front of every processed item.
//!
//! An [`Interceptor`] sees every state, action, reducer and event before the
//! engine processes it. Each hook may pass the item through, replace it, or
//! veto it by returning `None`. A veto is a silent short-circuit: the item is
//! not broadcast and has no effect; it is reported to diagnostics only.
//!
//! [`InterceptorChain`] runs several interceptors in registration order; the
//! first veto stops the chain.
//!
//! ```text
//!   item ─► hook 1 ─► hook 2 ─► ... ─► hook N ─► engine
//!             │         │                │
//!             └─ None ──┴──── None ──────┴──► dropped (debug log + Record::Dropped)
//! ```

mod chain;
mod hooks;

pub use chain::InterceptorChain;
pub use hooks::{Interceptor, ItemKind, Passthrough};
