//! # Diagnostics observers.
//!
//! Observers are read-only: they are told about every state, action, reducer,
//! event, lifecycle change and scoped-task transition, and have no way to
//! influence behavior.
//!
//! ## Architecture
//! ```text
//! owner context ── emit(RecordKind) ──► ObserverSet
//!                                          ├──► [queue O1] ─► worker O1 ─► on_record()
//!                                          ├──► [queue O2] ─► worker O2 ─► on_record()
//!                                          └──► [queue ON] ─► worker ON ─► on_record()
//! ```
//!
//! The owner context never waits for an observer: a full queue drops the
//! record for that observer only.
//!
//! ## Implementing an observer
//! ```no_run
//! use async_trait::async_trait;
//! use coreactor::{Feature, Observe, RecordKind, RecordOf};
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl<F: Feature> Observe<F> for Audit {
//!     async fn on_record(&self, record: &RecordOf<F>) {
//!         if let RecordKind::Action(action) = &record.kind {
//!             // write audit entry...
//!             let _ = action;
//!         }
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod observe;
mod record;
mod set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use observe::Observe;
pub use record::{Record, RecordKind, RecordOf};
pub use set::ObserverSet;
