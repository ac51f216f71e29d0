//! # Diagnostics records.
//!
//! A [`Record`] is emitted for every observable step of the engine. Each one
//! carries a process-wide monotonic `seq` (use it to restore order across
//! observers) and a wall-clock timestamp.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::contract::Feature;
use crate::interceptor::ItemKind;
use crate::lifecycle::{LifecycleStage, Window};

static RECORD_SEQ: AtomicU64 = AtomicU64::new(0);

/// What happened.
#[derive(Debug, Clone)]
pub enum RecordKind<S, A, R, E> {
    /// A new current state was recorded.
    StateReceived(S),
    /// A state was pushed to the view.
    StateDispatched(S),
    /// An action passed the interceptors and is being handled.
    Action(A),
    /// The lifecycle stage changed.
    Lifecycle(LifecycleStage),
    /// A reducer was applied.
    Reducer { old: S, reducer: R, new: S },
    /// An event was emitted by feature logic.
    EventEmitted(E),
    /// An event was delivered to the view.
    EventDispatched(E),
    /// A `ToStartedOrDiscard` event arrived outside the started window.
    EventDiscarded(E),
    /// An event was queued until `window` is entered.
    EventWaiting { event: E, window: Window },
    /// An interceptor vetoed an item.
    Dropped(ItemKind),
    /// A scoped task started running.
    TaskStarted { task: Arc<str>, window: Option<Window> },
    /// A scoped task was queued until its window is entered.
    TaskWaiting { task: Arc<str>, window: Window },
    /// A scoped task finished on its own.
    TaskFinished { task: Arc<str> },
    /// A scoped task observed cancellation.
    TaskCancelled { task: Arc<str> },
    /// A scoped task returned an error.
    TaskFailed { task: Arc<str>, error: String },
    /// A queued scoped task was thrown away without ever running.
    TaskDiscarded { task: Arc<str> },
}

/// One diagnostics record.
#[derive(Debug, Clone)]
pub struct Record<S, A, R, E> {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Tag of the engine that produced the record.
    pub tag: Arc<str>,
    pub kind: RecordKind<S, A, R, E>,
}

/// [`Record`] specialised for a feature.
pub type RecordOf<F> = Record<
    <F as Feature>::State,
    <F as Feature>::Action,
    <F as Feature>::Reducer,
    <F as Feature>::Event,
>;

/// [`RecordKind`] specialised for a feature.
pub(crate) type RecordKindOf<F> = RecordKind<
    <F as Feature>::State,
    <F as Feature>::Action,
    <F as Feature>::Reducer,
    <F as Feature>::Event,
>;

impl<S, A, R, E> Record<S, A, R, E> {
    /// Creates a record with the current timestamp and the next sequence number.
    pub fn new(tag: Arc<str>, kind: RecordKind<S, A, R, E>) -> Self {
        Self {
            seq: RECORD_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            tag,
            kind,
        }
    }
}

impl<S, A, R, E> RecordKind<S, A, R, E> {
    /// Short stable label (kebab-case) for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RecordKind::StateReceived(_) => "state-received",
            RecordKind::StateDispatched(_) => "state-dispatched",
            RecordKind::Action(_) => "action",
            RecordKind::Lifecycle(_) => "lifecycle",
            RecordKind::Reducer { .. } => "reducer",
            RecordKind::EventEmitted(_) => "event-emitted",
            RecordKind::EventDispatched(_) => "event-dispatched",
            RecordKind::EventDiscarded(_) => "event-discarded",
            RecordKind::EventWaiting { .. } => "event-waiting",
            RecordKind::Dropped(_) => "dropped",
            RecordKind::TaskStarted { .. } => "task-started",
            RecordKind::TaskWaiting { .. } => "task-waiting",
            RecordKind::TaskFinished { .. } => "task-finished",
            RecordKind::TaskCancelled { .. } => "task-cancelled",
            RecordKind::TaskFailed { .. } => "task-failed",
            RecordKind::TaskDiscarded { .. } => "task-discarded",
        }
    }
}
