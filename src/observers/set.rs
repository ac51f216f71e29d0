//! # ObserverSet: non-blocking fan-out over multiple observers
//!
//! [`ObserverSet`] distributes each record to every observer **without
//! awaiting** their processing.
//!
//! ## What it guarantees
//! - `emit` returns immediately.
//! - Per-observer FIFO (queue order).
//! - Panics inside observers are caught and logged (isolation).
//! - Records are not even built when there are no observers.
//!
//! ## What it does **not** guarantee
//! - No global ordering across different observers (use `Record::seq`).
//! - No retries on per-observer queue overflow.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{runtime::Handle, sync::mpsc};

use crate::contract::Feature;

use super::Observe;
use super::record::{Record, RecordKindOf, RecordOf};

/// Per-observer channel with metadata.
struct ObserverChannel<F: Feature> {
    name: &'static str,
    sender: mpsc::Sender<Arc<RecordOf<F>>>,
}

/// Composite fan-out with per-observer bounded queues and worker tasks.
pub struct ObserverSet<F: Feature> {
    tag: Arc<str>,
    channels: Vec<ObserverChannel<F>>,
}

impl<F: Feature> ObserverSet<F> {
    /// Creates a new set and spawns one worker per observer on `runtime`.
    #[must_use]
    pub fn new(tag: Arc<str>, observers: Vec<Arc<dyn Observe<F>>>, runtime: &Handle) -> Self {
        let mut channels = Vec::with_capacity(observers.len());

        for observer in observers {
            let cap = observer.queue_capacity().max(1);
            let name = observer.name();
            let (tx, mut rx) = mpsc::channel::<Arc<RecordOf<F>>>(cap);

            // Workers end once the set, and with it the sender, is dropped.
            runtime.spawn(async move {
                while let Some(record) = rx.recv().await {
                    let fut = observer.on_record(record.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        tracing::error!(
                            observer = observer.name(),
                            panic = ?panic_err,
                            "observer panicked"
                        );
                    }
                }
            });

            channels.push(ObserverChannel { name, sender: tx });
        }

        Self { tag, channels }
    }

    /// Fan-out one record to all observers (non-blocking).
    ///
    /// `kind` is only evaluated when at least one observer is registered.
    pub(crate) fn emit(&self, kind: impl FnOnce() -> RecordKindOf<F>) {
        if self.channels.is_empty() {
            return;
        }
        let record = Arc::new(Record::new(Arc::clone(&self.tag), kind()));
        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&record)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        observer = channel.name,
                        record = record.kind.as_label(),
                        "observer dropped record: queue full"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::warn!(
                        observer = channel.name,
                        record = record.kind.as_label(),
                        "observer dropped record: worker closed"
                    );
                }
            }
        }
    }

    /// True if there are no observers.
    #[must_use]
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of observers.
    #[must_use]
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}
