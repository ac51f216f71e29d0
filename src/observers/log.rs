//! # LogWriter: records rendered through `tracing`
//!
//! A minimal observer that turns every record into one `tracing` event at
//! `INFO` level, tagged with the engine tag and the record sequence.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO coreactor: [lifecycle] tag="counter" seq=0 stage=attached
//! INFO coreactor: [action] tag="counter" seq=3 action=Increment
//! INFO coreactor: [reducer] tag="counter" seq=4 old=CounterState { value: 0 } reducer=Add(1) new=CounterState { value: 1 }
//! INFO coreactor: [event-discarded] tag="counter" seq=9 event=Toast("hi")
//! INFO coreactor: [task-failed] tag="counter" seq=12 task="sync" err="connection refused"
//! ```
//!
//! [`LogWriter::simple`] keeps only the label, tag and sequence:
//! ```text
//! INFO coreactor: [reducer] tag="counter" seq=4
//! ```

use async_trait::async_trait;

use crate::contract::Feature;
use crate::observers::{Observe, RecordKind, RecordOf};

/// Record writer observer.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter {
    simple: bool,
}

impl LogWriter {
    /// Writer rendering every payload field.
    #[must_use]
    pub fn new() -> Self {
        Self { simple: false }
    }

    /// Writer rendering labels only, without payloads.
    #[must_use]
    pub fn simple() -> Self {
        Self { simple: true }
    }
}

#[async_trait]
impl<F: Feature> Observe<F> for LogWriter {
    async fn on_record(&self, r: &RecordOf<F>) {
        let (tag, seq) = (&*r.tag, r.seq);
        if self.simple {
            tracing::info!(tag, seq, "[{}]", r.kind.as_label());
            return;
        }
        match &r.kind {
            RecordKind::StateReceived(state) => {
                tracing::info!(tag, seq, ?state, "[state-received]");
            }
            RecordKind::StateDispatched(state) => {
                tracing::info!(tag, seq, ?state, "[state-dispatched]");
            }
            RecordKind::Action(action) => {
                tracing::info!(tag, seq, ?action, "[action]");
            }
            RecordKind::Lifecycle(stage) => {
                tracing::info!(tag, seq, %stage, "[lifecycle]");
            }
            RecordKind::Reducer { old, reducer, new } => {
                tracing::info!(tag, seq, ?old, ?reducer, ?new, "[reducer]");
            }
            RecordKind::EventEmitted(event) => {
                tracing::info!(tag, seq, ?event, "[event-emitted]");
            }
            RecordKind::EventDispatched(event) => {
                tracing::info!(tag, seq, ?event, "[event-dispatched]");
            }
            RecordKind::EventDiscarded(event) => {
                tracing::info!(tag, seq, ?event, "[event-discarded]");
            }
            RecordKind::EventWaiting { event, window } => {
                tracing::info!(tag, seq, ?event, %window, "[event-waiting]");
            }
            RecordKind::Dropped(kind) => {
                tracing::info!(tag, seq, %kind, "[dropped]");
            }
            RecordKind::TaskStarted { task, window } => {
                tracing::info!(tag, seq, task = &**task, ?window, "[task-started]");
            }
            RecordKind::TaskWaiting { task, window } => {
                tracing::info!(tag, seq, task = &**task, %window, "[task-waiting]");
            }
            RecordKind::TaskFinished { task } => {
                tracing::info!(tag, seq, task = &**task, "[task-finished]");
            }
            RecordKind::TaskCancelled { task } => {
                tracing::info!(tag, seq, task = &**task, "[task-cancelled]");
            }
            RecordKind::TaskFailed { task, error } => {
                tracing::info!(tag, seq, task = &**task, err = %error, "[task-failed]");
            }
            RecordKind::TaskDiscarded { task } => {
                tracing::info!(tag, seq, task = &**task, "[task-discarded]");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::observers::Record;
    use crate::testing::{Counter, CounterAction};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn render(writer: LogWriter) -> String {
        let out = Captured::default();
        let sink = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();

        let record: RecordOf<Counter> = Record::new(Arc::from("counter"), RecordKind::Action(CounterAction::Increment));
        tracing::subscriber::with_default(subscriber, || {
            futures::executor::block_on(Observe::<Counter>::on_record(&writer, &record));
        });
        let bytes = out.0.lock().clone();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[test]
    fn detailed_writer_renders_payloads() {
        let line = render(LogWriter::new());
        assert!(line.contains("[action]"), "{line}");
        assert!(line.contains("Increment"), "{line}");
    }

    #[test]
    fn simple_writer_renders_labels_only() {
        let line = render(LogWriter::simple());
        assert!(line.contains("[action]"), "{line}");
        assert!(line.contains("tag=\"counter\""), "{line}");
        assert!(!line.contains("Increment"), "{line}");
    }
}
