//! # Run one scoped task to completion or cancellation.
//!
//! ```text
//! Success:       task.spawn() → Ok(())          → TaskFinished
//! Cancellation:  token fired  → Err(Canceled)   → TaskCancelled
//! Failure:       task.spawn() → Err(Fail)       → TaskFailed
//! Panic:         caught       → Err(Fail)       → TaskFailed
//! ```
//!
//! ## Rules
//! - Exactly **one** terminal record per started task.
//! - `Canceled` is a normal stop, never reported as a failure.
//! - The task is polled before the token, so a body that observes
//!   cancellation itself gets to finish its unwinding code.
//! - The result is sent to the [`JobHandle`](super::JobHandle) last; a dropped
//!   handle is not an error.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::contract::Feature;
use crate::error::TaskError;
use crate::observers::{ObserverSet, RecordKind};
use crate::tasks::TaskRef;

pub(super) type Outcome = Result<(), TaskError>;

pub(super) async fn run_scoped<F: Feature>(
    task: TaskRef,
    name: Arc<str>,
    token: CancellationToken,
    observers: Arc<ObserverSet<F>>,
    done: oneshot::Sender<Outcome>,
) {
    let fut = AssertUnwindSafe(task.spawn(token.clone())).catch_unwind();

    let res = tokio::select! {
        biased;
        res = fut => res.unwrap_or_else(|panic| Err(TaskError::fail(panic_message(&*panic)))),
        _ = token.cancelled() => Err(TaskError::Canceled),
    };

    match &res {
        Ok(()) => {
            observers.emit(|| RecordKind::TaskFinished { task: name.clone() });
        }
        Err(TaskError::Canceled) => {
            tracing::debug!(task = &*name, "scoped task cancelled");
            observers.emit(|| RecordKind::TaskCancelled { task: name.clone() });
        }
        Err(TaskError::Fail { error }) => {
            tracing::error!(task = &*name, error = %error, "scoped task failed");
            observers.emit(|| RecordKind::TaskFailed {
                task: name.clone(),
                error: error.clone(),
            });
        }
    }

    let _ = done.send(res);
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("panicked: {msg}")
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("panicked: {msg}")
    } else {
        "panicked".to_owned()
    }
}
