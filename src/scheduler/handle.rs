use std::sync::Arc;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

use super::runner::Outcome;

/// Handle to a scheduled task.
///
/// Dropping the handle does not cancel the task.
#[derive(Debug)]
pub struct JobHandle {
    name: Arc<str>,
    token: CancellationToken,
    rx: oneshot::Receiver<Outcome>,
}

impl JobHandle {
    pub(super) fn new(name: Arc<str>, token: CancellationToken, rx: oneshot::Receiver<Outcome>) -> Self {
        Self { name, token, rx }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cancels the task; a task still waiting for its window is discarded.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Result of the task if it has already ended.
    ///
    /// A task that was discarded before it ever ran reports `Canceled`.
    pub fn try_result(&mut self) -> Option<Result<(), TaskError>> {
        match self.rx.try_recv() {
            Ok(res) => Some(res),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(TaskError::Canceled)),
        }
    }

    /// Waits for the task to end.
    ///
    /// A task that was discarded before it ever ran resolves to `Canceled`.
    pub async fn join(self) -> Result<(), TaskError> {
        self.rx.await.unwrap_or(Err(TaskError::Canceled))
    }
}
