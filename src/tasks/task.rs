//! # Scoped task abstraction.
//!
//! A [`Task`] is a one-shot, cancelable unit of async work. It is consumed on
//! spawn: the scheduler runs each task at most once, either right away or
//! when its lifecycle window is entered.
//!
//! A task receives a [`CancellationToken`] that fires when its window is left
//! or the engine detaches. Tasks should check it cooperatively; the scheduler
//! also stops polling a task once the token fires.

use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

/// Boxed future produced by [`Task::spawn`].
pub type BoxTaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + 'static>>;

/// # One-shot, cancelable unit of work.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use coreactor::{BoxTaskFuture, Task, TaskError};
///
/// struct Poll;
///
/// impl Task for Poll {
///     fn name(&self) -> &str { "poll" }
///
///     fn spawn(self: Box<Self>, ctx: CancellationToken) -> BoxTaskFuture {
///         Box::pin(async move {
///             ctx.cancelled().await;
///             Err(TaskError::Canceled)
///         })
///     }
/// }
/// ```
pub trait Task: Send + 'static {
    /// Stable, human-readable task name used in diagnostics.
    fn name(&self) -> &str;

    /// Consumes the task and produces the future to run.
    fn spawn(self: Box<Self>, ctx: CancellationToken) -> BoxTaskFuture;
}

/// Owned, type-erased task.
pub type TaskRef = Box<dyn Task>;

impl Task for TaskRef {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn spawn(self: Box<Self>, ctx: CancellationToken) -> BoxTaskFuture {
        <dyn Task as Task>::spawn(*self, ctx)
    }
}
