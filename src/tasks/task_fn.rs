//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: FnOnce(CancellationToken) -> Fut`. The
//! closure is called once, when the scheduler starts the task, so it may move
//! captured state into the future.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use coreactor::{TaskFn, TaskRef, TaskError};
//!
//! let t: TaskRef = TaskFn::boxed("refresh", |ctx: CancellationToken| async move {
//!     if ctx.is_cancelled() {
//!         return Err(TaskError::Canceled);
//!     }
//!     Ok(())
//! });
//!
//! assert_eq!(t.name(), "refresh");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::tasks::task::{BoxTaskFuture, Task, TaskRef};

/// Function-backed task implementation.
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F, Fut> TaskFn<F>
where
    F: FnOnce(CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    /// Creates the task and returns it type-erased.
    pub fn boxed(name: impl Into<Cow<'static, str>>, f: F) -> TaskRef {
        Box::new(Self::new(name, f))
    }
}

impl<F> fmt::Debug for TaskFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskFn").field("name", &self.name).finish_non_exhaustive()
    }
}

impl<F, Fut> Task for TaskFn<F>
where
    F: FnOnce(CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn spawn(self: Box<Self>, ctx: CancellationToken) -> BoxTaskFuture {
        Box::pin((self.f)(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closure_runs_once_with_token() {
        let token = CancellationToken::new();
        let task = TaskFn::boxed("probe", |ctx: CancellationToken| async move {
            if ctx.is_cancelled() {
                Err(TaskError::Canceled)
            } else {
                Ok(())
            }
        });
        assert_eq!(task.name(), "probe");

        token.cancel();
        assert_eq!(task.spawn(token).await, Err(TaskError::Canceled));
    }
}
