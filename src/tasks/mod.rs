//! # Task abstractions.
//!
//! - [`Task`] - trait for one-shot, cancelable units of work
//! - [`TaskFn`] - closure-backed implementation
//! - [`TaskRef`] - owned, type-erased task (`Box<dyn Task>`)

mod task;
mod task_fn;

pub use task::{BoxTaskFuture, Task, TaskRef};
pub use task_fn::TaskFn;
