//! # Scoped task scheduling.
//!
//! [`ScopedTaskScheduler`] ties background tasks to lifecycle windows;
//! [`JobHandle`] lets the caller await or cancel one of them.

mod handle;
mod runner;
mod scoped;

pub use handle::JobHandle;
pub use scoped::ScopedTaskScheduler;
