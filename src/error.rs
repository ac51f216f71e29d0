//! Error types used by the coreactor engine and its scoped tasks.
//!
//! This module defines two main error enums:
//!
//! - [`CoreactorError`]: misuse of the engine contract and failures surfaced by it.
//! - [`TaskError`]: outcome of a scoped task that did not finish normally.
//!
//! Both types provide `as_label` for logs. Interceptor vetoes are **not** errors;
//! they are silent short-circuits reported only through diagnostics.

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed error returned by [`Feature::on_action`](crate::Feature::on_action).
pub type ActionError = Box<dyn StdError + Send + Sync + 'static>;

/// # Errors produced by the engine.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CoreactorError {
    /// The current state was accessed (or a reducer emitted) before the first attach.
    #[error("state is not initialized yet; attach a view first")]
    UninitializedState,

    /// An action was dispatched before the first attach.
    #[error("dispatch called before attach")]
    NotAttached,

    /// An action was dispatched after a finishing detach.
    #[error("dispatch called after a finishing detach")]
    AlreadyDetached,

    /// `attach` was called while a view is still bound.
    #[error("a view is already attached; detach it before attaching again")]
    DoubleAttach,

    /// The feature's action handler returned an error.
    #[error("action handler failed: {source}")]
    ActionFailed {
        /// Error produced by the action handler.
        #[source]
        source: ActionError,
    },

    /// A wait-until stream ended before a matching item arrived (engine dropped).
    #[error("stream closed before a matching item arrived")]
    StreamClosed,

    /// No tokio runtime was available when the engine was built.
    #[error("no tokio runtime available; build inside a runtime or pass a handle")]
    NoRuntime,
}

impl CoreactorError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use coreactor::CoreactorError;
    ///
    /// assert_eq!(CoreactorError::DoubleAttach.as_label(), "double_attach");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CoreactorError::UninitializedState => "uninitialized_state",
            CoreactorError::NotAttached => "not_attached",
            CoreactorError::AlreadyDetached => "already_detached",
            CoreactorError::DoubleAttach => "double_attach",
            CoreactorError::ActionFailed { .. } => "action_failed",
            CoreactorError::StreamClosed => "stream_closed",
            CoreactorError::NoRuntime => "no_runtime",
        }
    }
}

/// # Outcome of a scoped task that did not complete normally.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task body returned an error.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task was cancelled (window left, engine detached, or never started).
    #[error("task cancelled")]
    Canceled,
}

impl TaskError {
    /// Builds a [`TaskError::Fail`] from anything displayable.
    pub fn fail(error: impl std::fmt::Display) -> Self {
        TaskError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// True for cooperative cancellation, which is not an application error.
    ///
    /// # Example
    /// ```
    /// use coreactor::TaskError;
    ///
    /// assert!(TaskError::Canceled.is_cancellation());
    /// assert!(!TaskError::fail("boom").is_cancellation());
    /// ```
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TaskError::Canceled)
    }
}
