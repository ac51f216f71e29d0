//! # Reducers: pure `State -> State` transitions.
//!
//! Features usually declare reducers as an enum implementing [`Reduce`].
//! [`FnReducer`] wraps a named closure; it backs `Scope::emit_reducer` and can
//! be embedded in a feature's reducer enum through a `From` impl.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Pure transition applied exactly once by the state store.
pub trait Reduce<S>: Send + Sync + 'static {
    fn reduce(&self, state: &S) -> S;
}

/// Closure-backed reducer with a name for diagnostics.
///
/// ## Example
/// ```rust
/// use coreactor::{FnReducer, Reduce};
///
/// let inc = FnReducer::new("increment", |n: &i64| n + 1);
/// assert_eq!(inc.reduce(&41), 42);
/// assert_eq!(inc.name(), "increment");
/// ```
pub struct FnReducer<S> {
    name: Cow<'static, str>,
    f: Arc<dyn Fn(&S) -> S + Send + Sync>,
}

impl<S> FnReducer<S> {
    /// Creates a named reducer.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(&S) -> S + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    /// Creates a reducer named `"anonymous"`.
    pub fn anonymous<F>(f: F) -> Self
    where
        F: Fn(&S) -> S + Send + Sync + 'static,
    {
        Self::new("anonymous", f)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<S> Clone for FnReducer<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            f: Arc::clone(&self.f),
        }
    }
}

impl<S> fmt::Debug for FnReducer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnReducer").field("name", &self.name).finish()
    }
}

impl<S: 'static> Reduce<S> for FnReducer<S> {
    fn reduce(&self, state: &S) -> S {
        (self.f)(state)
    }
}
