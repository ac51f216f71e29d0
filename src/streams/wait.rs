//! # Wait-until primitive.
//!
//! [`wait_until`] consumes a [`Subscription`] and resolves with the first item
//! for which the predicate holds, closing the subscription afterwards.
//!
//! The subscription is opened by the caller **before** the returned future is
//! first polled, so items published between the call and the first poll are
//! not missed. No timeout is built in; wrap the future in
//! `tokio::time::timeout` when one is needed.

use crate::error::CoreactorError;

use super::Subscription;

/// Resolves with the first item of `sub` that satisfies `predicate`.
///
/// Items that do not match are discarded. Fails with
/// [`CoreactorError::StreamClosed`] only if the stream ends first.
pub async fn wait_until<T, P>(mut sub: Subscription<T>, mut predicate: P) -> Result<T, CoreactorError>
where
    T: Clone + Send + 'static,
    P: FnMut(&T) -> bool,
{
    while let Some(item) = sub.recv().await {
        if predicate(&item) {
            sub.close();
            return Ok(item);
        }
    }
    Err(CoreactorError::StreamClosed)
}
