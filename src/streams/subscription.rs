//! # Subscription handed out by [`Bus`](super::Bus) and [`ConflatedBus`](super::ConflatedBus).

use futures::Stream;
use tokio::sync::mpsc::{self, error::TryRecvError};

/// Independent receiver over one broadcast stream.
///
/// A subscription opened on a conflated bus yields the cached latest value
/// first. Once [`close`](Subscription::close)d, nothing more is delivered.
#[derive(Debug)]
pub struct Subscription<T> {
    first: Option<T>,
    rx: Option<mpsc::UnboundedReceiver<T>>,
}

impl<T: Clone + Send + 'static> Subscription<T> {
    pub(crate) fn new(first: Option<T>, rx: mpsc::UnboundedReceiver<T>) -> Self {
        Self {
            first,
            rx: Some(rx),
        }
    }

    /// Waits for the next item.
    ///
    /// Returns `None` once the subscription is closed or the bus is gone.
    pub async fn recv(&mut self) -> Option<T> {
        if let Some(item) = self.first.take() {
            return Some(item);
        }
        let rx = self.rx.as_mut()?;
        let item = rx.recv().await;
        if item.is_none() {
            self.rx = None;
        }
        item
    }

    /// Returns the next item if one is already buffered.
    pub fn try_recv(&mut self) -> Option<T> {
        if let Some(item) = self.first.take() {
            return Some(item);
        }
        let rx = self.rx.as_mut()?;
        match rx.try_recv() {
            Ok(item) => Some(item),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.rx = None;
                None
            }
        }
    }

    /// Detaches from the bus; later publishes are not delivered here.
    pub fn close(&mut self) {
        self.first = None;
        self.rx = None;
    }

    pub fn is_closed(&self) -> bool {
        self.first.is_none() && self.rx.is_none()
    }

    /// Turns the subscription into a [`Stream`] of items.
    pub fn into_stream(self) -> impl Stream<Item = T> + Send + 'static {
        futures::stream::unfold(self, |mut sub| async move {
            sub.recv().await.map(|item| (item, sub))
        })
    }
}
