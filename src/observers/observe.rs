//! # Core observer trait.

use async_trait::async_trait;

use crate::contract::Feature;

use super::RecordOf;

/// Contract for diagnostics observers.
///
/// Called from an observer-dedicated worker task. Implementations may be slow
/// (I/O, batching); they never block the engine nor other observers.
#[async_trait]
pub trait Observe<F: Feature>: Send + Sync + 'static {
    /// Handle a single record.
    async fn on_record(&self, record: &RecordOf<F>);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this observer's queue.
    ///
    /// On overflow, records for this observer are **dropped** (warn).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
