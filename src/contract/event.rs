//! # Event delivery policies.

use crate::lifecycle::{LifecycleStage, Window};

/// How an event is delivered relative to the lifecycle.
///
/// | Behavior             | target window | outside the window    |
/// |----------------------|---------------|-----------------------|
/// | `EveryTime`          | Created       | wait for Created      |
/// | `ToStartedOrWait`    | Started       | wait for Started      |
/// | `ToStartedOrDiscard` | Started       | discard permanently   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeliveryBehavior {
    #[default]
    EveryTime,
    ToStartedOrWait,
    ToStartedOrDiscard,
}

impl DeliveryBehavior {
    /// Window the event must be delivered in.
    pub fn window(self) -> Window {
        match self {
            DeliveryBehavior::EveryTime => Window::Created,
            DeliveryBehavior::ToStartedOrWait | DeliveryBehavior::ToStartedOrDiscard => {
                Window::Started
            }
        }
    }

    /// True if the event can be delivered at `stage`.
    #[inline]
    pub fn is_deliverable_at(self, stage: LifecycleStage) -> bool {
        stage.is_in(self.window())
    }

    /// True if the event is kept for later when it cannot be delivered now.
    #[inline]
    pub fn waits(self) -> bool {
        !matches!(self, DeliveryBehavior::ToStartedOrDiscard)
    }
}

/// Implemented by feature events to declare their delivery policy.
///
/// The default is [`DeliveryBehavior::EveryTime`].
pub trait Deliver {
    fn delivery(&self) -> DeliveryBehavior {
        DeliveryBehavior::EveryTime
    }
}
