//! # Lifecycle stages and windows.
//!
//! [`LifecycleStage`] is the engine's view of the host lifecycle. Stages follow
//! a normal forward progression, but `Paused`/`Stopped`/`Destroyed` can be
//! reached repeatedly (a host that is re-created after a configuration change
//! re-enters `Created`/`Started`/`Resumed`).
//!
//! ```text
//! Initial ─► Attached ─► Created ─► Started ─► Resumed ─► Paused ─► Stopped ─► Destroyed ─► Detached
//!                          │◄──────────── created window ─────────────────►│
//!                                     │◄──── started window ───►│
//!                                              │ resumed │
//! ```
//!
//! A [`Window`] names one of the three ranges. Entering or leaving a window is
//! derived from the pair (previous stage, new stage), so transitions that skip
//! stages still start and cancel the right work.

use std::fmt;

/// Stage of the externally driven lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum LifecycleStage {
    /// Nothing attached yet.
    #[default]
    Initial,
    /// First view attached, initial state created.
    Attached,
    Created,
    Started,
    Resumed,
    Paused,
    Stopped,
    Destroyed,
    /// Terminal: finishing detach happened.
    Detached,
}

impl LifecycleStage {
    /// `Created..=Stopped`.
    #[inline]
    pub fn is_in_created_window(self) -> bool {
        matches!(
            self,
            Self::Created | Self::Started | Self::Resumed | Self::Paused | Self::Stopped
        )
    }

    /// `Started..=Paused`.
    #[inline]
    pub fn is_in_started_window(self) -> bool {
        matches!(self, Self::Started | Self::Resumed | Self::Paused)
    }

    /// `Resumed` only.
    #[inline]
    pub fn is_in_resumed_window(self) -> bool {
        matches!(self, Self::Resumed)
    }

    #[inline]
    pub fn is_initial(self) -> bool {
        matches!(self, Self::Initial)
    }

    #[inline]
    pub fn is_detached(self) -> bool {
        matches!(self, Self::Detached)
    }

    /// True if `self` lies inside `window`.
    #[inline]
    pub fn is_in(self, window: Window) -> bool {
        match window {
            Window::Created => self.is_in_created_window(),
            Window::Started => self.is_in_started_window(),
            Window::Resumed => self.is_in_resumed_window(),
        }
    }

    /// Short lowercase name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Attached => "attached",
            Self::Created => "created",
            Self::Started => "started",
            Self::Resumed => "resumed",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
            Self::Destroyed => "destroyed",
            Self::Detached => "detached",
        }
    }
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous range of stages that scoped work and queued events are keyed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    /// `Created..=Stopped`; torn down at `Destroyed`.
    Created,
    /// `Started..=Paused`; torn down at `Stopped`.
    Started,
    /// `Resumed`; torn down at `Paused`.
    Resumed,
}

impl Window {
    /// All windows, outermost first.
    pub const ALL: [Window; 3] = [Window::Created, Window::Started, Window::Resumed];

    /// Stage whose arrival opens the window.
    pub fn entry_stage(self) -> LifecycleStage {
        match self {
            Window::Created => LifecycleStage::Created,
            Window::Started => LifecycleStage::Started,
            Window::Resumed => LifecycleStage::Resumed,
        }
    }

    /// Stage whose arrival closes the window.
    pub fn teardown_stage(self) -> LifecycleStage {
        match self {
            Window::Created => LifecycleStage::Destroyed,
            Window::Started => LifecycleStage::Stopped,
            Window::Resumed => LifecycleStage::Paused,
        }
    }

    /// True if moving from `prev` to `next` enters this window.
    #[inline]
    pub fn is_entered(self, prev: LifecycleStage, next: LifecycleStage) -> bool {
        !prev.is_in(self) && next.is_in(self)
    }

    /// True if moving from `prev` to `next` leaves this window.
    #[inline]
    pub fn is_left(self, prev: LifecycleStage, next: LifecycleStage) -> bool {
        prev.is_in(self) && !next.is_in(self)
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Window::Created => 0,
            Window::Started => 1,
            Window::Resumed => 2,
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Window::Created => "created",
            Window::Started => "started",
            Window::Resumed => "resumed",
        })
    }
}

/// Stage-change notification as emitted by a host lifecycle source.
///
/// `Attach`/`Detach` are not host events: they are driven by
/// [`Coreactor::attach`](crate::Coreactor::attach) and
/// [`Coreactor::detach`](crate::Coreactor::detach).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Create,
    Start,
    Resume,
    Pause,
    Stop,
    Destroy,
}

impl From<HostEvent> for LifecycleStage {
    fn from(ev: HostEvent) -> Self {
        match ev {
            HostEvent::Create => LifecycleStage::Created,
            HostEvent::Start => LifecycleStage::Started,
            HostEvent::Resume => LifecycleStage::Resumed,
            HostEvent::Pause => LifecycleStage::Paused,
            HostEvent::Stop => LifecycleStage::Stopped,
            HostEvent::Destroy => LifecycleStage::Destroyed,
        }
    }
}
