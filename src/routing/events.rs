//! # EventRouter: delivery policy state machine.
//!
//! Given the current stage and the event's [`DeliveryBehavior`]:
//!
//! ```text
//!   EveryTime          ─ in created window ? dispatch now : queue (waiting-for-created)
//!   ToStartedOrWait    ─ in started window ? dispatch now : queue (waiting-for-started)
//!   ToStartedOrDiscard ─ in started window ? dispatch now : discard
//! ```
//!
//! "Dispatch now" runs the event through the interceptors; if it survives it
//! is published on the event bus and returned to the caller, which hands it
//! to the view. Queues are flushed in FIFO order exactly once, on the first
//! entry into their window after the event was queued, or on re-attach.
//!
//! While no view is bound nothing is due now: waiting events are queued for
//! their window and `ToStartedOrDiscard` events are discarded.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::contract::{Deliver, DeliveryBehavior, Feature};
use crate::interceptor::{InterceptorChain, ItemKind};
use crate::lifecycle::{LifecycleStage, Window};
use crate::observers::{ObserverSet, RecordKind};
use crate::streams::Bus;

/// Outcome of the delivery policy for one event at one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchDecision {
    Now,
    WaitForCreated,
    WaitForStarted,
    Discard,
}

impl DispatchDecision {
    /// Pure policy table.
    pub fn decide(behavior: DeliveryBehavior, stage: LifecycleStage) -> Self {
        if behavior.is_deliverable_at(stage) {
            return DispatchDecision::Now;
        }
        Self::hold(behavior)
    }

    /// Decision while no view is bound, whatever the stage.
    pub fn decide_unbound(behavior: DeliveryBehavior) -> Self {
        Self::hold(behavior)
    }

    fn hold(behavior: DeliveryBehavior) -> Self {
        if !behavior.waits() {
            return DispatchDecision::Discard;
        }
        match behavior.window() {
            Window::Created => DispatchDecision::WaitForCreated,
            Window::Started | Window::Resumed => DispatchDecision::WaitForStarted,
        }
    }
}

/// Applies the delivery policy and owns the two waiting queues.
pub struct EventRouter<F: Feature> {
    waiting_for_created: VecDeque<F::Event>,
    waiting_for_started: VecDeque<F::Event>,
    bus: Bus<F::Event>,
    chain: Arc<InterceptorChain<F>>,
    observers: Arc<ObserverSet<F>>,
}

impl<F: Feature> EventRouter<F> {
    pub fn new(bus: Bus<F::Event>, chain: Arc<InterceptorChain<F>>, observers: Arc<ObserverSet<F>>) -> Self {
        Self {
            waiting_for_created: VecDeque::new(),
            waiting_for_started: VecDeque::new(),
            bus,
            chain,
            observers,
        }
    }

    /// Routes a freshly emitted event.
    ///
    /// Returns the event if it must be handed to the view now.
    pub fn route(&mut self, event: F::Event, stage: LifecycleStage, view_bound: bool) -> Option<F::Event> {
        self.observers
            .emit(|| RecordKind::EventEmitted(event.clone()));

        let decision = if view_bound {
            DispatchDecision::decide(event.delivery(), stage)
        } else {
            DispatchDecision::decide_unbound(event.delivery())
        };
        match decision {
            DispatchDecision::Now => self.dispatch_now(event),
            DispatchDecision::WaitForCreated => {
                self.observers.emit(|| RecordKind::EventWaiting {
                    event: event.clone(),
                    window: Window::Created,
                });
                self.waiting_for_created.push_back(event);
                None
            }
            DispatchDecision::WaitForStarted => {
                self.observers.emit(|| RecordKind::EventWaiting {
                    event: event.clone(),
                    window: Window::Started,
                });
                self.waiting_for_started.push_back(event);
                None
            }
            DispatchDecision::Discard => {
                tracing::debug!(event = ?event, %stage, view_bound, "event discarded: view not started");
                self.observers.emit(|| RecordKind::EventDiscarded(event));
                None
            }
        }
    }

    /// Drains the queue for `window` in FIFO order.
    ///
    /// Returns the events that survived interception, to be handed to the view.
    pub fn flush(&mut self, window: Window) -> Vec<F::Event> {
        let queued = match window {
            Window::Created => std::mem::take(&mut self.waiting_for_created),
            Window::Started => std::mem::take(&mut self.waiting_for_started),
            Window::Resumed => return Vec::new(),
        };
        queued
            .into_iter()
            .filter_map(|event| self.dispatch_now(event))
            .collect()
    }

    /// Number of events waiting for `window`.
    #[cfg(test)]
    pub fn waiting(&self, window: Window) -> usize {
        match window {
            Window::Created => self.waiting_for_created.len(),
            Window::Started => self.waiting_for_started.len(),
            Window::Resumed => 0,
        }
    }

    /// Drops every queued event.
    pub fn clear(&mut self) {
        self.waiting_for_created.clear();
        self.waiting_for_started.clear();
    }

    fn dispatch_now(&self, event: F::Event) -> Option<F::Event> {
        let Some(event) = self.chain.event(event) else {
            self.observers.emit(|| RecordKind::Dropped(ItemKind::Event));
            return None;
        };
        self.bus.publish(event.clone());
        self.observers
            .emit(|| RecordKind::EventDispatched(event.clone()));
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use tokio::runtime::Handle;

    use super::*;
    use crate::interceptor::Interceptor;
    use crate::testing::{Counter, Notice};
    use DeliveryBehavior::*;
    use LifecycleStage::*;

    fn router(hooks: Vec<Arc<dyn Interceptor<Counter>>>) -> (EventRouter<Counter>, Bus<Notice>) {
        let bus = Bus::new();
        let observers = Arc::new(ObserverSet::new(Arc::from("t"), Vec::new(), &Handle::current()));
        (
            EventRouter::new(bus.clone(), Arc::new(InterceptorChain::new(hooks)), observers),
            bus,
        )
    }

    fn notice(msg: &'static str, behavior: DeliveryBehavior) -> Notice {
        Notice { msg, behavior }
    }

    #[test]
    fn policy_table() {
        assert_eq!(DispatchDecision::decide(EveryTime, Created), DispatchDecision::Now);
        assert_eq!(DispatchDecision::decide(EveryTime, Stopped), DispatchDecision::Now);
        assert_eq!(DispatchDecision::decide(EveryTime, Attached), DispatchDecision::WaitForCreated);
        assert_eq!(DispatchDecision::decide(EveryTime, Destroyed), DispatchDecision::WaitForCreated);

        assert_eq!(DispatchDecision::decide(ToStartedOrWait, Paused), DispatchDecision::Now);
        assert_eq!(DispatchDecision::decide(ToStartedOrWait, Created), DispatchDecision::WaitForStarted);

        assert_eq!(DispatchDecision::decide(ToStartedOrDiscard, Resumed), DispatchDecision::Now);
        assert_eq!(DispatchDecision::decide(ToStartedOrDiscard, Stopped), DispatchDecision::Discard);
    }

    #[test]
    fn unbound_policy_holds_or_discards() {
        assert_eq!(DispatchDecision::decide_unbound(EveryTime), DispatchDecision::WaitForCreated);
        assert_eq!(DispatchDecision::decide_unbound(ToStartedOrWait), DispatchDecision::WaitForStarted);
        assert_eq!(DispatchDecision::decide_unbound(ToStartedOrDiscard), DispatchDecision::Discard);
    }

    #[tokio::test]
    async fn nothing_is_due_while_no_view_is_bound() {
        let (mut router, bus) = router(Vec::new());
        let mut sub = bus.subscribe();

        assert_eq!(router.route(notice("kept", EveryTime), Resumed, false), None);
        assert_eq!(router.route(notice("gone", ToStartedOrDiscard), Resumed, false), None);
        assert_eq!(router.waiting(Window::Created), 1);
        assert_eq!(sub.try_recv(), None);

        let flushed: Vec<_> = router.flush(Window::Created).into_iter().map(|n| n.msg).collect();
        assert_eq!(flushed, ["kept"]);
        assert_eq!(sub.try_recv().map(|n| n.msg), Some("kept"));
    }

    #[tokio::test]
    async fn queued_events_flush_in_order_once() {
        let (mut router, bus) = router(Vec::new());
        let mut sub = bus.subscribe();

        assert_eq!(router.route(notice("a", ToStartedOrWait), Created, true), None);
        assert_eq!(router.route(notice("b", ToStartedOrWait), Created, true), None);
        assert_eq!(router.waiting(Window::Started), 2);
        assert_eq!(sub.try_recv(), None);

        let flushed: Vec<_> = router.flush(Window::Started).into_iter().map(|n| n.msg).collect();
        assert_eq!(flushed, ["a", "b"]);
        assert!(router.flush(Window::Started).is_empty());
        assert_eq!(sub.try_recv().map(|n| n.msg), Some("a"));
        assert_eq!(sub.try_recv().map(|n| n.msg), Some("b"));
    }

    #[tokio::test]
    async fn discarded_events_never_come_back() {
        let (mut router, _) = router(Vec::new());
        assert_eq!(router.route(notice("gone", ToStartedOrDiscard), Created, true), None);
        assert_eq!(router.waiting(Window::Started), 0);
        assert!(router.flush(Window::Started).is_empty());
    }

    #[tokio::test]
    async fn dispatch_now_returns_event() {
        let (mut router, bus) = router(Vec::new());
        let mut sub = bus.subscribe();
        let ev = notice("now", EveryTime);
        assert_eq!(router.route(ev.clone(), Created, true), Some(ev.clone()));
        assert_eq!(sub.try_recv(), Some(ev));
    }

    struct Shout;

    impl Interceptor<Counter> for Shout {
        fn intercept_event(&self, event: Notice) -> Option<Notice> {
            (event.msg != "mute").then_some(Notice { msg: "LOUD", ..event })
        }
    }

    #[tokio::test]
    async fn queued_events_are_intercepted_on_flush() {
        let (mut router, _) = router(vec![Arc::new(Shout)]);
        router.route(notice("quiet", EveryTime), Attached, true);
        router.route(notice("mute", EveryTime), Attached, true);

        let flushed = router.flush(Window::Created);
        assert_eq!(flushed, vec![notice("LOUD", EveryTime)]);
    }
}
