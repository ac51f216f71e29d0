//! # InterceptorChain: ordered interceptors with short-circuit on veto.

use std::sync::Arc;

use crate::contract::Feature;
use crate::lifecycle::LifecycleStage;

use super::{Interceptor, ItemKind};

/// Ordered set of interceptors applied to every item.
///
/// An empty chain passes everything through.
pub struct InterceptorChain<F: Feature> {
    hooks: Vec<Arc<dyn Interceptor<F>>>,
}

impl<F: Feature> Default for InterceptorChain<F> {
    fn default() -> Self {
        Self { hooks: Vec::new() }
    }
}

impl<F: Feature> InterceptorChain<F> {
    #[must_use]
    pub fn new(hooks: Vec<Arc<dyn Interceptor<F>>>) -> Self {
        Self { hooks }
    }

    /// Appends an interceptor; it runs after every one registered before it.
    pub fn push(&mut self, hook: Arc<dyn Interceptor<F>>) {
        self.hooks.push(hook);
    }

    pub fn state(&self, state: F::State) -> Option<F::State> {
        self.run(ItemKind::State, state, |h, s| h.intercept_state(s))
    }

    pub fn action(&self, action: F::Action) -> Option<F::Action> {
        self.run(ItemKind::Action, action, |h, a| h.intercept_action(a))
    }

    pub fn reducer(&self, reducer: F::Reducer) -> Option<F::Reducer> {
        self.run(ItemKind::Reducer, reducer, |h, r| h.intercept_reducer(r))
    }

    pub fn event(&self, event: F::Event) -> Option<F::Event> {
        self.run(ItemKind::Event, event, |h, e| h.intercept_event(e))
    }

    /// Notifies every interceptor of a stage change.
    pub fn lifecycle_changed(&self, stage: LifecycleStage) {
        for hook in &self.hooks {
            hook.on_lifecycle_changed(stage);
        }
    }

    #[must_use]
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    fn run<T>(
        &self,
        kind: ItemKind,
        item: T,
        apply: impl Fn(&dyn Interceptor<F>, T) -> Option<T>,
    ) -> Option<T> {
        let mut item = item;
        for hook in &self.hooks {
            match apply(hook.as_ref(), item) {
                Some(next) => item = next,
                None => {
                    tracing::debug!(interceptor = hook.name(), %kind, "item vetoed by interceptor");
                    return None;
                }
            }
        }
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::contract::DeliveryBehavior;
    use crate::interceptor::Passthrough;
    use crate::testing::{Counter, CounterAction, CounterState, Notice};

    struct Swap;

    impl Interceptor<Counter> for Swap {
        fn intercept_action(&self, action: CounterAction) -> Option<CounterAction> {
            Some(match action {
                CounterAction::Increment => CounterAction::Decrement,
                other => other,
            })
        }

        fn intercept_state(&self, state: CounterState) -> Option<CounterState> {
            Some(CounterState {
                counter: state.counter * 10,
            })
        }
    }

    struct VetoEvents;

    impl Interceptor<Counter> for VetoEvents {
        fn intercept_event(&self, _event: Notice) -> Option<Notice> {
            None
        }
    }

    #[derive(Default)]
    struct Stages(Mutex<Vec<LifecycleStage>>);

    impl Interceptor<Counter> for Stages {
        fn on_lifecycle_changed(&self, stage: LifecycleStage) {
            self.0.lock().push(stage);
        }
    }

    fn notice() -> Notice {
        Notice {
            msg: "hi",
            behavior: DeliveryBehavior::EveryTime,
        }
    }

    #[test]
    fn empty_chain_passes_through() {
        let chain = InterceptorChain::<Counter>::default();
        assert_eq!(chain.action(CounterAction::Increment), Some(CounterAction::Increment));
        assert_eq!(chain.event(notice()), Some(notice()));
    }

    #[test]
    fn hooks_apply_in_order() {
        let chain = InterceptorChain::<Counter>::new(vec![
            Arc::new(Swap),
            Arc::new(Passthrough),
            Arc::new(Swap),
        ]);
        assert_eq!(
            chain.state(CounterState { counter: 2 }),
            Some(CounterState { counter: 200 })
        );
        assert_eq!(chain.action(CounterAction::Increment), Some(CounterAction::Decrement));
    }

    #[test]
    fn veto_short_circuits() {
        let chain = InterceptorChain::<Counter>::new(vec![Arc::new(VetoEvents), Arc::new(Swap)]);
        assert_eq!(chain.event(notice()), None);
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn lifecycle_changes_reach_every_hook() {
        let stages = Arc::new(Stages::default());
        let mut chain = InterceptorChain::<Counter>::default();
        chain.push(stages.clone());
        chain.push(Arc::new(VetoEvents));

        chain.lifecycle_changed(LifecycleStage::Attached);
        chain.lifecycle_changed(LifecycleStage::Created);
        assert_eq!(
            *stages.0.lock(),
            vec![LifecycleStage::Attached, LifecycleStage::Created]
        );
    }
}
