//! # ActionRouter.

use std::sync::Arc;

use crate::contract::Feature;
use crate::interceptor::{InterceptorChain, ItemKind};
use crate::observers::{ObserverSet, RecordKind};
use crate::streams::Bus;

/// Intercepts and broadcasts actions before they reach the feature.
pub struct ActionRouter<F: Feature> {
    bus: Bus<F::Action>,
    chain: Arc<InterceptorChain<F>>,
    observers: Arc<ObserverSet<F>>,
}

impl<F: Feature> ActionRouter<F> {
    pub fn new(bus: Bus<F::Action>, chain: Arc<InterceptorChain<F>>, observers: Arc<ObserverSet<F>>) -> Self {
        Self {
            bus,
            chain,
            observers,
        }
    }

    /// Returns the action to hand to the feature, or `None` if it was vetoed.
    pub fn route(&self, action: F::Action) -> Option<F::Action> {
        let Some(action) = self.chain.action(action) else {
            self.observers.emit(|| RecordKind::Dropped(ItemKind::Action));
            return None;
        };
        self.observers.emit(|| RecordKind::Action(action.clone()));
        self.bus.publish(action.clone());
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use tokio::runtime::Handle;

    use super::*;
    use crate::interceptor::Interceptor;
    use crate::testing::{Counter, CounterAction};

    struct OnlyIncrements;

    impl Interceptor<Counter> for OnlyIncrements {
        fn intercept_action(&self, action: CounterAction) -> Option<CounterAction> {
            (action == CounterAction::Increment).then_some(action)
        }
    }

    #[tokio::test]
    async fn vetoed_action_is_not_broadcast() {
        let bus = Bus::new();
        let mut sub = bus.subscribe();
        let observers = Arc::new(ObserverSet::new(Arc::from("t"), Vec::new(), &Handle::current()));
        let chain: Vec<Arc<dyn Interceptor<Counter>>> = vec![Arc::new(OnlyIncrements)];
        let router = ActionRouter::<Counter>::new(bus, Arc::new(InterceptorChain::new(chain)), observers);

        assert_eq!(router.route(CounterAction::Decrement), None);
        assert_eq!(router.route(CounterAction::Increment), Some(CounterAction::Increment));

        assert_eq!(sub.try_recv(), Some(CounterAction::Increment));
        assert_eq!(sub.try_recv(), None);
    }
}
