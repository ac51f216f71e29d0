//! # ReducerRouter.

use std::sync::Arc;

use crate::contract::Feature;
use crate::error::CoreactorError;
use crate::interceptor::{InterceptorChain, ItemKind};
use crate::lifecycle::LifecycleStage;
use crate::observers::{ObserverSet, RecordKind};
use crate::store::{Committed, StateStore};
use crate::streams::Bus;

/// Intercepts and broadcasts reducers, then applies them to the store.
pub struct ReducerRouter<F: Feature> {
    bus: Bus<F::Reducer>,
    chain: Arc<InterceptorChain<F>>,
    observers: Arc<ObserverSet<F>>,
}

impl<F: Feature> ReducerRouter<F> {
    pub fn new(bus: Bus<F::Reducer>, chain: Arc<InterceptorChain<F>>, observers: Arc<ObserverSet<F>>) -> Self {
        Self {
            bus,
            chain,
            observers,
        }
    }

    /// Routes one reducer into `store`.
    ///
    /// A vetoed reducer is never applied (`Ok(None)`). Fails if the store has
    /// no state yet.
    pub fn route(
        &self,
        store: &mut StateStore<F>,
        reducer: F::Reducer,
        stage: LifecycleStage,
    ) -> Result<Option<Committed<F::State>>, CoreactorError> {
        store.current()?;
        let Some(reducer) = self.chain.reducer(reducer) else {
            self.observers.emit(|| RecordKind::Dropped(ItemKind::Reducer));
            return Ok(None);
        };
        self.bus.publish(reducer.clone());
        store.apply_reducer(&reducer, stage)
    }
}

#[cfg(test)]
mod tests {
    use tokio::runtime::Handle;

    use super::*;
    use crate::interceptor::Interceptor;
    use crate::streams::ConflatedBus;
    use crate::testing::{Counter, CounterReducer, CounterState};

    struct DoubleAdds;

    impl Interceptor<Counter> for DoubleAdds {
        fn intercept_reducer(&self, reducer: CounterReducer) -> Option<CounterReducer> {
            match reducer {
                CounterReducer::Add(n) if n < 0 => None,
                CounterReducer::Add(n) => Some(CounterReducer::Add(n * 2)),
                other => Some(other),
            }
        }
    }

    #[tokio::test]
    async fn intercepted_reducer_is_applied_and_broadcast() {
        let observers = Arc::new(ObserverSet::new(Arc::from("t"), Vec::new(), &Handle::current()));
        let hooks: Vec<Arc<dyn Interceptor<Counter>>> = vec![Arc::new(DoubleAdds)];
        let chain = Arc::new(InterceptorChain::new(hooks));
        let mut store = StateStore::<Counter>::new(Arc::new(ConflatedBus::new()), chain.clone(), observers.clone());
        let bus = Bus::new();
        let mut sub = bus.subscribe();
        let router = ReducerRouter::new(bus, chain, observers);

        assert!(matches!(
            router.route(&mut store, CounterReducer::Add(1), LifecycleStage::Started),
            Err(CoreactorError::UninitializedState)
        ));

        store.set_initial(CounterState { counter: 0 }, LifecycleStage::Started);
        let applied = router.route(&mut store, CounterReducer::Add(3), LifecycleStage::Started);
        assert_eq!(applied.ok().flatten().map(|c| c.state.counter), Some(6));

        let vetoed = router.route(&mut store, CounterReducer::Add(-1), LifecycleStage::Started);
        assert!(matches!(vetoed, Ok(None)));
        assert_eq!(store.current().ok().map(|s| s.counter), Some(6));

        assert!(matches!(sub.try_recv(), Some(CounterReducer::Add(6))));
        assert!(sub.try_recv().is_none());
    }
}
