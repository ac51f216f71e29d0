//! # Engine: the owner context.
//!
//! All mutation happens while holding the engine's reentrant owner lock. The
//! mutable [`Core`] sits in a `RefCell` inside it; a borrow is only ever held
//! for a short, self-contained step and is released before the engine calls
//! out to the feature, the view or an interceptor's lifecycle hook. That lets
//! those callbacks re-enter the engine on the same thread (a view dispatching
//! from `on_event`, a feature emitting from `on_action`), while any other
//! thread blocks on the lock until the owner is done.
//!
//! ## Stage change, step by step
//! ```text
//! change_stage(next)
//!   ├─► interceptors.on_lifecycle_changed(next)
//!   ├─► record Lifecycle, store stage, publish on lifecycle stream
//!   ├─► feature.on_lifecycle(next)
//!   ├─► scheduler: cancel windows left, start windows entered
//!   │     └─ next == Detached ─► shutdown scheduler, drop queued events
//!   ├─► Created entered ─► flush created-queue to view
//!   └─► Started entered ─► push latest state, then flush started-queue to view
//! ```

use std::cell::RefCell;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use tokio::runtime::Handle;

use crate::config::Config;
use crate::contract::{Feature, ViewRef};
use crate::error::CoreactorError;
use crate::interceptor::InterceptorChain;
use crate::lifecycle::{LifecycleStage, Window};
use crate::observers::{Observe, ObserverSet, RecordKind};
use crate::routing::{ActionRouter, EventRouter, ReducerRouter};
use crate::scheduler::{JobHandle, ScopedTaskScheduler};
use crate::store::{Committed, StateStore};
use crate::streams::{Bus, ConflatedBus};
use crate::tasks::TaskRef;

use super::Scope;

/// Mutable state guarded by the owner lock.
struct Core<F: Feature> {
    stage: LifecycleStage,
    view: Option<ViewRef<F>>,
    store: StateStore<F>,
    actions: ActionRouter<F>,
    reducers: ReducerRouter<F>,
    events: EventRouter<F>,
    tasks: ScopedTaskScheduler<F>,
}

pub(crate) struct Engine<F: Feature> {
    pub(crate) tag: Arc<str>,
    pub(crate) feature: F,
    owner: ReentrantMutex<RefCell<Core<F>>>,

    pub(crate) states: Arc<ConflatedBus<F::State>>,
    pub(crate) lifecycles: ConflatedBus<LifecycleStage>,
    pub(crate) actions: Bus<F::Action>,
    pub(crate) reducers: Bus<F::Reducer>,
    pub(crate) events: Bus<F::Event>,

    chain: Arc<InterceptorChain<F>>,
    observers: Arc<ObserverSet<F>>,
}

impl<F: Feature> Engine<F> {
    pub(crate) fn new(
        feature: F,
        cfg: &Config,
        chain: InterceptorChain<F>,
        observers: Vec<Arc<dyn Observe<F>>>,
        runtime: Handle,
    ) -> Self {
        let tag: Arc<str> = Arc::from(cfg.tag.as_ref());

        let chain = Arc::new(chain);
        let observers = Arc::new(ObserverSet::new(Arc::clone(&tag), observers, &runtime));

        let states = Arc::new(ConflatedBus::new());
        let lifecycles = ConflatedBus::new();
        let actions = Bus::new();
        let reducers = Bus::new();
        let events = Bus::new();
        lifecycles.publish(LifecycleStage::Initial);

        let core = Core {
            stage: LifecycleStage::Initial,
            view: None,
            store: StateStore::new(Arc::clone(&states), Arc::clone(&chain), Arc::clone(&observers)),
            actions: ActionRouter::new(actions.clone(), Arc::clone(&chain), Arc::clone(&observers)),
            reducers: ReducerRouter::new(reducers.clone(), Arc::clone(&chain), Arc::clone(&observers)),
            events: EventRouter::new(events.clone(), Arc::clone(&chain), Arc::clone(&observers)),
            tasks: ScopedTaskScheduler::new(Arc::clone(&observers), runtime),
        };

        Self {
            tag,
            feature,
            owner: ReentrantMutex::new(RefCell::new(core)),
            states,
            lifecycles,
            actions,
            reducers,
            events,
            chain,
            observers,
        }
    }

    fn owner(&self) -> ReentrantMutexGuard<'_, RefCell<Core<F>>> {
        self.owner.lock()
    }

    fn scope(self: &Arc<Self>) -> Scope<F> {
        Scope::new(Arc::clone(self))
    }

    pub(crate) fn lifecycle(&self) -> LifecycleStage {
        self.owner().borrow().stage
    }

    pub(crate) fn state(&self) -> Result<F::State, CoreactorError> {
        self.owner().borrow().store.current().cloned()
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.owner().borrow().view.is_some()
    }

    /// Binds `view`; the first attach creates the initial state.
    pub(crate) fn attach(self: &Arc<Self>, view: ViewRef<F>) -> Result<(), CoreactorError> {
        let owner = self.owner();
        let (first, created, started) = {
            let mut core = owner.borrow_mut();
            if core.stage.is_detached() {
                return Err(CoreactorError::AlreadyDetached);
            }
            if core.view.is_some() {
                return Err(CoreactorError::DoubleAttach);
            }
            core.view = Some(view);
            let stage = core.stage;
            (stage.is_initial(), stage.is_in_created_window(), stage.is_in_started_window())
        };
        tracing::debug!(tag = &*self.tag, first, "view attached");

        if first {
            let state = self.feature.create_initial_state();
            let committed = {
                let mut core = owner.borrow_mut();
                let stage = core.stage;
                core.store.set_initial(state, stage)
            };
            if let Some(committed) = committed {
                self.on_committed(committed);
            }
            self.change_stage(LifecycleStage::Attached);
        } else {
            // Re-attached: catch the new view up on what it missed.
            if created {
                self.flush_events(Window::Created);
            }
            if started {
                let pending = owner.borrow().store.flush_pending_on_start();
                if let Some(state) = pending {
                    self.push_state(state);
                }
                self.flush_events(Window::Started);
            }
        }
        Ok(())
    }

    /// Unbinds the view; a finishing detach tears the engine down for good.
    pub(crate) fn detach(self: &Arc<Self>, is_finishing: bool) {
        let owner = self.owner();
        let (had_view, stage) = {
            let mut core = owner.borrow_mut();
            (core.view.take().is_some(), core.stage)
        };
        tracing::debug!(tag = &*self.tag, had_view, is_finishing, "view detached");

        if !is_finishing || stage.is_detached() {
            return;
        }
        if stage != LifecycleStage::Destroyed {
            self.change_stage(LifecycleStage::Destroyed);
        }
        self.change_stage(LifecycleStage::Detached);
    }

    pub(crate) fn on_host_stage_changed(self: &Arc<Self>, stage: LifecycleStage) {
        let _owner = self.owner();
        if matches!(
            stage,
            LifecycleStage::Initial | LifecycleStage::Attached | LifecycleStage::Detached
        ) {
            tracing::warn!(tag = &*self.tag, %stage, "stage is driven by attach/detach; host change ignored");
            return;
        }
        let current = self.lifecycle();
        if current.is_initial() || current.is_detached() {
            tracing::warn!(tag = &*self.tag, %current, %stage, "host stage change outside attached lifetime ignored");
            return;
        }
        self.change_stage(stage);
    }

    pub(crate) fn dispatch(self: &Arc<Self>, action: F::Action) -> Result<(), CoreactorError> {
        let owner = self.owner();
        let routed = {
            let core = owner.borrow();
            match core.stage {
                LifecycleStage::Initial => return Err(CoreactorError::NotAttached),
                LifecycleStage::Detached => return Err(CoreactorError::AlreadyDetached),
                _ => core.actions.route(action),
            }
        };
        let Some(action) = routed else {
            return Ok(());
        };
        self.feature
            .on_action(&self.scope(), action)
            .map_err(|source| CoreactorError::ActionFailed { source })
    }

    pub(crate) fn reduce(self: &Arc<Self>, reducer: F::Reducer) -> Result<(), CoreactorError> {
        let owner = self.owner();
        let committed = {
            let mut guard = owner.borrow_mut();
            let core = &mut *guard;
            let stage = core.stage;
            core.reducers.route(&mut core.store, reducer, stage)?
        };
        if let Some(committed) = committed {
            self.on_committed(committed);
        }
        Ok(())
    }

    pub(crate) fn emit_event(self: &Arc<Self>, event: F::Event) {
        let owner = self.owner();
        let now = {
            let mut core = owner.borrow_mut();
            if core.stage.is_detached() {
                tracing::debug!(tag = &*self.tag, ?event, "event emitted after detach dropped");
                return;
            }
            let (stage, bound) = (core.stage, core.view.is_some());
            core.events.route(event, stage, bound)
        };
        if let Some(event) = now {
            self.deliver_event(event);
        }
    }

    /// Schedules `task` for `window`, or scope-wide when `window` is `None`.
    pub(crate) fn schedule(&self, window: Option<Window>, task: TaskRef) -> JobHandle {
        let owner = self.owner();
        let mut core = owner.borrow_mut();
        let stage = core.stage;
        match window {
            Some(window) => core.tasks.schedule(window, task, stage),
            None => core.tasks.launch(task),
        }
    }

    fn change_stage(self: &Arc<Self>, next: LifecycleStage) {
        let owner = self.owner();
        let prev = owner.borrow().stage;
        if prev == next {
            return;
        }

        self.chain.lifecycle_changed(next);
        self.observers.emit(|| RecordKind::Lifecycle(next));
        owner.borrow_mut().stage = next;
        tracing::debug!(tag = &*self.tag, %prev, %next, "lifecycle stage changed");
        self.lifecycles.publish(next);
        self.feature.on_lifecycle(&self.scope(), next);

        {
            let mut core = owner.borrow_mut();
            core.tasks.on_stage_changed(prev, next);
            if next.is_detached() {
                core.tasks.shutdown();
                core.events.clear();
            }
        }

        if Window::Created.is_entered(prev, next) {
            self.flush_events(Window::Created);
        }
        if Window::Started.is_entered(prev, next) {
            let pending = owner.borrow().store.flush_pending_on_start();
            if let Some(state) = pending {
                self.push_state(state);
            }
            self.flush_events(Window::Started);
        }
    }

    /// Hands the events waiting for `window` to the view.
    ///
    /// Without a view they stay queued until the next attach.
    fn flush_events(&self, window: Window) {
        let owner = self.owner();
        let queued = {
            let mut core = owner.borrow_mut();
            if core.view.is_none() {
                return;
            }
            core.events.flush(window)
        };
        for event in queued {
            self.deliver_event(event);
        }
    }

    fn on_committed(self: &Arc<Self>, committed: Committed<F::State>) {
        let Committed { state, push_now } = committed;
        if push_now {
            self.push_state(state.clone());
        }
        self.feature.on_state(&self.scope(), &state);
    }

    fn push_state(&self, state: F::State) {
        let owner = self.owner();
        let view = owner.borrow().view.clone();
        match view {
            Some(view) => {
                self.observers
                    .emit(|| RecordKind::StateDispatched(state.clone()));
                view.on_state(&state);
            }
            None => {
                tracing::warn!(tag = &*self.tag, "state due for the view but none is attached");
            }
        }
    }

    fn deliver_event(&self, event: F::Event) {
        let owner = self.owner();
        let view = owner.borrow().view.clone();
        match view {
            Some(view) => view.on_event(&event),
            None => {
                tracing::warn!(tag = &*self.tag, ?event, "event due for the view but none is attached");
            }
        }
    }
}
