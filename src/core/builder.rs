use std::sync::Arc;

use tokio::runtime::Handle;

use crate::config::Config;
use crate::contract::Feature;
use crate::error::CoreactorError;
use crate::interceptor::{Interceptor, InterceptorChain};
use crate::observers::Observe;

use super::{Coreactor, engine::Engine};

/// Builder for a [`Coreactor`] with optional interceptors and observers.
pub struct CoreactorBuilder<F: Feature> {
    feature: F,
    cfg: Config,
    chain: InterceptorChain<F>,
    observers: Vec<Arc<dyn Observe<F>>>,
    runtime: Option<Handle>,
}

impl<F: Feature> CoreactorBuilder<F> {
    pub(crate) fn new(feature: F) -> Self {
        Self {
            feature,
            cfg: Config::default(),
            chain: InterceptorChain::default(),
            observers: Vec::new(),
            runtime: None,
        }
    }

    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Appends an interceptor; interceptors run in registration order.
    pub fn with_interceptor(mut self, interceptor: impl Interceptor<F>) -> Self {
        self.chain.push(Arc::new(interceptor));
        self
    }

    /// Sets diagnostics observers.
    ///
    /// Each observer gets its own bounded queue and worker task.
    pub fn with_observers(mut self, observers: Vec<Arc<dyn Observe<F>>>) -> Self {
        self.observers = observers;
        self
    }

    /// Runtime for scoped tasks and observer workers.
    ///
    /// Defaults to the runtime `build` is called from.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Builds the engine in the `Initial` stage.
    ///
    /// Fails with [`CoreactorError::NoRuntime`] when called outside a tokio
    /// runtime without [`with_runtime`](Self::with_runtime).
    pub fn build(self) -> Result<Coreactor<F>, CoreactorError> {
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| CoreactorError::NoRuntime)?,
        };
        let engine = Engine::new(self.feature, &self.cfg, self.chain, self.observers, runtime);
        Ok(Coreactor::from_engine(Arc::new(engine)))
    }
}
