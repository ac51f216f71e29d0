//! Engine core: the owner context and its handles.
//!
//! - [`Coreactor`]: host-facing handle (attach, detach, dispatch, stage changes);
//! - [`Scope`]: feature-facing handle (emit, launch, wait);
//! - [`CoreactorBuilder`]: wires config, interceptors, observers and runtime.
//!
//! Internal modules:
//! - `engine`: the single-writer core behind a reentrant owner lock.

mod builder;
mod coreactor;
mod engine;
mod scope;


pub use builder::CoreactorBuilder;
pub use coreactor::Coreactor;
pub use scope::Scope;
