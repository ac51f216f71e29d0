//! # Feature-facing contract.
//!
//! This module defines what a feature plugs into the engine:
//! - [`Feature`] creates the initial state and handles actions;
//! - [`Reduce`] / [`FnReducer`] pure `State -> State` transitions;
//! - [`Deliver`] / [`DeliveryBehavior`] delivery policy carried by every event;
//! - [`Emission`] the "reducer or event" value handed to `Scope::emit`;
//! - [`View`] the transient observer that renders states and reacts to events.
//!
//! Actions, reducers and events are closed enums owned by the feature and
//! matched exhaustively.

mod event;
mod feature;
mod reducer;
mod view;

pub use event::{Deliver, DeliveryBehavior};
pub use feature::{Emission, EmissionOf, Feature};
pub use reducer::{FnReducer, Reduce};
pub use view::{View, ViewRef};
