// actor/mod.rs - Actor Definitions
//
//! Actor definitions and their action handlers.
//!
//! An [`ActorDefinition`] describes one actor to the proxy: identity, kind,
//! statefulness, timeout policies, and a table of named action handlers.
//! The proxy owns the actor's lifecycle and mailbox; this side only
//! declares capabilities and runs handlers when invocations arrive.
//!
//! # Example
//!
//! ```ignore
//! use spawn_sdk::actor::{ActorConfig, ActorDefinition, Kind};
//! use spawn_sdk::Value;
//!
//! let counter = ActorDefinition::new(ActorConfig {
//!     name: "Counter".into(),
//!     kind: Kind::Named,
//!     stateful: true,
//!     ..ActorConfig::default()
//! });
//!
//! counter.add_action("Increment", |ctx, payload| {
//!     let state = ctx.state_as::<CounterState>().cloned().unwrap_or_default();
//!     let by = payload
//!         .and_then(|p| p.downcast_ref::<IncrementBy>())
//!         .map(|m| m.by)
//!         .unwrap_or(1);
//!     let next = CounterState { count: state.count + by };
//!     Ok(Value::of(next.clone(), next))
//! });
//! ```

mod context;
mod definition;
mod registry;
mod value;

pub use context::ActorContext;
pub use definition::{ActionError, ActionHandler, ActorConfig, ActorDefinition, Kind};
pub use registry::ActorRegistry;
pub use value::{StateChange, Value};
