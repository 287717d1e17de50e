// lib.rs - Spawn Rust SDK
//
// User-side runtime of the Spawn sidecar actor protocol: register actor
// definitions with the proxy, serve inbound invocations, invoke actors
// anywhere in the cluster.

#![doc = include_str!("../README.md")]

pub mod actor;
pub mod codec;
pub mod observability;
pub mod proto;
pub mod system;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use actor::{
    ActionError, ActionHandler, ActorConfig, ActorContext, ActorDefinition, ActorRegistry, Kind,
    StateChange, Value,
};

pub use codec::{AnyMessage, CodecError, TypeRegistry, register_type};

pub use system::{
    ActorSystem, InvokeError, InvokeOptions, ProxyClient, SystemConfig, SystemError, SystemHandle,
};

pub use observability::{TracingConfig, TracingFormat, init_tracing};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::actor::{
        ActionError, ActorConfig, ActorContext, ActorDefinition, Kind, StateChange, Value,
    };
    pub use crate::codec::{AnyMessage, register_type};
    pub use crate::system::{ActorSystem, InvokeOptions, SystemConfig, SystemHandle};
}
