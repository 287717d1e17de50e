// proto/mod.rs - Spawn Protocol Wire Contract
//
//! Protobuf messages of the Spawn sidecar protocol.
//!
//! This module is a hand-maintained mirror of the published protocol
//! definition (see `spawn.proto` next to this file). The contract is owned
//! by the proxy side and is frozen from this crate's perspective: field
//! numbers and enum values here must never change. Checking the messages in
//! avoids a `protoc` requirement on every build host.

pub mod actors;
pub mod protocol;

pub use actors::{
    Action, Actor, ActorDeactivationStrategy, ActorId, ActorSettings, ActorSnapshotStrategy,
    ActorState, ActorSystem, FixedTimerAction, Kind, Metadata, Registry, TimeoutStrategy,
};
pub use protocol::{
    ActorInvocation, ActorInvocationResponse, Broadcast, Context, Forward, InvocationRequest,
    InvocationResponse, Noop, Pipe, ProxyInfo, RegistrationRequest, RegistrationResponse,
    RequestStatus, ServiceInfo, SideEffect, SpawnRequest, SpawnResponse, Status, Workflow,
};
