// proto/actors.rs - Actor Catalog Messages
//
//! Package `eigr.functions.protocol.actors`: the actor catalog sent to the
//! proxy during registration — identities, settings and declared actions.

use std::collections::HashMap;

/// Unique identity of an actor inside an actor system.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ActorId {
    /// Actor name, unique per system.
    #[prost(string, tag = "1")]
    pub name: String,
    /// Name of the owning actor system.
    #[prost(string, tag = "2")]
    pub system: String,
    /// Parent actor name, set when spawning unnamed actors under a parent.
    #[prost(string, tag = "3")]
    pub parent: String,
}

/// Snapshot/deactivation timeout policy.
#[derive(Clone, PartialEq, prost::Message)]
pub struct TimeoutStrategy {
    /// Timeout in milliseconds.
    #[prost(int64, tag = "1")]
    pub timeout: i64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActorSnapshotStrategy {
    #[prost(oneof = "actor_snapshot_strategy::Strategy", tags = "1")]
    pub strategy: Option<actor_snapshot_strategy::Strategy>,
}

pub mod actor_snapshot_strategy {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Strategy {
        #[prost(message, tag = "1")]
        Timeout(super::TimeoutStrategy),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActorDeactivationStrategy {
    #[prost(oneof = "actor_deactivation_strategy::Strategy", tags = "1")]
    pub strategy: Option<actor_deactivation_strategy::Strategy>,
}

pub mod actor_deactivation_strategy {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Strategy {
        #[prost(message, tag = "1")]
        Timeout(super::TimeoutStrategy),
    }
}

/// A named operation an actor declares to the proxy.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Action {
    #[prost(string, tag = "1")]
    pub name: String,
}

/// An action the proxy fires on a fixed timer.
#[derive(Clone, PartialEq, prost::Message)]
pub struct FixedTimerAction {
    #[prost(int32, tag = "1")]
    pub seconds: i32,
    #[prost(message, optional, tag = "2")]
    pub action: Option<Action>,
}

/// Persisted actor state as carried on the wire.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ActorState {
    #[prost(map = "string, string", tag = "1")]
    pub tags: HashMap<String, String>,
    #[prost(message, optional, tag = "2")]
    pub state: Option<prost_types::Any>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Metadata {
    /// Channel group this actor subscribes to for broadcasts.
    #[prost(string, tag = "1")]
    pub channel_group: String,
    #[prost(map = "string, string", tag = "2")]
    pub tags: HashMap<String, String>,
}

/// The lifecycle category of an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum Kind {
    UnknowKind = 0,
    Named = 1,
    Unnamed = 2,
    Pooled = 3,
    Proxy = 4,
    Task = 5,
    Projection = 6,
}

/// Policy settings the proxy applies to a registered actor.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ActorSettings {
    #[prost(enumeration = "Kind", tag = "1")]
    pub kind: i32,
    #[prost(bool, tag = "2")]
    pub stateful: bool,
    #[prost(message, optional, tag = "3")]
    pub snapshot_strategy: Option<ActorSnapshotStrategy>,
    #[prost(message, optional, tag = "4")]
    pub deactivation_strategy: Option<ActorDeactivationStrategy>,
    /// Pool bounds, only meaningful when `kind` is POOLED.
    #[prost(int32, tag = "5")]
    pub min_pool_size: i32,
    #[prost(int32, tag = "6")]
    pub max_pool_size: i32,
}

/// Wire-level actor descriptor: identity, settings and declared actions.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Actor {
    #[prost(message, optional, tag = "1")]
    pub id: Option<ActorId>,
    #[prost(message, optional, tag = "2")]
    pub state: Option<ActorState>,
    #[prost(message, optional, tag = "3")]
    pub settings: Option<ActorSettings>,
    #[prost(message, repeated, tag = "4")]
    pub actions: Vec<Action>,
    #[prost(message, repeated, tag = "5")]
    pub timer_actions: Vec<FixedTimerAction>,
    #[prost(message, optional, tag = "6")]
    pub metadata: Option<Metadata>,
}

/// The full actor catalog of one user process.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Registry {
    #[prost(map = "string, message", tag = "1")]
    pub actors: HashMap<String, Actor>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActorSystem {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, optional, tag = "2")]
    pub registry: Option<Registry>,
}
