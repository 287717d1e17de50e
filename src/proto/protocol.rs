// proto/protocol.rs - Invocation and Registration Envelopes
//
//! Package `eigr.functions.protocol`: the envelopes exchanged with the
//! proxy — registration handshake, inbound actor invocations, outbound
//! invocation requests, and the workflow continuations a response may carry.

use std::collections::HashMap;

use crate::proto::actors::{Actor, ActorId, ActorSystem};

/// Outcome of a request as judged by the proxy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum Status {
    Unknown = 0,
    Ok = 1,
    ActorNotFound = 2,
    Error = 3,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RequestStatus {
    #[prost(enumeration = "Status", tag = "1")]
    pub status: i32,
    #[prost(string, tag = "2")]
    pub message: String,
}

/// Explicit "no payload" marker, distinct from an absent field.
#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Noop {}

/// Invocation context: the actor's state plus caller identity and tags.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Context {
    #[prost(message, optional, tag = "1")]
    pub state: Option<prost_types::Any>,
    #[prost(message, optional, tag = "2")]
    pub caller: Option<ActorId>,
    #[prost(message, optional, tag = "3")]
    pub self_: Option<ActorId>,
    #[prost(map = "string, string", tag = "4")]
    pub metadata: HashMap<String, String>,
    #[prost(map = "string, string", tag = "5")]
    pub tags: HashMap<String, String>,
}

/// Identifies the SDK to the proxy during registration.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ServiceInfo {
    #[prost(string, tag = "1")]
    pub service_name: String,
    #[prost(string, tag = "2")]
    pub service_version: String,
    #[prost(string, tag = "3")]
    pub service_runtime: String,
    #[prost(string, tag = "4")]
    pub support_library_name: String,
    #[prost(string, tag = "5")]
    pub support_library_version: String,
    #[prost(int32, tag = "6")]
    pub protocol_major_version: i32,
    #[prost(int32, tag = "7")]
    pub protocol_minor_version: i32,
}

/// Proxy identity returned by a successful registration.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ProxyInfo {
    #[prost(int32, tag = "1")]
    pub protocol_major_version: i32,
    #[prost(int32, tag = "2")]
    pub protocol_minor_version: i32,
    #[prost(string, tag = "3")]
    pub proxy_name: String,
    #[prost(string, tag = "4")]
    pub proxy_version: String,
}

/// Startup handshake: service metadata plus the full actor catalog.
#[derive(Clone, PartialEq, prost::Message)]
pub struct RegistrationRequest {
    #[prost(message, optional, tag = "1")]
    pub service_info: Option<ServiceInfo>,
    #[prost(message, optional, tag = "2")]
    pub actor_system: Option<ActorSystem>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RegistrationResponse {
    #[prost(message, optional, tag = "1")]
    pub status: Option<RequestStatus>,
    #[prost(message, optional, tag = "2")]
    pub proxy_info: Option<ProxyInfo>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SpawnRequest {
    #[prost(message, repeated, tag = "1")]
    pub actors: Vec<ActorId>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SpawnResponse {
    #[prost(message, optional, tag = "1")]
    pub status: Option<RequestStatus>,
}

/// A side-effecting invocation attached to a response.
#[derive(Clone, PartialEq, prost::Message)]
pub struct SideEffect {
    #[prost(message, optional, boxed, tag = "1")]
    pub request: Option<Box<InvocationRequest>>,
}

/// Broadcast a payload to every member of a channel group.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Broadcast {
    #[prost(string, tag = "1")]
    pub channel_group: String,
    #[prost(oneof = "broadcast::Payload", tags = "3, 4")]
    pub payload: Option<broadcast::Payload>,
}

pub mod broadcast {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "3")]
        Value(prost_types::Any),
        #[prost(message, tag = "4")]
        Noop(super::Noop),
    }
}

/// Route the response payload into another action of some actor.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Pipe {
    #[prost(string, tag = "1")]
    pub actor: String,
    #[prost(string, tag = "2")]
    pub action_name: String,
}

/// Route the original request payload into another action of some actor.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Forward {
    #[prost(string, tag = "1")]
    pub actor: String,
    #[prost(string, tag = "2")]
    pub action_name: String,
}

/// Post-invocation routing instructions carried in a response envelope.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Workflow {
    #[prost(message, repeated, tag = "1")]
    pub effects: Vec<SideEffect>,
    #[prost(message, optional, tag = "2")]
    pub broadcast: Option<Broadcast>,
    #[prost(oneof = "workflow::Routing", tags = "3, 4")]
    pub routing: Option<workflow::Routing>,
}

pub mod workflow {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Routing {
        #[prost(message, tag = "3")]
        Pipe(super::Pipe),
        #[prost(message, tag = "4")]
        Forward(super::Forward),
    }
}

/// Outbound request asking the proxy to invoke an actor anywhere in the
/// cluster.
#[derive(Clone, PartialEq, prost::Message)]
pub struct InvocationRequest {
    #[prost(message, optional, tag = "1")]
    pub system: Option<ActorSystem>,
    #[prost(message, optional, tag = "2")]
    pub actor: Option<Actor>,
    #[prost(string, tag = "3")]
    pub action_name: String,
    #[prost(oneof = "invocation_request::Payload", tags = "4, 7")]
    pub payload: Option<invocation_request::Payload>,
    /// Fire-and-forget when set; the proxy acknowledges without a reply.
    #[prost(bool, tag = "5")]
    pub r#async: bool,
    #[prost(message, optional, tag = "6")]
    pub caller: Option<ActorId>,
    #[prost(map = "string, string", tag = "8")]
    pub metadata: HashMap<String, String>,
    /// Absolute time (unix millis) the proxy should deliver at, 0 for now.
    #[prost(int64, tag = "9")]
    pub scheduled_to: i64,
    #[prost(bool, tag = "10")]
    pub pooled: bool,
    /// When spawning under a parent, the name to register the ref under.
    #[prost(string, tag = "11")]
    pub register_ref: String,
}

pub mod invocation_request {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "4")]
        Value(prost_types::Any),
        #[prost(message, tag = "7")]
        Noop(super::Noop),
    }
}

/// Inbound envelope: the proxy asks this process to run one action.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ActorInvocation {
    #[prost(message, optional, tag = "1")]
    pub actor: Option<ActorId>,
    #[prost(string, tag = "2")]
    pub action_name: String,
    #[prost(message, optional, tag = "3")]
    pub current_context: Option<Context>,
    #[prost(oneof = "actor_invocation::Payload", tags = "4, 5")]
    pub payload: Option<actor_invocation::Payload>,
    #[prost(message, optional, tag = "6")]
    pub caller: Option<ActorId>,
}

pub mod actor_invocation {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "4")]
        Value(prost_types::Any),
        #[prost(message, tag = "5")]
        Noop(super::Noop),
    }
}

/// Outbound envelope answering an [`ActorInvocation`].
#[derive(Clone, PartialEq, prost::Message)]
pub struct ActorInvocationResponse {
    #[prost(string, tag = "1")]
    pub actor_name: String,
    #[prost(string, tag = "2")]
    pub actor_system: String,
    #[prost(message, optional, tag = "3")]
    pub updated_context: Option<Context>,
    #[prost(oneof = "actor_invocation_response::Payload", tags = "4, 6")]
    pub payload: Option<actor_invocation_response::Payload>,
    #[prost(message, optional, tag = "5")]
    pub workflow: Option<Workflow>,
    /// Asks the proxy to persist the new state now rather than lazily.
    #[prost(bool, tag = "7")]
    pub checkpoint: bool,
}

pub mod actor_invocation_response {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "4")]
        Value(prost_types::Any),
        #[prost(message, tag = "6")]
        Noop(super::Noop),
    }
}

/// Proxy's answer to an [`InvocationRequest`].
#[derive(Clone, PartialEq, prost::Message)]
pub struct InvocationResponse {
    #[prost(message, optional, tag = "1")]
    pub status: Option<RequestStatus>,
    #[prost(message, optional, tag = "2")]
    pub system: Option<ActorSystem>,
    #[prost(message, optional, tag = "3")]
    pub actor: Option<Actor>,
    #[prost(oneof = "invocation_response::Payload", tags = "4, 5")]
    pub payload: Option<invocation_response::Payload>,
}

pub mod invocation_response {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "4")]
        Value(prost_types::Any),
        #[prost(message, tag = "5")]
        Noop(super::Noop),
    }
}
