// actor/context.rs - Invocation Context

use std::collections::HashMap;

use crate::codec::AnyMessage;
use crate::proto;

/// Context handed to an action handler: the actor's current state as
/// decoded from the invocation envelope, plus caller identity and the
/// request's metadata and tags.
///
/// State lives in the envelope, not in this process; two concurrent
/// invocations of the same actor each see their own context.
#[derive(Debug, Default)]
pub struct ActorContext {
    current_state: Option<Box<dyn AnyMessage>>,
    caller: Option<proto::ActorId>,
    self_id: Option<proto::ActorId>,
    metadata: HashMap<String, String>,
    tags: HashMap<String, String>,
}

impl ActorContext {
    pub(crate) fn new(
        current_state: Option<Box<dyn AnyMessage>>,
        caller: Option<proto::ActorId>,
        self_id: Option<proto::ActorId>,
        metadata: HashMap<String, String>,
        tags: HashMap<String, String>,
    ) -> Self {
        Self {
            current_state,
            caller,
            self_id,
            metadata,
            tags,
        }
    }

    /// The actor's current state, `None` when the actor has none yet.
    pub fn state(&self) -> Option<&dyn AnyMessage> {
        self.current_state.as_deref()
    }

    /// The current state downcast to its concrete type.
    pub fn state_as<M: AnyMessage>(&self) -> Option<&M> {
        self.current_state.as_deref().and_then(|s| s.downcast_ref())
    }

    /// Identity of the invoking actor, when the call came from one.
    pub fn caller(&self) -> Option<&proto::ActorId> {
        self.caller.as_ref()
    }

    /// Identity of the invoked actor itself.
    pub fn self_id(&self) -> Option<&proto::ActorId> {
        self.self_id.as_ref()
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    pub fn tags(&self) -> &HashMap<String, String> {
        &self.tags
    }
}
