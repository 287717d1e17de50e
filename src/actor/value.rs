// actor/value.rs - Action Result Builder

use crate::codec::{self, AnyMessage};
use crate::proto;

/// What an action did to the actor's state.
///
/// `Unchanged` and `Clear` are distinct on purpose: the first tells the
/// proxy to keep whatever state it already stores, the second explicitly
/// erases it.
#[derive(Debug, Default)]
pub enum StateChange {
    /// Keep the previously stored state.
    #[default]
    Unchanged,
    /// Explicitly erase the stored state.
    Clear,
    /// Replace the stored state with a new message.
    New(Box<dyn AnyMessage>),
}

/// The result of one action invocation: state change, reply payload, and
/// optionally a workflow continuation for the proxy to run next.
///
/// Built fluently and consumed by the dispatcher:
///
/// ```ignore
/// Ok(Value::new()
///     .state(next.clone())
///     .response(next)
///     .checkpoint())
/// ```
#[derive(Debug, Default)]
pub struct Value {
    state: StateChange,
    response: Option<Box<dyn AnyMessage>>,
    broadcast: Option<(String, Option<Box<dyn AnyMessage>>)>,
    routing: Option<proto::protocol::workflow::Routing>,
    checkpoint: bool,
}

impl Value {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for the common "new state + reply" result.
    pub fn of<S, R>(state: S, response: R) -> Self
    where
        S: AnyMessage,
        R: AnyMessage,
    {
        Self::new().state(state).response(response)
    }

    /// Replace the actor's stored state.
    pub fn state<M: AnyMessage>(mut self, state: M) -> Self {
        self.state = StateChange::New(Box::new(state));
        self
    }

    /// Explicitly erase the actor's stored state. Not the same as leaving
    /// the state untouched.
    pub fn clear_state(mut self) -> Self {
        self.state = StateChange::Clear;
        self
    }

    /// Set the reply payload.
    pub fn response<M: AnyMessage>(mut self, response: M) -> Self {
        self.response = Some(Box::new(response));
        self
    }

    /// Broadcast a payload to a channel group after this invocation.
    pub fn broadcast<M: AnyMessage>(mut self, channel_group: &str, payload: Option<M>) -> Self {
        self.broadcast = Some((
            channel_group.to_string(),
            payload.map(|p| Box::new(p) as Box<dyn AnyMessage>),
        ));
        self
    }

    /// Pipe the reply payload into another actor's action.
    pub fn pipe_to(mut self, actor: &str, action: &str) -> Self {
        self.routing = Some(proto::protocol::workflow::Routing::Pipe(proto::Pipe {
            actor: actor.to_string(),
            action_name: action.to_string(),
        }));
        self
    }

    /// Forward the original request payload into another actor's action.
    pub fn forward_to(mut self, actor: &str, action: &str) -> Self {
        self.routing = Some(proto::protocol::workflow::Routing::Forward(proto::Forward {
            actor: actor.to_string(),
            action_name: action.to_string(),
        }));
        self
    }

    /// Hint the proxy to persist the new state immediately.
    pub fn checkpoint(mut self) -> Self {
        self.checkpoint = true;
        self
    }

    pub fn state_change(&self) -> &StateChange {
        &self.state
    }

    pub fn response_message(&self) -> Option<&dyn AnyMessage> {
        self.response.as_deref()
    }

    pub fn is_checkpoint(&self) -> bool {
        self.checkpoint
    }

    /// Serialize the workflow continuation, if any part of one was set.
    pub(crate) fn workflow(&self) -> Option<proto::Workflow> {
        if self.broadcast.is_none() && self.routing.is_none() {
            return None;
        }

        let broadcast = self.broadcast.as_ref().map(|(channel, payload)| {
            let payload = match payload {
                Some(message) => proto::protocol::broadcast::Payload::Value(codec::to_any(
                    message.as_ref(),
                )),
                None => proto::protocol::broadcast::Payload::Noop(proto::Noop {}),
            };
            proto::Broadcast {
                channel_group: channel.clone(),
                payload: Some(payload),
            }
        });

        Some(proto::Workflow {
            effects: Vec::new(),
            broadcast,
            routing: self.routing.clone(),
        })
    }
}
