// system/server.rs - Inbound Invocation Server

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use bytes::Bytes;
use prost::Message;
use tracing::{debug, error, warn};

use crate::actor::{ActorContext, ActorRegistry, StateChange};
use crate::codec;
use crate::proto;
use crate::proto::protocol::{actor_invocation, actor_invocation_response};

/// Shared state of the actor host: read-only on the request path.
pub(crate) struct ServerState {
    pub system_name: String,
    pub registry: Arc<ActorRegistry>,
}

pub(crate) fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/v1/actors/actions", post(handle_invocation))
        .with_state(state)
}

/// One inbound invocation: Received -> Decoded -> Dispatched -> Responded.
///
/// Once the envelope parses, the transport status is always 200 — business
/// failures travel inside the response envelope. Only an unparseable body
/// is a transport-level 400.
async fn handle_invocation(State(state): State<Arc<ServerState>>, body: Bytes) -> Response {
    let invocation = match proto::ActorInvocation::decode(body.as_ref()) {
        Ok(invocation) => invocation,
        Err(err) => {
            warn!(error = %err, "received unparseable invocation envelope");
            return (
                StatusCode::BAD_REQUEST,
                format!("malformed invocation envelope: {err}"),
            )
                .into_response();
        }
    };

    let envelope = dispatch(&state, invocation);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/octet-stream")],
        envelope.encode_to_vec(),
    )
        .into_response()
}

/// Resolve the target actor and action, decode state and payload, run the
/// handler, and build the response envelope. Every failure short of a
/// malformed transport body becomes an error-shaped envelope carrying the
/// actor and system identity and nothing else.
pub(crate) fn dispatch(
    state: &ServerState,
    invocation: proto::ActorInvocation,
) -> proto::ActorInvocationResponse {
    let actor_name = invocation
        .actor
        .as_ref()
        .map(|id| id.name.clone())
        .unwrap_or_default();
    let action_name = invocation.action_name.clone();

    debug!(actor = %actor_name, action = %action_name, "dispatching invocation");

    let request = match codec::decode_optional(request_payload(&invocation)) {
        Ok(request) => request,
        Err(err) => {
            warn!(actor = %actor_name, action = %action_name, error = %err,
                "failed to decode request payload");
            return error_envelope(&actor_name, &state.system_name);
        }
    };

    let Some(actor) = state.registry.lookup(&actor_name) else {
        warn!(actor = %actor_name, "actor not found");
        return error_envelope(&actor_name, &state.system_name);
    };

    let Some(handler) = actor.action(&action_name) else {
        warn!(actor = %actor_name, action = %action_name, "action not found");
        return error_envelope(&actor_name, &state.system_name);
    };

    let context = invocation.current_context.unwrap_or_default();
    // Kept aside untouched so an unchanged result echoes the exact bytes.
    let original_state = context.state.clone();

    let current_state = match codec::decode_optional(context.state.as_ref()) {
        Ok(state) => state,
        Err(err) => {
            warn!(actor = %actor_name, error = %err, "failed to decode actor state");
            return error_envelope(&actor_name, &state.system_name);
        }
    };

    let ctx = ActorContext::new(
        current_state,
        context.caller.clone().or(invocation.caller),
        context.self_.clone(),
        context.metadata,
        context.tags,
    );

    let value = match handler(&ctx, request.as_deref()) {
        Ok(value) => value,
        Err(err) => {
            error!(actor = %actor_name, action = %action_name, error = %err,
                "action handler failed");
            return error_envelope(&actor_name, &state.system_name);
        }
    };

    let updated_state = match value.state_change() {
        StateChange::Unchanged => original_state,
        StateChange::Clear => None,
        StateChange::New(message) => Some(codec::to_any(message.as_ref())),
    };

    let payload = match value.response_message() {
        Some(message) => actor_invocation_response::Payload::Value(codec::to_any(message)),
        None => actor_invocation_response::Payload::Noop(proto::Noop {}),
    };

    proto::ActorInvocationResponse {
        actor_name,
        actor_system: state.system_name.clone(),
        updated_context: Some(proto::Context {
            state: updated_state,
            ..Default::default()
        }),
        payload: Some(payload),
        workflow: value.workflow(),
        checkpoint: value.is_checkpoint(),
    }
}

fn request_payload(invocation: &proto::ActorInvocation) -> Option<&prost_types::Any> {
    match &invocation.payload {
        Some(actor_invocation::Payload::Value(any)) => Some(any),
        // explicit noop or absent field: the valid "no payload" path
        Some(actor_invocation::Payload::Noop(_)) | None => None,
    }
}

fn error_envelope(actor: &str, system: &str) -> proto::ActorInvocationResponse {
    proto::ActorInvocationResponse {
        actor_name: actor.to_string(),
        actor_system: system.to_string(),
        ..Default::default()
    }
}
