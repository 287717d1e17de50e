// system/client.rs - Outbound Proxy Client

use std::collections::HashMap;
use std::time::Duration;

use prost::Message;
use reqwest::header;
use thiserror::Error;
use tracing::debug;

use crate::codec::{self, AnyMessage, CodecError};
use crate::proto;
use crate::proto::protocol::{invocation_request, invocation_response};
use crate::system::SystemError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const OCTET_STREAM: &str = "application/octet-stream";
const USER_AGENT: &str = concat!("spawn-rust-sdk/", env!("CARGO_PKG_VERSION"));

/// Errors surfaced to callers of the outbound invocation path.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("proxy transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("actor invocation failed, status code: {0}")]
    ProxyStatus(reqwest::StatusCode),

    #[error("actor invocation failed: {status:?}: {message}")]
    Request {
        status: proto::Status,
        message: String,
    },

    #[error("failed to decode invocation response: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Options recognized by [`ProxyClient::invoke`]. Sparse by design: the
/// default is a synchronous call with no spawning and no metadata.
#[derive(Clone, Debug, Default)]
pub struct InvokeOptions {
    /// Spawn the target under this parent actor and register the ref
    /// under the invoked name.
    pub parent: Option<String>,

    /// Fire-and-forget: the proxy acknowledges without a meaningful
    /// reply payload.
    pub async_invoke: bool,

    /// String tags attached to the request.
    pub metadata: HashMap<String, String>,
}

/// HTTP client for the proxy's registration and invocation endpoints.
///
/// One pooled connection set shared across all calls. No retries and no
/// backoff: registration is deliberately fail-fast, and invocation retries
/// without idempotency information would duplicate actor side effects.
/// Callers needing bounded latency wrap calls in `tokio::time::timeout`.
pub struct ProxyClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: String) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { http, base_url }
    }

    /// One-shot registration handshake. Any non-success transport status
    /// is fatal to startup.
    pub(crate) async fn register(
        &self,
        request: &proto::RegistrationRequest,
    ) -> Result<proto::RegistrationResponse, SystemError> {
        let url = format!("{}/api/v1/system", self.base_url);
        debug!(url = %url, "posting registration");

        let response = self
            .http
            .post(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::CONTENT_TYPE, OCTET_STREAM)
            .header(header::ACCEPT, OCTET_STREAM)
            .body(request.encode_to_vec())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SystemError::RegistrationFailed(response.status()));
        }

        let body = response.bytes().await?;
        Ok(proto::RegistrationResponse::decode(body.as_ref())?)
    }

    /// Invoke an actor through the proxy and decode its reply.
    pub async fn invoke(
        &self,
        system: &str,
        actor_name: &str,
        action: &str,
        request: Option<&dyn AnyMessage>,
        options: &InvokeOptions,
    ) -> Result<Option<Box<dyn AnyMessage>>, InvokeError> {
        let mut actor_id = proto::ActorId {
            name: actor_name.to_string(),
            system: system.to_string(),
            parent: String::new(),
        };
        let mut register_ref = String::new();
        if let Some(parent) = &options.parent {
            actor_id.parent = parent.clone();
            register_ref = actor_name.to_string();
        }

        let payload = match request {
            Some(message) => invocation_request::Payload::Value(codec::to_any(message)),
            None => invocation_request::Payload::Noop(proto::Noop {}),
        };

        let invocation = proto::InvocationRequest {
            system: Some(proto::ActorSystem {
                name: system.to_string(),
                registry: None,
            }),
            actor: Some(proto::Actor {
                id: Some(actor_id),
                ..Default::default()
            }),
            action_name: action.to_string(),
            payload: Some(payload),
            r#async: options.async_invoke,
            caller: None,
            metadata: options.metadata.clone(),
            scheduled_to: 0,
            pooled: false,
            register_ref,
        };

        let url = format!(
            "{}/api/v1/system/{}/actors/{}/invoke",
            self.base_url, system, actor_name
        );
        debug!(actor = %actor_name, action = %action, fire_and_forget = options.async_invoke,
            "invoking actor");

        let response = self
            .http
            .post(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::CONTENT_TYPE, OCTET_STREAM)
            .header(header::ACCEPT, OCTET_STREAM)
            .body(invocation.encode_to_vec())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(InvokeError::ProxyStatus(response.status()));
        }

        let body = response.bytes().await?;
        let reply = proto::InvocationResponse::decode(body.as_ref())?;

        let status = reply.status.unwrap_or_default();
        if status.status() != proto::Status::Ok {
            return Err(InvokeError::Request {
                status: status.status(),
                message: status.message,
            });
        }

        // fire-and-forget: the acknowledgement carries nothing worth decoding
        if options.async_invoke {
            return Ok(None);
        }

        match reply.payload {
            Some(invocation_response::Payload::Value(any)) => Ok(Some(codec::decode_any(&any)?)),
            Some(invocation_response::Payload::Noop(_)) | None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::Router;
    use axum::routing::post;
    use bytes::Bytes;

    use crate::testing::{CounterState, IncrementBy, register_test_types};

    async fn spawn_proxy(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn ok_response(payload: Option<prost_types::Any>) -> Vec<u8> {
        proto::InvocationResponse {
            status: Some(proto::RequestStatus {
                status: proto::Status::Ok as i32,
                message: String::new(),
            }),
            system: None,
            actor: None,
            payload: Some(match payload {
                Some(any) => invocation_response::Payload::Value(any),
                None => invocation_response::Payload::Noop(proto::Noop {}),
            }),
        }
        .encode_to_vec()
    }

    #[tokio::test]
    async fn test_invoke_decodes_reply() {
        register_test_types();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_seen = Arc::clone(&calls);

        let app = Router::new().route(
            "/api/v1/system/{system}/actors/{actor}/invoke",
            post(move |body: Bytes| {
                let calls = Arc::clone(&calls_seen);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    let request = proto::InvocationRequest::decode(body.as_ref()).unwrap();
                    assert_eq!(request.action_name, "Increment");
                    assert!(matches!(
                        request.payload,
                        Some(invocation_request::Payload::Value(_))
                    ));
                    ok_response(Some(codec::to_any(&CounterState { count: 8 })))
                }
            }),
        );
        let addr = spawn_proxy(app).await;

        let client = ProxyClient::new(format!("http://{addr}"));
        let reply = client
            .invoke(
                "sys",
                "Counter",
                "Increment",
                Some(&IncrementBy { by: 3 }),
                &InvokeOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            reply.unwrap().downcast_ref::<CounterState>(),
            Some(&CounterState { count: 8 })
        );
    }

    #[tokio::test]
    async fn test_invoke_without_request_sends_noop_marker() {
        register_test_types();
        let app = Router::new().route(
            "/api/v1/system/{system}/actors/{actor}/invoke",
            post(|body: Bytes| async move {
                let request = proto::InvocationRequest::decode(body.as_ref()).unwrap();
                assert!(matches!(
                    request.payload,
                    Some(invocation_request::Payload::Noop(_))
                ));
                ok_response(None)
            }),
        );
        let addr = spawn_proxy(app).await;

        let client = ProxyClient::new(format!("http://{addr}"));
        let reply = client
            .invoke("sys", "Counter", "Get", None, &InvokeOptions::default())
            .await
            .unwrap();
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_async_invoke_performs_exactly_one_call() {
        register_test_types();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_seen = Arc::clone(&calls);

        let app = Router::new().route(
            "/api/v1/system/{system}/actors/{actor}/invoke",
            post(move |body: Bytes| {
                let calls = Arc::clone(&calls_seen);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    let request = proto::InvocationRequest::decode(body.as_ref()).unwrap();
                    assert!(request.r#async);
                    ok_response(None)
                }
            }),
        );
        let addr = spawn_proxy(app).await;

        let client = ProxyClient::new(format!("http://{addr}"));
        let options = InvokeOptions {
            async_invoke: true,
            ..InvokeOptions::default()
        };
        let reply = client
            .invoke(
                "sys",
                "Counter",
                "Increment",
                Some(&IncrementBy { by: 1 }),
                &options,
            )
            .await
            .unwrap();

        assert!(reply.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_parent_option_spawns_and_registers_ref() {
        register_test_types();
        let app = Router::new().route(
            "/api/v1/system/{system}/actors/{actor}/invoke",
            post(|body: Bytes| async move {
                let request = proto::InvocationRequest::decode(body.as_ref()).unwrap();
                let id = request.actor.unwrap().id.unwrap();
                assert_eq!(id.parent, "UserActor");
                assert_eq!(request.register_ref, "user-1");
                ok_response(None)
            }),
        );
        let addr = spawn_proxy(app).await;

        let client = ProxyClient::new(format!("http://{addr}"));
        let options = InvokeOptions {
            parent: Some("UserActor".into()),
            ..InvokeOptions::default()
        };
        client
            .invoke("sys", "user-1", "Init", None, &options)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_request_status_error_is_surfaced() {
        let app = Router::new().route(
            "/api/v1/system/{system}/actors/{actor}/invoke",
            post(|| async {
                proto::InvocationResponse {
                    status: Some(proto::RequestStatus {
                        status: proto::Status::ActorNotFound as i32,
                        message: "actor Counter not found".into(),
                    }),
                    ..Default::default()
                }
                .encode_to_vec()
            }),
        );
        let addr = spawn_proxy(app).await;

        let client = ProxyClient::new(format!("http://{addr}"));
        let err = client
            .invoke("sys", "Counter", "Get", None, &InvokeOptions::default())
            .await
            .unwrap_err();

        match err {
            InvokeError::Request { status, message } => {
                assert_eq!(status, proto::Status::ActorNotFound);
                assert_eq!(message, "actor Counter not found");
            }
            other => panic!("expected request error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unregistered_reply_type_fails_closed() {
        register_test_types();
        let app = Router::new().route(
            "/api/v1/system/{system}/actors/{actor}/invoke",
            post(|| async {
                ok_response(Some(prost_types::Any {
                    type_url: "type.googleapis.com/example.NotRegistered".into(),
                    value: vec![],
                }))
            }),
        );
        let addr = spawn_proxy(app).await;

        let client = ProxyClient::new(format!("http://{addr}"));
        let err = client
            .invoke("sys", "Counter", "Get", None, &InvokeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::Codec(CodecError::UnknownType(_))));
    }

    #[tokio::test]
    async fn test_non_success_transport_status() {
        let app = Router::new().route(
            "/api/v1/system/{system}/actors/{actor}/invoke",
            post(|| async { (axum::http::StatusCode::BAD_GATEWAY, Vec::<u8>::new()) }),
        );
        let addr = spawn_proxy(app).await;

        let client = ProxyClient::new(format!("http://{addr}"));
        let err = client
            .invoke("sys", "Counter", "Get", None, &InvokeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InvokeError::ProxyStatus(status) if status.as_u16() == 502
        ));
    }
}
