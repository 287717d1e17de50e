// system/mod.rs - Actor System Facade
//
//! The actor system: configuration, the registration handshake, the
//! inbound invocation server and the outbound invocation client.
//!
//! A process builds one [`ActorSystem`], registers its actor definitions,
//! and calls [`ActorSystem::start`]. Start binds the actor-host listener,
//! begins serving inbound invocations, then performs the one-shot
//! registration handshake with the proxy; a registration failure tears the
//! server down again and aborts startup.
//!
//! This layer deliberately does not serialize concurrent invocations of
//! the same actor: state travels inside each envelope and per-actor
//! ordering is the proxy's mailbox invariant, not ours.

mod client;
mod registration;
mod server;

pub use client::{InvokeError, InvokeOptions, ProxyClient};

use std::net::SocketAddr;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::actor::{ActorDefinition, ActorRegistry};
use crate::codec::AnyMessage;

/// Errors fatal to system startup.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("no actors registered in the system")]
    EmptyRegistry,

    #[error("failed to register actors, status code: {0}")]
    RegistrationFailed(reqwest::StatusCode),

    #[error("proxy transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode registration response: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("failed to bind actor host listener: {0}")]
    Bind(std::io::Error),

    #[error("invalid system configuration: {0}")]
    Config(#[from] config::ConfigError),
}

/// Network configuration of the system: where the proxy lives and where
/// this process exposes its actor host.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Proxy base URL without port, e.g. `http://127.0.0.1`.
    pub proxy_host: String,

    /// Proxy HTTP port.
    pub proxy_port: u16,

    /// Address the actor host binds to.
    pub expose_address: String,

    /// Port the actor host listens on. Zero picks an ephemeral port.
    pub expose_port: u16,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            proxy_host: "http://127.0.0.1".into(),
            proxy_port: 9001,
            expose_address: "0.0.0.0".into(),
            expose_port: 8090,
        }
    }
}

impl SystemConfig {
    /// Layer `SPAWN_*` environment variables over the defaults, e.g.
    /// `SPAWN_PROXY_PORT=9003 SPAWN_EXPOSE_PORT=8091`.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("SPAWN").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn proxy_base_url(&self) -> String {
        format!("{}:{}", self.proxy_host, self.proxy_port)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.expose_address, self.expose_port)
    }
}

/// One actor system: a named catalog of actors plus the proxy connection.
pub struct ActorSystem {
    name: String,
    config: SystemConfig,
    registry: Arc<ActorRegistry>,
    proxy: ProxyClient,
}

impl ActorSystem {
    pub fn new(name: &str) -> Self {
        Self::with_config(name, SystemConfig::default())
    }

    pub fn with_config(name: &str, config: SystemConfig) -> Self {
        let proxy = ProxyClient::new(config.proxy_base_url());
        Self {
            name: name.to_string(),
            config,
            registry: Arc::new(ActorRegistry::new()),
            proxy,
        }
    }

    /// Set the proxy port.
    pub fn use_proxy_port(mut self, port: u16) -> Self {
        self.config.proxy_port = port;
        self.proxy = ProxyClient::new(self.config.proxy_base_url());
        self
    }

    /// Set the port the actor host listens on.
    pub fn expose_port(mut self, port: u16) -> Self {
        self.config.expose_port = port;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Register an actor definition. Chainable; replaces any earlier
    /// definition with the same name.
    pub fn register_actor(&self, actor: Arc<ActorDefinition>) -> &Self {
        self.registry.register(actor);
        self
    }

    /// Start the system: bind the actor host, serve inbound invocations,
    /// and perform the registration handshake. Requires at least one
    /// registered actor; fails before any network activity otherwise.
    ///
    /// Registration is one-shot and never retried — a failure here tears
    /// the server down and aborts startup.
    pub async fn start(&self) -> Result<SystemHandle, SystemError> {
        if self.registry.is_empty() {
            return Err(SystemError::EmptyRegistry);
        }

        let listener = tokio::net::TcpListener::bind(self.config.listen_addr())
            .await
            .map_err(SystemError::Bind)?;
        let local_addr = listener.local_addr().map_err(SystemError::Bind)?;

        let state = Arc::new(server::ServerState {
            system_name: self.name.clone(),
            registry: Arc::clone(&self.registry),
        });
        let app = server::router(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.await;
            };
            if let Err(err) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!(error = %err, "actor host server failed");
            }
        });
        info!(addr = %local_addr, "actor host listening");

        let registration = registration::build_registration(&self.name, &self.registry);
        match self.proxy.register(&registration).await {
            Ok(response) => {
                if let Some(proxy) = response.proxy_info {
                    let protocol = format!(
                        "{}.{}",
                        proxy.protocol_major_version, proxy.protocol_minor_version
                    );
                    info!(
                        proxy = %proxy.proxy_name,
                        version = %proxy.proxy_version,
                        protocol = %protocol,
                        "actors registered with proxy"
                    );
                } else {
                    info!("actors registered with proxy");
                }
            }
            Err(err) => {
                let _ = shutdown_tx.send(());
                let _ = task.await;
                return Err(err);
            }
        }

        Ok(SystemHandle {
            local_addr,
            shutdown: shutdown_tx,
            task,
        })
    }

    /// Invoke an actor anywhere in the cluster through the proxy.
    /// `None` for `request` sends the explicit no-payload marker.
    pub async fn invoke(
        &self,
        system: &str,
        actor: &str,
        action: &str,
        request: Option<&dyn AnyMessage>,
        options: InvokeOptions,
    ) -> Result<Option<Box<dyn AnyMessage>>, InvokeError> {
        self.proxy.invoke(system, actor, action, request, &options).await
    }
}

/// Handle to a running actor host.
#[derive(Debug)]
pub struct SystemHandle {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SystemHandle {
    /// The address the actor host actually bound.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting new inbound requests, drain in-flight ones, then
    /// return.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        let _ = self.task.await;
        info!("actor host stopped");
    }

    /// Block until the server task terminates on its own.
    pub async fn await_terminated(self) {
        let Self { shutdown, task, .. } = self;
        let _ = task.await;
        drop(shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::Router;
    use axum::routing::post;
    use prost::Message;

    use crate::actor::{ActorConfig, ActorDefinition, Value};
    use crate::proto;
    use crate::testing::{CounterState, IncrementBy, register_test_types};

    fn counter_actor() -> Arc<ActorDefinition> {
        let actor = ActorDefinition::new(ActorConfig {
            name: "Counter".into(),
            ..ActorConfig::default()
        });
        actor.add_action("Increment", |ctx, payload| {
            let current = ctx.state_as::<CounterState>().cloned().unwrap_or_default();
            let by = payload
                .and_then(|p| p.downcast_ref::<IncrementBy>())
                .map(|m| m.by)
                .unwrap_or(1);
            let next = CounterState {
                count: current.count + by,
            };
            Ok(Value::of(next.clone(), next))
        });
        actor
    }

    /// Fake proxy accepting registrations and counting them.
    async fn spawn_fake_proxy(registrations: Arc<AtomicUsize>) -> SocketAddr {
        let app = Router::new().route(
            "/api/v1/system",
            post(move |body: bytes::Bytes| {
                let registrations = Arc::clone(&registrations);
                async move {
                    proto::RegistrationRequest::decode(body.as_ref()).unwrap();
                    registrations.fetch_add(1, Ordering::SeqCst);
                    proto::RegistrationResponse {
                        status: Some(proto::RequestStatus {
                            status: proto::Status::Ok as i32,
                            message: String::new(),
                        }),
                        proxy_info: Some(proto::ProxyInfo {
                            protocol_major_version: 1,
                            protocol_minor_version: 1,
                            proxy_name: "test-proxy".into(),
                            proxy_version: "0.0.0".into(),
                        }),
                    }
                    .encode_to_vec()
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn test_config(proxy_addr: SocketAddr) -> SystemConfig {
        SystemConfig {
            proxy_host: "http://127.0.0.1".into(),
            proxy_port: proxy_addr.port(),
            expose_address: "127.0.0.1".into(),
            expose_port: 0,
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = SystemConfig::default();
        assert_eq!(config.proxy_base_url(), "http://127.0.0.1:9001");
        assert_eq!(config.listen_addr(), "0.0.0.0:8090");
    }

    #[tokio::test]
    async fn test_start_with_empty_registry_fails_before_network() {
        let registrations = Arc::new(AtomicUsize::new(0));
        let proxy_addr = spawn_fake_proxy(Arc::clone(&registrations)).await;

        let system = ActorSystem::with_config("test-system", test_config(proxy_addr));
        let err = system.start().await.unwrap_err();

        assert!(matches!(err, SystemError::EmptyRegistry));
        assert_eq!(registrations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_start_registers_and_serves() {
        register_test_types();
        let registrations = Arc::new(AtomicUsize::new(0));
        let proxy_addr = spawn_fake_proxy(Arc::clone(&registrations)).await;

        let system = ActorSystem::with_config("test-system", test_config(proxy_addr));
        system.register_actor(counter_actor());

        let handle = system.start().await.unwrap();
        assert_eq!(registrations.load(Ordering::SeqCst), 1);

        // Drive one invocation through the real HTTP surface.
        let invocation = proto::ActorInvocation {
            actor: Some(proto::ActorId {
                name: "Counter".into(),
                system: "test-system".into(),
                parent: String::new(),
            }),
            action_name: "Increment".into(),
            current_context: Some(proto::Context {
                state: Some(crate::codec::to_any(&CounterState { count: 5 })),
                ..Default::default()
            }),
            payload: Some(proto::protocol::actor_invocation::Payload::Value(
                crate::codec::to_any(&IncrementBy { by: 3 }),
            )),
            caller: None,
        };

        let url = format!("http://{}/api/v1/actors/actions", handle.local_addr());
        let response = reqwest::Client::new()
            .post(&url)
            .body(invocation.encode_to_vec())
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());

        let body = response.bytes().await.unwrap();
        let envelope = proto::ActorInvocationResponse::decode(body.as_ref()).unwrap();
        assert_eq!(envelope.actor_name, "Counter");

        let updated = envelope.updated_context.unwrap().state.unwrap();
        let state = crate::codec::decode_any(&updated).unwrap();
        assert_eq!(
            state.downcast_ref::<CounterState>(),
            Some(&CounterState { count: 8 })
        );

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_registration_failure_aborts_startup() {
        // Proxy that rejects every registration.
        let app = Router::new().route(
            "/api/v1/system",
            post(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, Vec::<u8>::new()) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let proxy_addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let system = ActorSystem::with_config("test-system", test_config(proxy_addr));
        system.register_actor(counter_actor());

        let err = system.start().await.unwrap_err();
        assert!(matches!(
            err,
            SystemError::RegistrationFailed(status) if status.as_u16() == 500
        ));
    }
}
