// actor/definition.rs - Actor Definition and Action Table

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

use crate::actor::context::ActorContext;
use crate::actor::value::Value;
use crate::codec::AnyMessage;
use crate::proto;

/// Errors an action handler may surface. Converted into an error-shaped
/// response envelope by the dispatcher, never into a transport failure.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("action failed: {0}")]
    Failed(String),

    #[error(transparent)]
    Codec(#[from] crate::codec::CodecError),
}

impl From<String> for ActionError {
    fn from(message: String) -> Self {
        ActionError::Failed(message)
    }
}

impl From<&str> for ActionError {
    fn from(message: &str) -> Self {
        ActionError::Failed(message.to_string())
    }
}

/// A named operation on an actor: (context, decoded request) -> Value.
pub type ActionHandler =
    Arc<dyn Fn(&ActorContext, Option<&dyn AnyMessage>) -> Result<Value, ActionError> + Send + Sync>;

/// The lifecycle category of an actor, forwarded to the proxy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Kind {
    #[default]
    Named,
    Unnamed,
    Pooled,
    Task,
    Projection,
}

impl Kind {
    pub(crate) fn to_proto(self) -> proto::Kind {
        match self {
            Kind::Named => proto::Kind::Named,
            Kind::Unnamed => proto::Kind::Unnamed,
            Kind::Pooled => proto::Kind::Pooled,
            Kind::Task => proto::Kind::Task,
            Kind::Projection => proto::Kind::Projection,
        }
    }
}

/// Configuration for building an [`ActorDefinition`].
#[derive(Clone, Debug)]
pub struct ActorConfig {
    /// Actor name, unique within the actor system.
    pub name: String,

    /// Lifecycle category.
    pub kind: Kind,

    /// Whether the proxy persists state for this actor.
    pub stateful: bool,

    /// How often the proxy snapshots state. Zero disables the policy.
    pub snapshot_timeout: Duration,

    /// Idle time before the proxy deactivates the actor. Zero disables.
    pub deactivated_timeout: Duration,

    /// Pool bounds, only meaningful when `kind` is [`Kind::Pooled`].
    pub min_pool_size: i32,
    pub max_pool_size: i32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: Kind::Named,
            stateful: true,
            snapshot_timeout: Duration::from_secs(60),
            deactivated_timeout: Duration::from_secs(120),
            min_pool_size: 0,
            max_pool_size: 0,
        }
    }
}

/// One actor as declared to the proxy: identity, policies and the table of
/// named action handlers.
///
/// Identity and policy fields are fixed at construction. The action table
/// accepts additions after construction; [`add_action`](Self::add_action)
/// takes `&self` and locks internally so handlers can be added while the
/// registry is concurrently read.
pub struct ActorDefinition {
    name: String,
    kind: Kind,
    stateful: bool,
    snapshot_timeout: Duration,
    deactivated_timeout: Duration,
    min_pool_size: i32,
    max_pool_size: i32,
    actions: RwLock<HashMap<String, ActionHandler>>,
}

impl ActorDefinition {
    pub fn new(config: ActorConfig) -> Arc<Self> {
        Arc::new(Self {
            name: config.name,
            kind: config.kind,
            stateful: config.stateful,
            snapshot_timeout: config.snapshot_timeout,
            deactivated_timeout: config.deactivated_timeout,
            min_pool_size: config.min_pool_size,
            max_pool_size: config.max_pool_size,
            actions: RwLock::new(HashMap::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn stateful(&self) -> bool {
        self.stateful
    }

    pub fn snapshot_timeout(&self) -> Duration {
        self.snapshot_timeout
    }

    pub fn deactivated_timeout(&self) -> Duration {
        self.deactivated_timeout
    }

    pub fn pool_bounds(&self) -> (i32, i32) {
        (self.min_pool_size, self.max_pool_size)
    }

    /// Add a named action. Action names are unique per actor; registering
    /// the same name again replaces the earlier handler.
    pub fn add_action<F>(&self, name: &str, handler: F)
    where
        F: Fn(&ActorContext, Option<&dyn AnyMessage>) -> Result<Value, ActionError>
            + Send
            + Sync
            + 'static,
    {
        let mut actions = self.actions.write();
        if actions.insert(name.to_string(), Arc::new(handler)).is_some() {
            debug!(actor = %self.name, action = %name, "replacing action handler");
        }
    }

    /// Look up an action handler by name.
    pub fn action(&self, name: &str) -> Option<ActionHandler> {
        self.actions.read().get(name).cloned()
    }

    /// Names of all declared actions, for the registration catalog.
    pub fn action_names(&self) -> Vec<String> {
        self.actions.read().keys().cloned().collect()
    }
}

impl std::fmt::Debug for ActorDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("stateful", &self.stateful)
            .field("actions", &self.action_names())
            .finish()
    }
}
