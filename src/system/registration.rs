// system/registration.rs - Registration Catalog

use std::time::Duration;

use crate::actor::{ActorDefinition, ActorRegistry, Kind};
use crate::proto;
use crate::proto::actors::{actor_deactivation_strategy, actor_snapshot_strategy};

const SDK_NAME: &str = "spawn-rust-sdk";
const PROTOCOL_MAJOR_VERSION: i32 = 1;
const PROTOCOL_MINOR_VERSION: i32 = 1;

/// Identify this SDK to the proxy.
pub(crate) fn service_info() -> proto::ServiceInfo {
    proto::ServiceInfo {
        service_name: SDK_NAME.into(),
        service_version: env!("CARGO_PKG_VERSION").into(),
        service_runtime: concat!("rust-", env!("CARGO_PKG_RUST_VERSION")).into(),
        support_library_name: SDK_NAME.into(),
        support_library_version: env!("CARGO_PKG_VERSION").into(),
        protocol_major_version: PROTOCOL_MAJOR_VERSION,
        protocol_minor_version: PROTOCOL_MINOR_VERSION,
    }
}

/// Materialize the full registration request: service metadata plus the
/// whole actor catalog, sent to the proxy as one atomic payload.
pub(crate) fn build_registration(
    system: &str,
    registry: &ActorRegistry,
) -> proto::RegistrationRequest {
    let actors = registry
        .all()
        .into_iter()
        .map(|def| (def.name().to_string(), wire_actor(system, &def)))
        .collect();

    proto::RegistrationRequest {
        service_info: Some(service_info()),
        actor_system: Some(proto::ActorSystem {
            name: system.to_string(),
            registry: Some(proto::Registry { actors }),
        }),
    }
}

/// One actor definition as a wire-level descriptor.
fn wire_actor(system: &str, def: &ActorDefinition) -> proto::Actor {
    let actions = def
        .action_names()
        .into_iter()
        .map(|name| proto::Action { name })
        .collect();

    let snapshot_strategy = timeout_strategy(def.snapshot_timeout()).map(|timeout| {
        proto::ActorSnapshotStrategy {
            strategy: Some(actor_snapshot_strategy::Strategy::Timeout(timeout)),
        }
    });
    let deactivation_strategy = timeout_strategy(def.deactivated_timeout()).map(|timeout| {
        proto::ActorDeactivationStrategy {
            strategy: Some(actor_deactivation_strategy::Strategy::Timeout(timeout)),
        }
    });

    let mut settings = proto::ActorSettings {
        kind: def.kind().to_proto() as i32,
        stateful: def.stateful(),
        snapshot_strategy,
        deactivation_strategy,
        min_pool_size: 0,
        max_pool_size: 0,
    };
    if def.kind() == Kind::Pooled {
        let (min, max) = def.pool_bounds();
        settings.min_pool_size = min;
        settings.max_pool_size = max;
    }

    proto::Actor {
        id: Some(proto::ActorId {
            name: def.name().to_string(),
            system: system.to_string(),
            parent: String::new(),
        }),
        state: Some(proto::ActorState::default()),
        settings: Some(settings),
        actions,
        timer_actions: Vec::new(),
        metadata: Some(proto::Metadata::default()),
    }
}

/// Zero disables the policy; the proxy expects milliseconds.
fn timeout_strategy(duration: Duration) -> Option<proto::TimeoutStrategy> {
    (!duration.is_zero()).then(|| proto::TimeoutStrategy {
        timeout: duration.as_millis() as i64,
    })
}
