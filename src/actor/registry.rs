// actor/registry.rs - Actor Name Registry

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::actor::ActorDefinition;

/// In-memory catalog of actor definitions, keyed by name.
///
/// One lock guards the map: reads (every dispatch) run concurrently,
/// writes (setup-time registration) are exclusive. Registration from
/// multiple setup tasks is safe; the dispatch path never writes.
#[derive(Default)]
pub struct ActorRegistry {
    actors: RwLock<HashMap<String, Arc<ActorDefinition>>>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self {
            actors: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace an actor by name.
    pub fn register(&self, actor: Arc<ActorDefinition>) {
        debug!(actor = %actor.name(), "registering actor");
        self.actors.write().insert(actor.name().to_string(), actor);
    }

    /// Look up an actor definition by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<ActorDefinition>> {
        self.actors.read().get(name).cloned()
    }

    /// Snapshot of all registered definitions, for the registration
    /// catalog. No ordering guarantee.
    pub fn all(&self) -> Vec<Arc<ActorDefinition>> {
        self.actors.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.actors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorConfig, ActorDefinition};

    fn named(name: &str) -> Arc<ActorDefinition> {
        ActorDefinition::new(ActorConfig {
            name: name.into(),
            ..ActorConfig::default()
        })
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ActorRegistry::new();
        assert!(registry.is_empty());

        registry.register(named("Counter"));
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("Counter").is_some());
        assert!(registry.lookup("Missing").is_none());
    }

    #[test]
    fn test_register_replaces_by_name() {
        let registry = ActorRegistry::new();

        let first = named("Counter");
        first.add_action("Old", |_, _| Ok(crate::Value::new()));
        registry.register(first);

        registry.register(named("Counter"));
        assert_eq!(registry.len(), 1);

        let current = registry.lookup("Counter").unwrap();
        assert!(current.action("Old").is_none());
    }

    #[test]
    fn test_concurrent_registration() {
        let registry = Arc::new(ActorRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry.register(named(&format!("Actor-{i}")));
                    assert!(registry.lookup(&format!("Actor-{i}")).is_some());
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.len(), 8);
    }
}
