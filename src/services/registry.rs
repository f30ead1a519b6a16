use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::domain::models::{ConnectionId, EntityType};

/// Accumulates entity types per connection name as feature modules compose.
///
/// Owned by the composition root and shared via `Arc` rather than living in a
/// process global, so tests can reset it by building a fresh one. Entries grow
/// monotonically and are never pruned. Registration must finish before the
/// first provisioning call for a given name; that ordering is a bootstrap
/// contract, not something the registry enforces.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entries: RwLock<HashMap<String, Vec<EntityType>>>,
}

impl EntityRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append entities for the identified connection, preserving insertion
    /// order and skipping entities already present (identity is the entity's
    /// type). A no-op when the identifier carries no usable name.
    pub fn register(&self, id: ConnectionId<'_>, entities: &[EntityType]) {
        let Some(name) = id.raw_name() else {
            return;
        };
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let collection = entries.entry(name.to_string()).or_default();
        for entity in entities {
            if !collection.contains(entity) {
                collection.push(entity.clone());
            }
        }
    }

    /// Entities accumulated for the identified connection, in insertion
    /// order. Empty when the name is unresolved or has no entries.
    pub fn entities_for(&self, id: ConnectionId<'_>) -> Vec<EntityType> {
        let Some(name) = id.raw_name() else {
            return Vec::new();
        };
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ConnectOptions;

    struct User;
    struct Order;

    #[test]
    fn duplicate_registration_is_idempotent() {
        let registry = EntityRegistry::new();
        let user = EntityType::of::<User>();

        registry.register(ConnectionId::Name("default"), &[user.clone()]);
        registry.register(ConnectionId::Name("default"), &[user.clone()]);

        assert_eq!(registry.entities_for(ConnectionId::Name("default")), vec![user]);
    }

    #[test]
    fn names_accumulate_independently() {
        let registry = EntityRegistry::new();
        let user = EntityType::of::<User>();

        registry.register(ConnectionId::Name("orders"), &[user.clone()]);
        registry.register(ConnectionId::Name("analytics"), &[user.clone()]);

        assert_eq!(registry.entities_for(ConnectionId::Name("orders")).len(), 1);
        assert_eq!(registry.entities_for(ConnectionId::Name("analytics")).len(), 1);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let registry = EntityRegistry::new();
        let user = EntityType::of::<User>();
        let order = EntityType::of::<Order>();

        registry.register(ConnectionId::Name("default"), &[order.clone(), user.clone()]);
        registry.register(ConnectionId::Name("default"), &[user.clone()]);

        assert_eq!(
            registry.entities_for(ConnectionId::Name("default")),
            vec![order, user]
        );
    }

    #[test]
    fn unknown_name_yields_empty_not_error() {
        let registry = EntityRegistry::new();
        assert!(registry.entities_for(ConnectionId::Name("nowhere")).is_empty());
    }

    #[test]
    fn unnamed_config_registration_is_a_no_op() {
        let registry = EntityRegistry::new();
        let options = ConnectOptions::default();
        let user = EntityType::of::<User>();

        registry.register(ConnectionId::Config(&options), &[user]);

        assert!(registry.entities_for(ConnectionId::Name("default")).is_empty());
    }
}
