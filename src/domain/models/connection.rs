use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::domain::models::EntityType;
use crate::domain::ports::{Backend, ConnectError};

/// Open link to a data store.
///
/// Cheap to clone; all clones share one backend. The hosting container owns
/// the handle once provisioned and closes it at shutdown unless
/// `keep_connection_alive` was set.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

struct ConnectionInner {
    name: String,
    entities: Vec<EntityType>,
    backend: Arc<dyn Backend>,
    closed: AtomicBool,
}

impl Connection {
    /// Connection over an already-opened backend
    pub fn new(
        name: impl Into<String>,
        entities: Vec<EntityType>,
        backend: Arc<dyn Backend>,
    ) -> Self {
        Self {
            inner: Arc::new(ConnectionInner {
                name: name.into(),
                entities,
                backend,
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Effective connection name
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Entity types this connection was provisioned with
    pub fn entities(&self) -> &[EntityType] {
        &self.inner.entities
    }

    /// Whether the connection still accepts work
    pub fn is_open(&self) -> bool {
        !self.inner.closed.load(Ordering::SeqCst) && self.inner.backend.is_open()
    }

    /// Entity-agnostic data-access projection; shares this connection's
    /// lifetime and is never provisioned independently
    pub fn manager(&self) -> Manager {
        Manager {
            connection: self.clone(),
        }
    }

    /// Per-entity accessor scoped to this connection
    pub fn accessor(&self, entity: &EntityType) -> EntityAccessor {
        EntityAccessor {
            connection: self.clone(),
            entity: entity.clone(),
        }
    }

    /// Close the underlying backend. Idempotent: only the first call reaches
    /// the backend.
    pub async fn close(&self) -> Result<(), ConnectError> {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        debug!(connection = %self.inner.name, "closing connection");
        self.inner.backend.close().await
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("name", &self.inner.name)
            .field("entities", &self.inner.entities)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Projection of a connection exposing generic data-access operations,
/// independent of any entity type
#[derive(Clone, Debug)]
pub struct Manager {
    connection: Connection,
}

impl Manager {
    /// The connection this manager projects
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Name of the underlying connection
    pub fn name(&self) -> &str {
        self.connection.name()
    }
}

/// Per-entity data-access object scoped to one connection
#[derive(Clone, Debug)]
pub struct EntityAccessor {
    connection: Connection,
    entity: EntityType,
}

impl EntityAccessor {
    /// The connection this accessor is scoped to
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// The entity this accessor serves
    pub fn entity(&self) -> &EntityType {
        &self.entity
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU32;

    use async_trait::async_trait;

    use super::*;

    struct User;

    struct CountingBackend {
        closes: AtomicU32,
    }

    impl CountingBackend {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                closes: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl Backend for CountingBackend {
        fn is_open(&self) -> bool {
            self.closes.load(Ordering::SeqCst) == 0
        }

        async fn close(&self) -> Result<(), ConnectError> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn close_reaches_the_backend_once() {
        let backend = CountingBackend::new();
        let connection = Connection::new("default", vec![], backend.clone());

        assert!(connection.is_open());
        connection.close().await.unwrap();
        connection.close().await.unwrap();

        assert!(!connection.is_open());
        assert_eq!(backend.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn projections_share_the_connection() {
        let backend = CountingBackend::new();
        let user = EntityType::of::<User>();
        let connection = Connection::new("orders", vec![user.clone()], backend);

        let manager = connection.manager();
        assert_eq!(manager.name(), "orders");

        let accessor = connection.accessor(&user);
        assert_eq!(accessor.entity().name(), "User");

        connection.close().await.unwrap();
        assert!(!manager.connection().is_open());
        assert!(!accessor.connection().is_open());
    }
}
