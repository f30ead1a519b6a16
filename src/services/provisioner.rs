use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, info};

use crate::adapters::sqlite;
use crate::domain::models::{
    ConnectOptions, Connection, ConnectionFactory, ConnectionId,
};
use crate::domain::ports::{Clock, ConnectError, ProvisionError, TokioClock};
use crate::services::{EntityRegistry, RetryPolicy};

/// Orchestrates connection establishment: entity resolution, factory
/// invocation, retry.
///
/// Cheap to clone; clones share the registry, clock, and factory.
#[derive(Clone)]
pub struct Provisioner {
    registry: Arc<EntityRegistry>,
    clock: Arc<dyn Clock>,
    factory: ConnectionFactory,
}

impl Provisioner {
    /// Provisioner over the given registry with the default build-then-open
    /// `SQLite` factory
    pub fn new(registry: Arc<EntityRegistry>) -> Self {
        Self {
            registry,
            clock: Arc::new(TokioClock),
            factory: default_factory(),
        }
    }

    /// Substitute the connection factory (connection reuse, mocking)
    pub fn with_factory(mut self, factory: ConnectionFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Substitute the retry clock (deterministic tests)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Establish a ready connection.
    ///
    /// With `auto_load_entities`, the factory receives explicit entities first
    /// and registry-discovered ones appended, without de-duplication across
    /// that boundary: downstream schema generation may be sensitive to entity
    /// order and duplication, so the concatenation is handed over untouched.
    /// Fails only after the retry budget is spent or the retry predicate
    /// rejects a failure; no partial connection is ever returned.
    pub async fn provision(&self, options: &ConnectOptions) -> Result<Connection, ProvisionError> {
        let connection_name = ConnectionId::Config(options).resolved_name().to_string();

        let mut effective = options.clone();
        if effective.auto_load_entities {
            let discovered = self
                .registry
                .entities_for(ConnectionId::Name(&connection_name));
            effective.entities.extend(discovered);
        }

        debug!(
            connection = %connection_name,
            entities = effective.entities.len(),
            "provisioning connection"
        );

        let policy = RetryPolicy::from_options(options);
        let factory = Arc::clone(&self.factory);
        let connection = policy
            .execute(|| factory(effective.clone()), self.clock.as_ref())
            .await?;

        info!(connection = %connection_name, "connection established");
        Ok(connection)
    }
}

/// Default factory: build a `SQLite` pool descriptor from the options, then
/// open it
pub fn default_factory() -> ConnectionFactory {
    Arc::new(|options: ConnectOptions| {
        Box::pin(async move {
            let backend = sqlite::open(&options).await?;
            let name = ConnectionId::Config(&options).resolved_name().to_string();
            Ok(Connection::new(name, options.entities, Arc::new(backend)))
        }) as BoxFuture<'static, Result<Connection, ConnectError>>
    })
}
