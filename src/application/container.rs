use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};

use futures::future::BoxFuture;

use crate::domain::models::{ConnectOptions, Connection, EntityAccessor, Manager, Token};
use crate::domain::ports::ProvisionError;
use std::sync::Arc;

/// Object kinds the engine provides to its container
#[derive(Clone, Debug)]
pub enum Instance {
    /// Live connection handle
    Connection(Connection),
    /// Manager projection of a connection
    Manager(Manager),
    /// Per-entity accessor
    Accessor(EntityAccessor),
    /// Resolved connection options
    Options(ConnectOptions),
    /// Opaque marker value (module build identifiers)
    Marker(String),
}

impl Instance {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::Manager(_) => "manager",
            Self::Accessor(_) => "accessor",
            Self::Options(_) => "options",
            Self::Marker(_) => "marker",
        }
    }

    /// Unwrap a connection, reporting the offending token otherwise
    pub fn into_connection(self, token: &Token) -> Result<Connection, ProvisionError> {
        match self {
            Self::Connection(connection) => Ok(connection),
            other => Err(mismatch(token, "connection", &other)),
        }
    }

    /// Unwrap a manager, reporting the offending token otherwise
    pub fn into_manager(self, token: &Token) -> Result<Manager, ProvisionError> {
        match self {
            Self::Manager(manager) => Ok(manager),
            other => Err(mismatch(token, "manager", &other)),
        }
    }

    /// Unwrap an accessor, reporting the offending token otherwise
    pub fn into_accessor(self, token: &Token) -> Result<EntityAccessor, ProvisionError> {
        match self {
            Self::Accessor(accessor) => Ok(accessor),
            other => Err(mismatch(token, "accessor", &other)),
        }
    }

    /// Unwrap connection options, reporting the offending token otherwise
    pub fn into_options(self, token: &Token) -> Result<ConnectOptions, ProvisionError> {
        match self {
            Self::Options(options) => Ok(options),
            other => Err(mismatch(token, "options", &other)),
        }
    }

    /// Borrow the connection, if that is what this instance holds
    pub fn as_connection(&self) -> Option<&Connection> {
        match self {
            Self::Connection(connection) => Some(connection),
            _ => None,
        }
    }

    /// Borrow the options, if that is what this instance holds
    pub fn as_options(&self) -> Option<&ConnectOptions> {
        match self {
            Self::Options(options) => Some(options),
            _ => None,
        }
    }
}

fn mismatch(token: &Token, expected: &'static str, actual: &Instance) -> ProvisionError {
    ProvisionError::WrongInstanceKind {
        token: token.clone(),
        expected,
        actual: actual.kind(),
    }
}

/// Factory closure receiving its resolved dependencies in `inject` order
pub type ProviderFactory =
    Arc<dyn Fn(Vec<Instance>) -> BoxFuture<'static, Result<Instance, ProvisionError>> + Send + Sync>;

/// One registration: a token, the factory producing its instance, and the
/// tokens of the dependencies the factory needs
#[derive(Clone)]
pub struct Provider {
    /// Token this provider is registered under
    pub token: Token,
    /// Dependency tokens, resolved before the factory runs
    pub inject: Vec<Token>,
    /// Factory producing the instance
    pub factory: ProviderFactory,
}

/// Hook run once at application shutdown
pub type ShutdownHook = Arc<dyn for<'a> Fn(&'a Container) -> BoxFuture<'a, ()> + Send + Sync>;

/// Minimal hosting surface: a token-keyed provider table with memoized
/// singleton resolution and shutdown hooks.
///
/// Stands in for whatever container actually hosts the engine; the engine
/// itself only ever emits tokens and factory closures.
#[derive(Default)]
pub struct Container {
    providers: RwLock<HashMap<Token, Provider>>,
    instances: tokio::sync::Mutex<HashMap<Token, Instance>>,
    shutdown_hooks: Mutex<Vec<ShutdownHook>>,
}

impl Container {
    /// Empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider. A later registration under the same token wins.
    pub fn add_provider(&self, provider: Provider) {
        self.providers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(provider.token.clone(), provider);
    }

    /// Register a shutdown hook; hooks run in registration order
    pub fn add_shutdown_hook(&self, hook: ShutdownHook) {
        self.shutdown_hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(hook);
    }

    /// Resolve a token, instantiating it and its dependencies depth-first.
    /// Instances are memoized: each provider factory runs at most once.
    pub fn resolve<'a>(&'a self, token: &Token) -> BoxFuture<'a, Result<Instance, ProvisionError>> {
        let token = token.clone();
        Box::pin(async move {
            if let Some(instance) = self.instances.lock().await.get(&token) {
                return Ok(instance.clone());
            }

            let provider = self
                .providers
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&token)
                .cloned()
                .ok_or_else(|| ProvisionError::UnknownToken(token.clone()))?;

            let mut deps = Vec::with_capacity(provider.inject.len());
            for dependency in &provider.inject {
                deps.push(self.resolve(dependency).await?);
            }

            let instance = (provider.factory)(deps).await?;
            self.instances
                .lock()
                .await
                .insert(token, instance.clone());
            Ok(instance)
        })
    }

    /// Already-instantiated instance for a token, if any. Never instantiates.
    pub async fn peek(&self, token: &Token) -> Option<Instance> {
        self.instances.lock().await.get(token).cloned()
    }

    /// Run shutdown hooks in registration order. Hooks are taken out first,
    /// so a second shutdown is a no-op.
    pub async fn shutdown(&self) {
        let hooks = std::mem::take(
            &mut *self
                .shutdown_hooks
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for hook in hooks {
            hook(self).await;
        }
    }
}
