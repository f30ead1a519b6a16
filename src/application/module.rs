use std::sync::Arc;

use tracing::error;
use uuid::Uuid;

use crate::application::container::{Container, Instance, Provider, ShutdownHook};
use crate::domain::models::{
    connection_token, entity_accessor_token, manager_token, options_token, AsyncConnectOptions,
    ConnectOptions, ConnectionId, EntityType, Token,
};
use crate::domain::ports::{ProvisionError, TokenError};
use crate::services::{EntityRegistry, Provisioner};

/// Composition unit binding one connection, or one feature's accessors, into
/// a container.
///
/// Mirrors the bootstrap shape of a modular application: the root composes a
/// connection once, feature modules contribute accessor providers (and, via
/// the registry, entities for auto-discovery) without holding the connection.
pub struct DataSourceModule {
    providers: Vec<Provider>,
    shutdown_hook: Option<ShutdownHook>,
}

impl std::fmt::Debug for DataSourceModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSourceModule")
            .field("providers", &self.providers.len())
            .field("shutdown_hook", &self.shutdown_hook.is_some())
            .finish()
    }
}

impl DataSourceModule {
    /// Register a connection from already-resolved options.
    ///
    /// Emits the options value, a lazily-provisioning connection provider, a
    /// manager projection provider, and a shutdown hook that closes the
    /// connection unless `keep_connection_alive` is set.
    pub fn for_root(provisioner: &Provisioner, options: ConnectOptions) -> Self {
        let id = ConnectionId::Config(&options);
        let opts_token = options_token(id);
        let conn_token = connection_token(id);
        let mgr_token = manager_token(id);

        let providers = vec![
            value_provider(opts_token.clone(), Instance::Options(options)),
            connection_provider(provisioner.clone(), conn_token.clone(), opts_token.clone()),
            manager_provider(mgr_token, conn_token.clone()),
        ];

        Self {
            providers,
            shutdown_hook: Some(shutdown_hook(conn_token, opts_token)),
        }
    }

    /// Register a connection whose options are resolved at container time.
    ///
    /// The options source runs inside the options provider; a name override
    /// on the async options is applied to whatever it produces, so the tokens
    /// (derived from the override) and the provisioned connection agree. Each
    /// call also emits a fresh unique build marker, so repeated composition
    /// (tests re-composing the same root) never collides on memoized
    /// providers.
    pub fn for_root_async(provisioner: &Provisioner, async_options: AsyncConnectOptions) -> Self {
        let id = match &async_options.name {
            Some(name) => ConnectionId::Name(name),
            None => ConnectionId::default(),
        };
        let opts_token = options_token(id);
        let conn_token = connection_token(id);
        let mgr_token = manager_token(id);

        let source = async_options.source;
        let name_override = async_options.name;
        let options_provider = Provider {
            token: opts_token.clone(),
            inject: vec![],
            factory: Arc::new(move |_| {
                let source = source.clone();
                let name_override = name_override.clone();
                Box::pin(async move {
                    let mut options = source.resolve(name_override.as_deref()).await?;
                    if name_override.is_some() {
                        options.name = name_override;
                    }
                    Ok(Instance::Options(options))
                })
            }),
        };

        let provisioner = match async_options.connection_factory {
            Some(factory) => provisioner.clone().with_factory(factory),
            None => provisioner.clone(),
        };

        let providers = vec![
            options_provider,
            connection_provider(provisioner, conn_token.clone(), opts_token.clone()),
            manager_provider(mgr_token, conn_token.clone()),
            module_id_provider(),
        ];

        Self {
            providers,
            shutdown_hook: Some(shutdown_hook(conn_token, opts_token)),
        }
    }

    /// Register per-entity accessor providers for an existing connection and
    /// record the entities for auto-discovery.
    ///
    /// Fails before touching the registry when an entity descriptor has no
    /// name (the circular-import signature).
    pub fn for_feature(
        registry: &EntityRegistry,
        entities: Vec<EntityType>,
        id: ConnectionId<'_>,
    ) -> Result<Self, TokenError> {
        let conn_token = connection_token(id);
        let mut providers = Vec::with_capacity(entities.len());
        for entity in &entities {
            let token = entity_accessor_token(entity, id, "DataSourceModule::for_feature")?;
            providers.push(accessor_provider(token, conn_token.clone(), entity.clone()));
        }

        registry.register(id, &entities);

        Ok(Self {
            providers,
            shutdown_hook: None,
        })
    }

    /// Providers this module will register
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Hand this module's providers and lifecycle hook to the container
    pub fn install(self, container: &Container) {
        for provider in self.providers {
            container.add_provider(provider);
        }
        if let Some(hook) = self.shutdown_hook {
            container.add_shutdown_hook(hook);
        }
    }
}

fn value_provider(token: Token, instance: Instance) -> Provider {
    Provider {
        token,
        inject: vec![],
        factory: Arc::new(move |_| {
            let instance = instance.clone();
            Box::pin(async move { Ok(instance) })
        }),
    }
}

fn connection_provider(provisioner: Provisioner, token: Token, opts_token: Token) -> Provider {
    Provider {
        token,
        inject: vec![opts_token.clone()],
        factory: Arc::new(move |mut deps| {
            let provisioner = provisioner.clone();
            let opts_token = opts_token.clone();
            Box::pin(async move {
                let options = deps
                    .pop()
                    .ok_or_else(|| {
                        ProvisionError::Options(
                            "connection provider resolved without options".to_string(),
                        )
                    })?
                    .into_options(&opts_token)?;
                let connection = provisioner.provision(&options).await?;
                Ok(Instance::Connection(connection))
            })
        }),
    }
}

fn manager_provider(token: Token, conn_token: Token) -> Provider {
    Provider {
        token,
        inject: vec![conn_token.clone()],
        factory: Arc::new(move |mut deps| {
            let conn_token = conn_token.clone();
            Box::pin(async move {
                let connection = deps
                    .pop()
                    .ok_or_else(|| {
                        ProvisionError::Options(
                            "manager provider resolved without a connection".to_string(),
                        )
                    })?
                    .into_connection(&conn_token)?;
                Ok(Instance::Manager(connection.manager()))
            })
        }),
    }
}

fn accessor_provider(token: Token, conn_token: Token, entity: EntityType) -> Provider {
    Provider {
        token,
        inject: vec![conn_token.clone()],
        factory: Arc::new(move |mut deps| {
            let conn_token = conn_token.clone();
            let entity = entity.clone();
            Box::pin(async move {
                let connection = deps
                    .pop()
                    .ok_or_else(|| {
                        ProvisionError::Options(
                            "accessor provider resolved without a connection".to_string(),
                        )
                    })?
                    .into_connection(&conn_token)?;
                Ok(Instance::Accessor(connection.accessor(&entity)))
            })
        }),
    }
}

fn module_id_provider() -> Provider {
    let id = Uuid::new_v4().to_string();
    value_provider(
        Token::new(format!("DataSourceModuleId:{id}")),
        Instance::Marker(id),
    )
}

/// Best-effort teardown: close the live connection at shutdown unless the
/// options kept it alive. Never provisions a connection just to close it, and
/// never lets a close failure abort shutdown.
fn shutdown_hook(conn_token: Token, opts_token: Token) -> ShutdownHook {
    Arc::new(move |container: &Container| {
        let conn_token = conn_token.clone();
        let opts_token = opts_token.clone();
        Box::pin(async move {
            let Some(instance) = container.peek(&conn_token).await else {
                return;
            };
            let Some(connection) = instance.as_connection().cloned() else {
                return;
            };

            let keep_alive = match container.resolve(&opts_token).await {
                Ok(options) => options
                    .as_options()
                    .is_some_and(|options| options.keep_connection_alive),
                Err(_) => false,
            };
            if keep_alive {
                return;
            }

            if let Err(err) = connection.close().await {
                error!(
                    connection = %connection.name(),
                    error = %err,
                    "failed to close connection during shutdown"
                );
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct User;

    #[test]
    fn for_feature_rejects_unnamed_entities_before_registering() {
        let registry = EntityRegistry::new();
        let anonymous = EntityType::named::<User>("");

        let err = DataSourceModule::for_feature(
            &registry,
            vec![anonymous],
            ConnectionId::Name("orders"),
        )
        .unwrap_err();

        assert!(matches!(err, TokenError::MissingEntityName { .. }));
        assert!(registry.entities_for(ConnectionId::Name("orders")).is_empty());
    }

    #[test]
    fn for_feature_registers_entities_and_emits_one_provider_each() {
        let registry = EntityRegistry::new();
        let user = EntityType::of::<User>();

        let module = DataSourceModule::for_feature(
            &registry,
            vec![user.clone()],
            ConnectionId::default(),
        )
        .unwrap();

        assert_eq!(module.providers().len(), 1);
        assert_eq!(module.providers()[0].token.as_str(), "UserRepository");
        assert_eq!(
            registry.entities_for(ConnectionId::Name("default")),
            vec![user]
        );
    }

    #[test]
    fn async_modules_carry_unique_build_markers() {
        let registry = Arc::new(EntityRegistry::new());
        let provisioner = Provisioner::new(registry);

        let first = DataSourceModule::for_root_async(
            &provisioner,
            AsyncConnectOptions::from_value(ConnectOptions::default()),
        );
        let second = DataSourceModule::for_root_async(
            &provisioner,
            AsyncConnectOptions::from_value(ConnectOptions::default()),
        );

        let marker_of = |module: &DataSourceModule| {
            module
                .providers()
                .iter()
                .map(|provider| provider.token.clone())
                .find(|token| token.as_str().starts_with("DataSourceModuleId:"))
                .expect("async module should carry a build marker")
        };

        assert_ne!(marker_of(&first), marker_of(&second));
    }
}
