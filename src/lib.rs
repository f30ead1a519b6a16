//! Aquifer - Database Connection Provisioning
//!
//! Aquifer provisions named database connections for modular applications:
//! connections are composed once at the root, retried until reachable, shared
//! through injection tokens, and torn down in lifecycle order. Feature modules
//! contribute per-entity accessors without ever holding the connection
//! themselves.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Connection models, options, tokens, and ports
//! - **Service Layer** (`services`): Entity registry, retry policy, provisioning
//! - **Application Layer** (`application`): Module composition, container, config
//! - **Adapters Layer** (`adapters`): `SQLite` backend
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use aquifer::{Container, ConnectOptions, DataSourceModule, EntityRegistry, Provisioner};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = Arc::new(EntityRegistry::new());
//!     let provisioner = Provisioner::new(registry);
//!     let container = Container::new();
//!
//!     DataSourceModule::for_root(&provisioner, ConnectOptions::default())
//!         .install(&container);
//!
//!     // ... resolve tokens, run, then:
//!     container.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod application;
pub mod domain;
pub mod services;

// Re-export commonly used types for convenience
pub use application::{
    Container, DataSourceModule, Instance, OptionsError, OptionsLoader, Provider, ShutdownHook,
};
pub use domain::models::{
    connection_token, entity_accessor_token, manager_token, options_token, AsyncConnectOptions,
    ConnectOptions, ConnectOptionsFactory, Connection, ConnectionFactory, ConnectionId,
    EntityAccessor, EntityType, Manager, OptionsSource, RetryPredicate, Token,
    DEFAULT_CONNECTION_NAME,
};
pub use domain::ports::{Backend, Clock, ConnectError, ProvisionError, TokenError, TokioClock};
pub use services::{default_factory, EntityRegistry, Provisioner, RetryPolicy};
