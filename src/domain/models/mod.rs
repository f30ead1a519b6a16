//! Value types: options, entity descriptors, tokens, and the connection
//! handle with its projections.

mod connection;
mod entity;
mod options;
mod token;

pub use connection::{Connection, EntityAccessor, Manager};
pub use entity::EntityType;
pub use options::{
    AsyncConnectOptions, ConnectOptions, ConnectOptionsFactory, ConnectionFactory, OptionsSource,
    RetryPredicate,
};
pub use token::{
    connection_token, data_source_prefix, entity_accessor_token, manager_token, options_token,
    ConnectionId, Token, DEFAULT_CONNECTION_NAME,
};
