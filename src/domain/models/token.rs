use std::borrow::Cow;
use std::fmt;

use crate::domain::models::{ConnectOptions, Connection, EntityType};
use crate::domain::ports::TokenError;

/// Reserved name of the default connection
pub const DEFAULT_CONNECTION_NAME: &str = "default";

const DEFAULT_DATA_SOURCE: &str = "DataSource";
const DEFAULT_ENTITY_MANAGER: &str = "EntityManager";
const DEFAULT_OPTIONS: &str = "DataSourceOptions";

/// Stable identity key used by the hosting container to register and resolve
/// a provided object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(Cow<'static, str>);

impl Token {
    /// Token with the given key
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    /// The token's key
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for a connection: a bare name, a configuration carrying an
/// optional name, or a live handle.
///
/// All token derivation goes through [`ConnectionId::resolved_name`], so two
/// identifiers resolving to the same effective name always produce identical
/// tokens.
#[derive(Clone, Copy)]
pub enum ConnectionId<'a> {
    /// Bare connection name
    Name(&'a str),
    /// Configuration value; its `name` field may be absent
    Config(&'a ConnectOptions),
    /// Live connection handle
    Handle(&'a Connection),
}

impl Default for ConnectionId<'_> {
    fn default() -> Self {
        Self::Name(DEFAULT_CONNECTION_NAME)
    }
}

impl<'a> From<&'a str> for ConnectionId<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a ConnectOptions> for ConnectionId<'a> {
    fn from(options: &'a ConnectOptions) -> Self {
        Self::Config(options)
    }
}

impl<'a> From<&'a Connection> for ConnectionId<'a> {
    fn from(connection: &'a Connection) -> Self {
        Self::Handle(connection)
    }
}

impl<'a> ConnectionId<'a> {
    /// The name as given, without defaulting. `None` when the identifier
    /// carries no usable name (the entity registry treats that as a no-op).
    pub fn raw_name(self) -> Option<&'a str> {
        let name = match self {
            Self::Name(name) => Some(name),
            Self::Config(options) => options.name.as_deref(),
            Self::Handle(connection) => Some(connection.name()),
        };
        name.filter(|name| !name.is_empty())
    }

    /// Effective connection name, defaulting when absent or empty
    pub fn resolved_name(self) -> &'a str {
        self.raw_name().unwrap_or(DEFAULT_CONNECTION_NAME)
    }

    /// Whether this identifier resolves to the default connection
    pub fn is_default(self) -> bool {
        self.resolved_name() == DEFAULT_CONNECTION_NAME
    }
}

/// Injection token for the connection itself.
///
/// The default connection keeps the bare `DataSource` marker so consumers that
/// injected the default connection directly keep resolving; named connections
/// get `"<name>DataSource"`.
pub fn connection_token(id: ConnectionId<'_>) -> Token {
    if id.is_default() {
        Token::new(DEFAULT_DATA_SOURCE)
    } else {
        Token::new(format!("{}{DEFAULT_DATA_SOURCE}", id.resolved_name()))
    }
}

/// Injection token for the connection's manager object
pub fn manager_token(id: ConnectionId<'_>) -> Token {
    if id.is_default() {
        Token::new(DEFAULT_ENTITY_MANAGER)
    } else {
        Token::new(format!("{}{DEFAULT_ENTITY_MANAGER}", id.resolved_name()))
    }
}

/// Injection token for the resolved options of a connection.
///
/// Name-scoped so multiple connection roots coexist in one flat provider
/// table.
pub fn options_token(id: ConnectionId<'_>) -> Token {
    if id.is_default() {
        Token::new(DEFAULT_OPTIONS)
    } else {
        Token::new(format!("{}{DEFAULT_OPTIONS}", id.resolved_name()))
    }
}

/// Per-connection prefix applied to entity accessor tokens: empty for the
/// default connection, `"<name>_"` otherwise.
pub fn data_source_prefix(id: ConnectionId<'_>) -> String {
    if id.is_default() {
        String::new()
    } else {
        format!("{}_", id.resolved_name())
    }
}

/// Injection token for an entity's per-connection accessor
/// (`"<prefix><Entity>Repository"`).
///
/// Fails when the entity descriptor has an empty name; `requested_by` names
/// the call site for the error message.
pub fn entity_accessor_token(
    entity: &EntityType,
    id: ConnectionId<'_>,
    requested_by: &'static str,
) -> Result<Token, TokenError> {
    if entity.name().is_empty() {
        return Err(TokenError::MissingEntityName { requested_by });
    }
    Ok(Token::new(format!(
        "{}{}Repository",
        data_source_prefix(id),
        entity.name()
    )))
}
