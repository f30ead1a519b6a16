use thiserror::Error;

use crate::domain::models::Token;

/// Token derivation errors
#[derive(Debug, Error)]
pub enum TokenError {
    /// An entity descriptor arrived without a usable name. In practice this
    /// means a circular import between feature modules left a placeholder
    /// descriptor behind.
    #[error(
        "{requested_by} requires an entity with a non-empty name; \
         check for circular imports between feature modules"
    )]
    MissingEntityName {
        /// Call site that required the entity
        requested_by: &'static str,
    },
}

/// Errors raised by a connection factory during a single attempt
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to open connection pool: {0}")]
    PoolCreation(#[source] sqlx::Error),

    #[error("Connection is closed")]
    Closed,

    #[error("{0}")]
    Factory(String),
}

/// Provisioning and container resolution errors
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The retry-eligibility predicate classified the failure as fatal
    #[error("Connection attempt failed with a non-retryable error: {source}")]
    NonRetryable {
        #[source]
        source: ConnectError,
    },

    /// The attempt budget was spent; carries the last underlying error
    #[error("Retry budget exhausted after {attempts} failed attempts: {source}")]
    RetryExhausted {
        /// Number of failed attempts before giving up
        attempts: u32,
        #[source]
        source: ConnectError,
    },

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("No provider registered for token '{0}'")]
    UnknownToken(Token),

    #[error("Provider for token '{token}' produced a {actual}, expected a {expected}")]
    WrongInstanceKind {
        token: Token,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Failed to resolve connection options: {0}")]
    Options(String),
}
