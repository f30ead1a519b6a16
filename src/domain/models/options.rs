use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::domain::models::{Connection, EntityType};
use crate::domain::ports::{ConnectError, ProvisionError};

/// Predicate deciding whether a failed connection attempt may be retried.
/// Returning `false` makes the failure fatal immediately.
pub type RetryPredicate = Arc<dyn Fn(&ConnectError) -> bool + Send + Sync>;

/// Factory producing a ready connection from resolved options.
///
/// The default implementation builds a `SQLite` pool descriptor and opens it;
/// custom factories support connection reuse and mocking.
pub type ConnectionFactory = Arc<
    dyn Fn(ConnectOptions) -> BoxFuture<'static, Result<Connection, ConnectError>> + Send + Sync,
>;

/// Configuration for one named connection
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConnectOptions {
    /// Connection name; absent, empty, or `"default"` means the default
    /// connection
    #[serde(default)]
    pub name: Option<String>,

    /// Database URL handed to the default backend
    #[serde(default = "default_url")]
    pub url: String,

    /// Include entities registered through feature modules when provisioning
    #[serde(default)]
    pub auto_load_entities: bool,

    /// Explicit entity types, merged ahead of discovered ones
    #[serde(skip)]
    pub entities: Vec<EntityType>,

    /// Maximum number of failed connection attempts before giving up
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Fixed delay between attempts, in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Include the error message in each retry log line
    #[serde(default)]
    pub verbose_retry_log: bool,

    /// Retry-eligibility check; `None` retries every failure. The predicate
    /// is a plain function and cannot fail; a panic inside it propagates.
    #[serde(skip)]
    pub to_retry: Option<RetryPredicate>,

    /// Leave the connection open at shutdown, deferring close to an external
    /// owner
    #[serde(default)]
    pub keep_connection_alive: bool,
}

const fn default_retry_attempts() -> u32 {
    9
}

const fn default_retry_delay_ms() -> u64 {
    3000
}

fn default_url() -> String {
    "sqlite::memory:".to_string()
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            name: None,
            url: default_url(),
            auto_load_entities: false,
            entities: Vec::new(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            verbose_retry_log: false,
            to_retry: None,
            keep_connection_alive: false,
        }
    }
}

impl ConnectOptions {
    /// Options for a named connection, everything else defaulted
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// The inter-attempt delay as a [`Duration`]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("auto_load_entities", &self.auto_load_entities)
            .field("entities", &self.entities)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("verbose_retry_log", &self.verbose_retry_log)
            .field("to_retry", &self.to_retry.is_some())
            .field("keep_connection_alive", &self.keep_connection_alive)
            .finish()
    }
}

/// Delegate resolving connection options by name during async composition
#[async_trait]
pub trait ConnectOptionsFactory: Send + Sync {
    /// Produce the options for the connection called `name` (`None` for the
    /// default connection)
    async fn create_options(&self, name: Option<&str>) -> Result<ConnectOptions, ProvisionError>;
}

/// How the options for an async-composed connection are obtained
#[derive(Clone)]
pub enum OptionsSource {
    /// Constant options value
    Value(ConnectOptions),
    /// Closure producing the options
    Factory(
        Arc<dyn Fn() -> BoxFuture<'static, Result<ConnectOptions, ProvisionError>> + Send + Sync>,
    ),
    /// Delegate implementing [`ConnectOptionsFactory`]
    Provider(Arc<dyn ConnectOptionsFactory>),
}

impl OptionsSource {
    pub(crate) async fn resolve(
        &self,
        name: Option<&str>,
    ) -> Result<ConnectOptions, ProvisionError> {
        match self {
            Self::Value(options) => Ok(options.clone()),
            Self::Factory(factory) => factory().await,
            Self::Provider(provider) => provider.create_options(name).await,
        }
    }
}

/// Async composition options: resolve the configuration first, then provision
/// through the same path as the synchronous form
#[derive(Clone)]
pub struct AsyncConnectOptions {
    /// Overrides the resolved options' connection name when set
    pub name: Option<String>,

    /// Where the options come from
    pub source: OptionsSource,

    /// Custom connection factory (reuse or mocking); `None` uses the
    /// provisioner's default
    pub connection_factory: Option<ConnectionFactory>,
}

impl AsyncConnectOptions {
    /// Async options backed by a constant value
    pub fn from_value(options: ConnectOptions) -> Self {
        Self {
            name: None,
            source: OptionsSource::Value(options),
            connection_factory: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let options = ConnectOptions::default();
        assert_eq!(options.retry_attempts, 9);
        assert_eq!(options.retry_delay(), Duration::from_millis(3000));
        assert!(!options.auto_load_entities);
        assert!(!options.verbose_retry_log);
        assert!(!options.keep_connection_alive);
        assert!(options.name.is_none());
    }

    #[tokio::test]
    async fn value_source_resolves_to_its_options() {
        let source = OptionsSource::Value(ConnectOptions::named("orders"));
        let options = source.resolve(Some("orders")).await.unwrap();
        assert_eq!(options.name.as_deref(), Some("orders"));
    }

    #[tokio::test]
    async fn provider_source_receives_the_connection_name() {
        struct ByName;

        #[async_trait]
        impl ConnectOptionsFactory for ByName {
            async fn create_options(
                &self,
                name: Option<&str>,
            ) -> Result<ConnectOptions, ProvisionError> {
                Ok(ConnectOptions {
                    name: name.map(String::from),
                    ..ConnectOptions::default()
                })
            }
        }

        let source = OptionsSource::Provider(Arc::new(ByName));
        let options = source.resolve(Some("analytics")).await.unwrap();
        assert_eq!(options.name.as_deref(), Some("analytics"));
    }
}
