use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::ConnectOptions;

/// Options loading error types
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Database URL cannot be empty")]
    EmptyUrl,

    #[error("Invalid retry_delay_ms: {0}. Must be positive when retries are enabled")]
    ZeroRetryDelay(u64),

    #[error("Failed to extract connection options: {0}")]
    Extraction(#[from] figment::Error),
}

/// Connection options loader with hierarchical merging
pub struct OptionsLoader;

impl OptionsLoader {
    /// Load connection options with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. aquifer.yaml in the working directory (optional)
    /// 3. Environment variables (`AQUIFER_*` prefix, highest priority)
    pub fn load() -> Result<ConnectOptions, OptionsError> {
        let options: ConnectOptions = Figment::new()
            .merge(Serialized::defaults(ConnectOptions::default()))
            .merge(Yaml::file("aquifer.yaml"))
            .merge(Env::prefixed("AQUIFER_").split("__"))
            .extract()?;

        Self::validate(&options)?;
        Ok(options)
    }

    /// Load connection options from a specific file
    pub fn load_from_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<ConnectOptions, OptionsError> {
        let options: ConnectOptions = Figment::new()
            .merge(Serialized::defaults(ConnectOptions::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()?;

        Self::validate(&options)?;
        Ok(options)
    }

    /// Validate options after loading
    pub fn validate(options: &ConnectOptions) -> Result<(), OptionsError> {
        if options.url.is_empty() {
            return Err(OptionsError::EmptyUrl);
        }

        if options.retry_delay_ms == 0 && options.retry_attempts > 0 {
            return Err(OptionsError::ZeroRetryDelay(options.retry_delay_ms));
        }

        Ok(())
    }
}
