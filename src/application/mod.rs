//! Application layer: composition, lifecycle, and configuration loading

pub mod config;
pub mod container;
pub mod module;

pub use config::{OptionsError, OptionsLoader};
pub use container::{Container, Instance, Provider, ProviderFactory, ShutdownHook};
pub use module::DataSourceModule;
