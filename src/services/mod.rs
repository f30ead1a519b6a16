//! Services: the entity registry, the retry policy, and the provisioner that
//! ties them around a connection factory.

mod provisioner;
mod registry;
mod retry;

pub use provisioner::{default_factory, Provisioner};
pub use registry::EntityRegistry;
pub use retry::RetryPolicy;
