use async_trait::async_trait;

use crate::domain::ports::ConnectError;

/// Driver-facing seam: the opaque object a [`Connection`] wraps.
///
/// The engine never runs queries or migrations through this trait; it only
/// needs to know whether the link is alive and how to tear it down.
///
/// [`Connection`]: crate::domain::models::Connection
#[async_trait]
pub trait Backend: Send + Sync {
    /// Whether the underlying link still accepts work
    fn is_open(&self) -> bool;

    /// Tear the link down. Called at most once per connection.
    async fn close(&self) -> Result<(), ConnectError>;
}
