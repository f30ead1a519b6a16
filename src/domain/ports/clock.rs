use std::time::Duration;

use async_trait::async_trait;

/// Sleep abstraction so retry timing is deterministic under test
#[async_trait]
pub trait Clock: Send + Sync {
    /// Suspend the current task for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock implementation over the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
