//! Shared test doubles for the integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use aquifer::{Backend, ConnectError, Connection, ConnectionFactory, DEFAULT_CONNECTION_NAME};

/// In-memory backend recording how often it was opened and closed
pub struct StubBackend {
    opens: AtomicU32,
    closes: AtomicU32,
    fail_close: bool,
}

impl StubBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            opens: AtomicU32::new(0),
            closes: AtomicU32::new(0),
            fail_close: false,
        })
    }

    /// Backend whose `close` always reports an error
    pub fn failing_close() -> Arc<Self> {
        Arc::new(Self {
            opens: AtomicU32::new(0),
            closes: AtomicU32::new(0),
            fail_close: true,
        })
    }

    pub fn open_count(&self) -> u32 {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> u32 {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for StubBackend {
    fn is_open(&self) -> bool {
        self.closes.load(Ordering::SeqCst) == 0
    }

    async fn close(&self) -> Result<(), ConnectError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            Err(ConnectError::Closed)
        } else {
            Ok(())
        }
    }
}

/// Connection factory wiring every provisioned connection to `backend`
pub fn stub_factory(backend: Arc<StubBackend>) -> ConnectionFactory {
    Arc::new(move |options| {
        let backend = backend.clone();
        Box::pin(async move {
            backend.opens.fetch_add(1, Ordering::SeqCst);
            let name = options
                .name
                .clone()
                .unwrap_or_else(|| DEFAULT_CONNECTION_NAME.to_string());
            Ok(Connection::new(name, options.entities.clone(), backend))
        })
    })
}
