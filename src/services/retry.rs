use std::future::Future;
use std::time::Duration;

use tracing::error;

use crate::domain::models::{ConnectOptions, ConnectionId, RetryPredicate, DEFAULT_CONNECTION_NAME};
use crate::domain::ports::{Clock, ConnectError, ProvisionError};

/// Bounded fixed-delay retry around a connection attempt.
///
/// No backoff and no jitter: connection failures at startup are typically
/// transient infrastructure races (a database container not yet accepting
/// connections), and a predictable cadence is preferred over an adaptive one.
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
    connection_name: String,
    verbose: bool,
    to_retry: Option<RetryPredicate>,
}

impl RetryPolicy {
    /// Policy retrying up to `attempts` failures with a fixed `delay` between
    /// them, logging under `connection_name`
    pub fn new(attempts: u32, delay: Duration, connection_name: impl Into<String>) -> Self {
        Self {
            attempts,
            delay,
            connection_name: connection_name.into(),
            verbose: false,
            to_retry: None,
        }
    }

    /// Policy configured from connection options
    pub fn from_options(options: &ConnectOptions) -> Self {
        Self {
            attempts: options.retry_attempts,
            delay: options.retry_delay(),
            connection_name: ConnectionId::Config(options).resolved_name().to_string(),
            verbose: options.verbose_retry_log,
            to_retry: options.to_retry.clone(),
        }
    }

    /// Include the error message in each failure log line
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the retry-eligibility predicate
    pub fn to_retry(mut self, predicate: Option<RetryPredicate>) -> Self {
        self.to_retry = predicate;
        self
    }

    /// Run `attempt` until it succeeds, the predicate rejects a failure, or
    /// the attempt budget is exhausted.
    ///
    /// The failure counter starts at zero and every failure is logged before
    /// the budget check, so `attempts == 0` runs the operation once and the
    /// first failure is fatal (with one log line).
    pub async fn execute<F, Fut, T>(
        &self,
        mut attempt: F,
        clock: &dyn Clock,
    ) -> Result<T, ProvisionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ConnectError>>,
    {
        let mut failures = 0u32;

        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if let Some(predicate) = &self.to_retry {
                        if !predicate(&err) {
                            return Err(ProvisionError::NonRetryable { source: err });
                        }
                    }

                    failures += 1;
                    self.log_failure(failures, &err);

                    if failures >= self.attempts {
                        return Err(ProvisionError::RetryExhausted {
                            attempts: failures,
                            source: err,
                        });
                    }

                    clock.sleep(self.delay).await;
                }
            }
        }
    }

    fn log_failure(&self, attempt: u32, err: &ConnectError) {
        let connection_info = if self.connection_name == DEFAULT_CONNECTION_NAME {
            String::new()
        } else {
            format!(" ({})", self.connection_name)
        };
        let message = if self.verbose {
            format!(" Message: {err}.")
        } else {
            String::new()
        };

        error!("Unable to connect to the database{connection_info}.{message} Retrying ({attempt})...");
    }
}
