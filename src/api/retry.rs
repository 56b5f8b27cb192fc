//! Retry policy with exponential backoff for idempotent requests.
//!
//! Only GETs are retried: mutating verbs executed twice could duplicate
//! side effects. Eligible failures are network-level transport errors
//! and the fixed transient status set; an elapsed timeout never retries.

use std::future::Future;
use std::time::Duration;

use log::{debug, info, warn};
use rand::Rng;

/// Transient HTTP statuses an idempotent request may be retried on.
pub const TRANSIENT_STATUS: [u16; 4] = [429, 502, 503, 504];

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Conservative config for production.
    pub fn conservative() -> Self {
        Self {
            max_attempts: 2,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 1.5,
            jitter: true,
        }
    }

    /// Aggressive config for development/testing.
    pub fn aggressive() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.5,
            jitter: true,
        }
    }

    /// Single attempt, no backoff.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            backoff_multiplier: 1.0,
            jitter: false,
        }
    }
}

/// Failure classification driving retry decisions.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureKind {
    /// The configured timeout elapsed; surfaced to the caller as-is.
    Timeout,
    /// Connection-level error (DNS, refused connection).
    Network,
    /// One of the transient statuses.
    TransientStatus(u16),
    /// Any other HTTP status.
    FatalStatus(u16),
    Unknown,
}

impl FailureKind {
    pub fn should_retry(&self) -> bool {
        match self {
            FailureKind::Network => true,
            FailureKind::TransientStatus(_) => true,
            FailureKind::Timeout => false,
            FailureKind::FatalStatus(_) => false,
            FailureKind::Unknown => false,
        }
    }

    pub fn from_status(status: u16) -> Self {
        if TRANSIENT_STATUS.contains(&status) {
            FailureKind::TransientStatus(status)
        } else {
            FailureKind::FatalStatus(status)
        }
    }

    pub fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            FailureKind::Timeout
        } else if error.is_connect() || error.is_request() {
            FailureKind::Network
        } else if let Some(status) = error.status() {
            Self::from_status(status.as_u16())
        } else {
            FailureKind::Unknown
        }
    }
}

/// Retry policy implementing capped exponential backoff with jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Run `operation`, retrying transient failures while `idempotent`
    /// holds and attempts remain. The last failure, transport error and
    /// transient response alike, is returned unchanged.
    pub async fn execute<F, Fut>(
        &self,
        idempotent: bool,
        operation: F,
    ) -> Result<reqwest::Response, reqwest::Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let max = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(response) if response.status().is_success() => {
                    if attempt > 1 {
                        info!("request succeeded after {} attempts", attempt);
                    }
                    return Ok(response);
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    let kind = FailureKind::from_status(status);
                    if !(idempotent && attempt < max && kind.should_retry()) {
                        return Ok(response);
                    }
                    warn!(
                        "request returned {} on attempt {}/{}, retrying",
                        status, attempt, max
                    );
                }
                Err(error) => {
                    let kind = FailureKind::from_transport(&error);
                    if !(idempotent && attempt < max && kind.should_retry()) {
                        warn!(
                            "request failed permanently on attempt {} ({:?}): {}",
                            attempt, kind, error
                        );
                        return Err(error);
                    }
                    warn!("request failed on attempt {}/{} ({:?})", attempt, max, kind);
                }
            }

            let delay = self.backoff_delay(attempt);
            debug!("waiting {:?} before retry", delay);
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Exponential backoff delay for the given attempt, capped at
    /// `max_delay`, with optional jitter against thundering herds.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let delay_ms = (self.config.base_delay.as_millis() as f64)
            * self.config.backoff_multiplier.powi(attempt as i32 - 1);

        let mut delay = Duration::from_millis(delay_ms as u64);
        if delay > self.config.max_delay {
            delay = self.config.max_delay;
        }

        if self.config.jitter {
            let jitter_factor = rand::rng().random_range(0.5..=1.5);
            let jittered_ms = (delay.as_millis() as f64 * jitter_factor) as u64;
            delay = Duration::from_millis(jittered_ms);
        }

        delay
    }
}
