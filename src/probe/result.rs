use std::time::Duration;

use chrono::{DateTime, Utc};

/// Status recorded when no HTTP response was received.
pub const NETWORK_FAILURE_STATUS: u16 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeFailure {
    Timeout,
    Transport,
}

#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// Index of the probed target in the run plan.
    pub target: usize,
    pub status: u16,
    pub body: String,
    pub latency: Duration,
    pub timestamp: DateTime<Utc>,
    pub failure: Option<ProbeFailure>,
}

impl ProbeResult {
    #[must_use]
    pub const fn response(
        target: usize,
        status: u16,
        body: String,
        latency: Duration,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            target,
            status,
            body,
            latency,
            timestamp,
            failure: None,
        }
    }

    #[must_use]
    pub const fn failed(
        target: usize,
        failure: ProbeFailure,
        latency: Duration,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            target,
            status: NETWORK_FAILURE_STATUS,
            body: String::new(),
            latency,
            timestamp,
            failure: Some(failure),
        }
    }

    /// True for any 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }
}
