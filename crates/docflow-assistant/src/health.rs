//! Provider health reporting.

use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Operational status of a provider.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// Provider is reachable and accepts requests.
    #[default]
    Healthy,
    /// Provider answers but reports a problem.
    Degraded,
    /// Provider is not usable.
    Unhealthy,
}

/// Result of a provider health check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Current status.
    pub status: ServiceStatus,
    /// How long the check took.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Duration>,
    /// Optional message describing the current state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// When the check was performed.
    pub checked_at: Timestamp,
}

impl ServiceHealth {
    fn with_status(status: ServiceStatus, message: Option<String>) -> Self {
        Self {
            status,
            response: None,
            message,
            checked_at: Timestamp::now(),
        }
    }

    /// Creates a healthy report.
    pub fn healthy() -> Self {
        Self::with_status(ServiceStatus::Healthy, None)
    }

    /// Creates a degraded report.
    pub fn degraded(message: impl Into<String>) -> Self {
        Self::with_status(ServiceStatus::Degraded, Some(message.into()))
    }

    /// Creates an unhealthy report.
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::with_status(ServiceStatus::Unhealthy, Some(message.into()))
    }

    /// Sets the response time of the check.
    pub fn with_response_time(mut self, response: Duration) -> Self {
        self.response = Some(response);
        self
    }

    /// Returns whether the provider is usable.
    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}
