// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gateway that fakes a cloud API with latency and random failures.

use std::time::Duration;

use rand::Rng;

use crate::error::ProtocolError;
use crate::types::PowerState;

use super::Gateway;

/// Stand-in for the cloud API when no credentials are available.
///
/// Each command sleeps for the configured latency and then succeeds with
/// probability `success_ratio`. Status reads sleep and return a random state.
/// Outcomes are independent of each other, so a retry is as likely to fail as
/// the first attempt.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use hotelctl_lib::gateway::SimulatedGateway;
///
/// let gateway = SimulatedGateway::new()
///     .with_command_latency(Duration::from_millis(50))
///     .with_success_ratio(0.8);
///
/// assert_eq!(gateway.success_ratio(), 0.8);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    command_latency: Duration,
    read_latency: Duration,
    success_ratio: f64,
}

impl SimulatedGateway {
    /// Default delay before a command resolves.
    pub const DEFAULT_COMMAND_LATENCY: Duration = Duration::from_millis(500);
    /// Default delay before a status read resolves.
    pub const DEFAULT_READ_LATENCY: Duration = Duration::from_millis(300);
    /// Default share of commands that succeed.
    pub const DEFAULT_SUCCESS_RATIO: f64 = 0.95;

    /// Creates a gateway with default latency and success ratio.
    #[must_use]
    pub fn new() -> Self {
        Self {
            command_latency: Self::DEFAULT_COMMAND_LATENCY,
            read_latency: Self::DEFAULT_READ_LATENCY,
            success_ratio: Self::DEFAULT_SUCCESS_RATIO,
        }
    }

    /// Sets the command latency.
    #[must_use]
    pub fn with_command_latency(mut self, latency: Duration) -> Self {
        self.command_latency = latency;
        self
    }

    /// Sets the status read latency.
    #[must_use]
    pub fn with_read_latency(mut self, latency: Duration) -> Self {
        self.read_latency = latency;
        self
    }

    /// Sets the share of commands that succeed, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn with_success_ratio(mut self, ratio: f64) -> Self {
        self.success_ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        self
    }

    /// Returns the share of commands that succeed.
    #[must_use]
    pub fn success_ratio(&self) -> f64 {
        self.success_ratio
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl Gateway for SimulatedGateway {
    async fn set_power(&self, external_id: &str, state: PowerState) -> Result<(), ProtocolError> {
        tracing::info!(external_id, %state, "Simulated power command");

        tokio::time::sleep(self.command_latency).await;

        let delivered = rand::rng().random_bool(self.success_ratio);
        if delivered {
            Ok(())
        } else {
            tracing::warn!(external_id, "Simulated device communication failure");
            Err(ProtocolError::ConnectionFailed(
                "device communication failed".to_string(),
            ))
        }
    }

    async fn read_power(&self, external_id: &str) -> Option<PowerState> {
        tracing::info!(external_id, "Simulated status read");

        tokio::time::sleep(self.read_latency).await;

        Some(PowerState::from(rand::rng().random_bool(0.5)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_ratio_is_clamped() {
        assert_eq!(SimulatedGateway::new().with_success_ratio(1.5).success_ratio(), 1.0);
        assert_eq!(SimulatedGateway::new().with_success_ratio(-0.5).success_ratio(), 0.0);
        assert_eq!(SimulatedGateway::new().with_success_ratio(f64::NAN).success_ratio(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn always_succeeds_at_full_ratio() {
        let gateway = SimulatedGateway::new().with_success_ratio(1.0);
        for _ in 0..20 {
            assert!(gateway.set_power("tuya_001", PowerState::On).await.is_ok());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn always_fails_at_zero_ratio() {
        let gateway = SimulatedGateway::new().with_success_ratio(0.0);
        let result = gateway.set_power("tuya_001", PowerState::Off).await;
        assert!(matches!(result, Err(ProtocolError::ConnectionFailed(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn command_waits_for_latency() {
        let gateway = SimulatedGateway::new()
            .with_success_ratio(1.0)
            .with_command_latency(Duration::from_millis(500));
        let started = tokio::time::Instant::now();

        gateway.set_power("tuya_001", PowerState::On).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn read_returns_a_reading() {
        let gateway = SimulatedGateway::new();
        assert!(gateway.read_power("tuya_001").await.is_some());
    }
}
