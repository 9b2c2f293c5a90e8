// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Deterministic gateway for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::ProtocolError;
use crate::types::PowerState;

use super::Gateway;

/// A call received by a [`ScriptedGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `set_power` was called.
    SetPower {
        /// External identifier the command targeted.
        external_id: String,
        /// Requested state.
        state: PowerState,
    },
    /// `read_power` was called.
    ReadPower {
        /// External identifier that was queried.
        external_id: String,
    },
}

#[derive(Debug)]
struct Script {
    outcomes: VecDeque<bool>,
    default_outcome: bool,
    readings: HashMap<String, PowerState>,
    calls: Vec<GatewayCall>,
}

/// Gateway whose outcomes are decided up front.
///
/// Command outcomes are consumed from a queue; once the queue is empty every
/// command uses the default outcome (success unless changed). Readings are
/// looked up per external id, and unknown ids read as `None`. Every call is
/// recorded when it starts, before the optional latency elapses.
///
/// Clones share the same script, so a test can keep one handle and pass the
/// other to the coordinator.
///
/// # Examples
///
/// ```
/// use hotelctl_lib::gateway::{Gateway, ScriptedGateway};
/// use hotelctl_lib::types::PowerState;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let gateway = ScriptedGateway::new();
/// gateway.fail_next();
///
/// assert!(gateway.set_power("tuya_005", PowerState::On).await.is_err());
/// assert!(gateway.set_power("tuya_005", PowerState::On).await.is_ok());
/// assert_eq!(gateway.command_count(), 2);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedGateway {
    script: Arc<Mutex<Script>>,
    latency: Option<Duration>,
}

impl ScriptedGateway {
    /// Creates a gateway where every command succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                outcomes: VecDeque::new(),
                default_outcome: true,
                readings: HashMap::new(),
                calls: Vec::new(),
            })),
            latency: None,
        }
    }

    /// Delays every call by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes the next queued command succeed.
    pub fn succeed_next(&self) {
        self.script.lock().outcomes.push_back(true);
    }

    /// Makes the next queued command fail.
    pub fn fail_next(&self) {
        self.script.lock().outcomes.push_back(false);
    }

    /// Sets the outcome used once the queue is exhausted.
    pub fn set_default_outcome(&self, succeed: bool) {
        self.script.lock().default_outcome = succeed;
    }

    /// Sets (or clears, with `None`) the reading for an external id.
    pub fn set_reading(&self, external_id: impl Into<String>, reading: Option<PowerState>) {
        let mut script = self.script.lock();
        let external_id = external_id.into();
        match reading {
            Some(state) => script.readings.insert(external_id, state),
            None => script.readings.remove(&external_id),
        };
    }

    /// Returns every call received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.script.lock().calls.clone()
    }

    /// Returns the number of `set_power` calls received.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.script
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, GatewayCall::SetPower { .. }))
            .count()
    }

    /// Returns the number of `read_power` calls received.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.script
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, GatewayCall::ReadPower { .. }))
            .count()
    }

    async fn wait(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl Gateway for ScriptedGateway {
    async fn set_power(&self, external_id: &str, state: PowerState) -> Result<(), ProtocolError> {
        let succeed = {
            let mut script = self.script.lock();
            script.calls.push(GatewayCall::SetPower {
                external_id: external_id.to_string(),
                state,
            });
            let default = script.default_outcome;
            script.outcomes.pop_front().unwrap_or(default)
        };

        self.wait().await;

        if succeed {
            Ok(())
        } else {
            Err(ProtocolError::ConnectionFailed(
                "scripted command failure".to_string(),
            ))
        }
    }

    async fn read_power(&self, external_id: &str) -> Option<PowerState> {
        let reading = {
            let mut script = self.script.lock();
            script.calls.push(GatewayCall::ReadPower {
                external_id: external_id.to_string(),
            });
            script.readings.get(external_id).copied()
        };

        self.wait().await;

        reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_outcomes_then_default() {
        let gateway = ScriptedGateway::new();
        gateway.fail_next();
        gateway.succeed_next();
        gateway.set_default_outcome(false);

        assert!(gateway.set_power("a", PowerState::On).await.is_err());
        assert!(gateway.set_power("a", PowerState::On).await.is_ok());
        assert!(gateway.set_power("a", PowerState::On).await.is_err());
    }

    #[tokio::test]
    async fn records_calls_in_order() {
        let gateway = ScriptedGateway::new();

        gateway.set_power("tuya_001", PowerState::Off).await.unwrap();
        gateway.read_power("tuya_002").await;

        assert_eq!(
            gateway.calls(),
            vec![
                GatewayCall::SetPower {
                    external_id: "tuya_001".to_string(),
                    state: PowerState::Off,
                },
                GatewayCall::ReadPower {
                    external_id: "tuya_002".to_string(),
                },
            ]
        );
        assert_eq!(gateway.command_count(), 1);
        assert_eq!(gateway.read_count(), 1);
    }

    #[tokio::test]
    async fn readings_default_to_unknown() {
        let gateway = ScriptedGateway::new();
        assert_eq!(gateway.read_power("tuya_009").await, None);

        gateway.set_reading("tuya_009", Some(PowerState::On));
        assert_eq!(gateway.read_power("tuya_009").await, Some(PowerState::On));

        gateway.set_reading("tuya_009", None);
        assert_eq!(gateway.read_power("tuya_009").await, None);
    }

    #[tokio::test]
    async fn clones_share_script() {
        let gateway = ScriptedGateway::new();
        let handle = gateway.clone();

        gateway.set_power("tuya_003", PowerState::On).await.unwrap();

        assert_eq!(handle.command_count(), 1);
    }
}
