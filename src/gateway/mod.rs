// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary to the remote device-control API.
//!
//! The [`Gateway`] trait is the only thing the coordinator knows about the
//! remote side. Every call is latent and may fail; failures come back as
//! values, never as panics.
//!
//! # Implementations
//!
//! - [`HttpGateway`]: REST client for the cloud control API (feature `http`)
//! - [`SimulatedGateway`]: fixed latency plus random failures, for demos
//! - [`ScriptedGateway`]: deterministic test double that records every call

#[cfg(feature = "http")]
mod http;
mod scripted;
mod simulated;

#[cfg(feature = "http")]
pub use http::{HttpConfig, HttpGateway};
pub use scripted::{GatewayCall, ScriptedGateway};
pub use simulated::SimulatedGateway;

use std::future::Future;
use std::time::Duration;

use crate::error::ProtocolError;
use crate::types::PowerState;

/// Capability to command and query the power state of remote devices.
///
/// Implementations are stateless with respect to the registry: they never
/// touch local device records.
pub trait Gateway: Send + Sync {
    /// Sends a power command to the device known remotely as `external_id`.
    ///
    /// Resolves to `Ok(())` only once the remote side confirmed the command.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command could not be delivered or was
    /// refused.
    fn set_power(
        &self,
        external_id: &str,
        state: PowerState,
    ) -> impl Future<Output = Result<(), ProtocolError>> + Send;

    /// Reads the current power state of a remote device.
    ///
    /// Returns `None` when the remote side cannot answer. That is "unknown",
    /// not "off".
    fn read_power(&self, external_id: &str) -> impl Future<Output = Option<PowerState>> + Send;
}

/// Converts a duration to whole milliseconds for error reporting.
pub(crate) fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
