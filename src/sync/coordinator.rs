// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Confirm-before-commit coordinator.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::error::{Error, ProtocolError};
use crate::event::{DeviceEvent, EventBus};
use crate::gateway::{Gateway, duration_millis};
use crate::registry::{Device, DeviceId, DeviceStats, NewDevice, Registry, RoomGroup};
use crate::types::{DeviceKind, PowerState};

use super::SyncConfig;
use super::in_flight::InFlight;

/// The only component allowed to change a device's power status.
///
/// A toggle reads the device, marks it in flight, asks the gateway to apply
/// the inverted state, and writes the new state to the registry only once the
/// gateway confirmed it. A failed command leaves the registry untouched.
///
/// In-flight markers are per device: an outstanding command on one device does
/// not block others, and a second command on the same device is refused with
/// [`Error::OperationInFlight`] instead of racing the first.
///
/// Cloning is cheap; clones share the registry, gateway, markers and events.
///
/// # Examples
///
/// ```
/// use hotelctl_lib::gateway::ScriptedGateway;
/// use hotelctl_lib::registry::NewDevice;
/// use hotelctl_lib::sync::Coordinator;
/// use hotelctl_lib::types::DeviceKind;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> hotelctl_lib::Result<()> {
/// let coordinator = Coordinator::new(ScriptedGateway::new());
/// let fan = coordinator.add_device(NewDevice::new("Room 101 Fan", DeviceKind::Fan, "101", "tuya_005"))?;
///
/// let fan = coordinator.toggle(fan.id()).await?;
/// assert!(fan.status());
/// assert_eq!(coordinator.device_stats().online, 1);
/// # Ok(())
/// # }
/// ```
pub struct Coordinator<G> {
    registry: Arc<Registry>,
    gateway: Arc<G>,
    in_flight: InFlight,
    event_bus: EventBus,
    config: SyncConfig,
}

impl<G: Gateway> Coordinator<G> {
    /// Creates a coordinator over an empty registry.
    #[must_use]
    pub fn new(gateway: G) -> Self {
        Self::with_registry(gateway, Registry::new())
    }

    /// Creates a coordinator over an existing registry.
    #[must_use]
    pub fn with_registry(gateway: G, registry: Registry) -> Self {
        let config = SyncConfig::default();
        Self {
            registry: Arc::new(registry),
            gateway: Arc::new(gateway),
            in_flight: InFlight::new(),
            event_bus: EventBus::with_capacity(config.event_capacity),
            config,
        }
    }

    /// Applies a configuration.
    ///
    /// Replaces the event bus, so call this before subscribing.
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.event_bus = EventBus::with_capacity(config.event_capacity.max(1));
        self.config = config;
        self
    }

    /// Returns the configuration in use.
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns the registry for read-only queries.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the gateway.
    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribes to device events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.event_bus.subscribe()
    }

    /// Returns the number of active event subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.event_bus.subscriber_count()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns all devices in display order.
    #[must_use]
    pub fn list_devices(&self) -> Vec<Device> {
        self.registry.list()
    }

    /// Returns total/online/offline counts.
    #[must_use]
    pub fn device_stats(&self) -> DeviceStats {
        self.registry.stats()
    }

    /// Returns devices of one kind.
    #[must_use]
    pub fn devices_by_kind(&self, kind: DeviceKind) -> Vec<Device> {
        self.registry.filter_by_kind(kind)
    }

    /// Returns devices grouped by room.
    #[must_use]
    pub fn devices_by_room(&self) -> Vec<RoomGroup> {
        self.registry.by_room()
    }

    /// Returns a snapshot of one device.
    #[must_use]
    pub fn find_device(&self, id: DeviceId) -> Option<Device> {
        self.registry.find(id)
    }

    // =========================================================================
    // Registry changes
    // =========================================================================

    /// Validates and adds a device.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if a required field is blank.
    pub fn add_device(&self, new: NewDevice) -> Result<Device, Error> {
        new.validate()?;

        let device = self.registry.add(new);
        tracing::info!(device_id = %device.id(), name = %device.name(), "Device added");
        self.event_bus.publish(DeviceEvent::device_added(device.id()));

        Ok(device)
    }

    /// Removes a device. Returns `None` if it was not registered.
    ///
    /// A command already in flight for the device still runs to completion,
    /// but its result is not stored.
    pub fn remove_device(&self, id: DeviceId) -> Option<Device> {
        let removed = self.registry.remove(id)?;

        tracing::info!(device_id = %id, name = %removed.name(), "Device removed");
        self.event_bus.publish(DeviceEvent::device_removed(id));

        Some(removed)
    }

    // =========================================================================
    // In-flight state
    // =========================================================================

    /// Returns `true` while any device has an outstanding remote operation.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.len() > 0
    }

    /// Returns `true` while `id` has an outstanding remote operation.
    #[must_use]
    pub fn is_in_flight(&self, id: DeviceId) -> bool {
        self.in_flight.contains(id)
    }

    /// Returns the number of devices with an outstanding remote operation.
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Returns a receiver that follows [`is_busy`](Self::is_busy).
    #[must_use]
    pub fn watch_busy(&self) -> watch::Receiver<bool> {
        self.in_flight.watch()
    }

    // =========================================================================
    // Power commands
    // =========================================================================

    /// Inverts a device's power state through the gateway.
    ///
    /// On success the updated record is returned. On failure the stored state
    /// is exactly what it was before the call.
    ///
    /// # Errors
    ///
    /// - `Error::DeviceNotFound` if the id is unknown (no remote call is made)
    ///   or the device was removed before the command resolved
    /// - `Error::OperationInFlight` if the device already has a command out
    /// - `Error::RemoteCommandFailed` if the gateway did not confirm
    pub async fn toggle(&self, id: DeviceId) -> Result<Device, Error> {
        self.drive(id, None).await
    }

    /// Sets a device's power state through the gateway.
    ///
    /// The command is sent even if the stored state already matches, so the
    /// remote side is brought in line with the record. In that case nothing
    /// is committed: `updated_at` stays put and no event is published.
    ///
    /// # Errors
    ///
    /// Same as [`toggle`](Self::toggle).
    pub async fn set_power(&self, id: DeviceId, state: PowerState) -> Result<Device, Error> {
        self.drive(id, Some(state)).await
    }

    /// Reads a device's state from the remote side.
    ///
    /// A known reading that differs from the stored state is committed as a
    /// confirmed change. `Ok(None)` means the remote side could not answer;
    /// the stored state is left alone.
    ///
    /// # Errors
    ///
    /// - `Error::DeviceNotFound` if the id is unknown
    /// - `Error::OperationInFlight` if a command for the device is outstanding
    pub async fn refresh_status(&self, id: DeviceId) -> Result<Option<PowerState>, Error> {
        let _guard = self
            .in_flight
            .try_begin(id)
            .ok_or(Error::OperationInFlight(id))?;
        let device = self.registry.find(id).ok_or(Error::DeviceNotFound(id))?;
        let external_id = device.external_device_id();

        let reading = match self.config.command_timeout {
            Some(limit) => tokio::time::timeout(limit, self.gateway.read_power(external_id))
                .await
                .unwrap_or(None),
            None => self.gateway.read_power(external_id).await,
        };

        match reading {
            Some(state) if state.is_on() != device.status() => {
                if self.registry.commit_status(id, state.is_on()).is_some() {
                    tracing::info!(device_id = %id, %state, "Remote status differs, stored reading");
                    self.event_bus.publish(DeviceEvent::power_changed(id, state));
                }
            }
            Some(_) => {
                tracing::debug!(device_id = %id, "Remote status matches stored state");
            }
            None => {
                tracing::debug!(device_id = %id, external_id, "Remote status unknown");
            }
        }

        Ok(reading)
    }

    /// Runs one command cycle: Idle -> Requesting -> Committed | Rejected.
    ///
    /// `target` of `None` means "invert the stored state".
    async fn drive(&self, id: DeviceId, target: Option<PowerState>) -> Result<Device, Error> {
        // marker first, then read: the state we invert is the one no other
        // command can change until we are done
        let Some(_guard) = self.in_flight.try_begin(id) else {
            tracing::debug!(device_id = %id, "Command refused, device busy");
            return Err(Error::OperationInFlight(id));
        };

        let device = self.registry.find(id).ok_or(Error::DeviceNotFound(id))?;
        let desired = target.unwrap_or_else(|| device.power_state().inverted());
        let external_id = device.external_device_id();

        tracing::info!(device_id = %id, external_id, state = %desired, "Sending power command");

        match self.send_with_retry(external_id, desired).await {
            Ok(()) if desired.is_on() == device.status() => {
                // remote side confirmed, stored state already matches
                tracing::debug!(device_id = %id, state = %desired, "Power command confirmed, no change");
                self.registry.find(id).ok_or(Error::DeviceNotFound(id))
            }
            Ok(()) => {
                let Some(updated) = self.registry.commit_status(id, desired.is_on()) else {
                    tracing::warn!(device_id = %id, "Device removed while command was in flight");
                    return Err(Error::DeviceNotFound(id));
                };

                tracing::info!(device_id = %id, state = %desired, "Power command confirmed");
                self.event_bus.publish(DeviceEvent::power_changed(id, desired));
                Ok(updated)
            }
            Err(source) => {
                tracing::warn!(device_id = %id, external_id, error = %source, "Power command failed");
                self.event_bus
                    .publish(DeviceEvent::command_failed(id, source.to_string()));
                Err(Error::RemoteCommandFailed {
                    external_id: external_id.to_string(),
                    source,
                })
            }
        }
    }

    async fn send_with_retry(
        &self,
        external_id: &str,
        state: PowerState,
    ) -> Result<(), ProtocolError> {
        let mut attempt = 0;
        loop {
            match self.send_once(external_id, state).await {
                Ok(()) => return Ok(()),
                Err(e) if self.config.retry.should_retry(attempt) => {
                    let delay = self.config.retry.delay_for_attempt(attempt);
                    tracing::debug!(external_id, attempt, ?delay, error = %e, "Retrying power command");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(&self, external_id: &str, state: PowerState) -> Result<(), ProtocolError> {
        match self.config.command_timeout {
            Some(limit) => tokio::time::timeout(limit, self.gateway.set_power(external_id, state))
                .await
                .unwrap_or(Err(ProtocolError::Timeout(duration_millis(limit)))),
            None => self.gateway.set_power(external_id, state).await,
        }
    }
}

impl<G> Clone for Coordinator<G> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            gateway: Arc::clone(&self.gateway),
            in_flight: self.in_flight.clone(),
            event_bus: self.event_bus.clone(),
            config: self.config.clone(),
        }
    }
}

impl<G> std::fmt::Debug for Coordinator<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("devices", &self.registry.len())
            .field("in_flight", &self.in_flight.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
