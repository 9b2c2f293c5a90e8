// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

use crate::registry::DeviceId;
use crate::types::PowerState;

/// Events emitted by the coordinator.
///
/// A presentation layer turns these into notifications: a device was added or
/// removed, a power command was confirmed, or a power command failed and the
/// displayed state stays as it was.
///
/// # Examples
///
/// ```
/// use hotelctl_lib::event::DeviceEvent;
/// use hotelctl_lib::registry::DeviceId;
/// use hotelctl_lib::types::PowerState;
///
/// let device_id = DeviceId::new();
/// let event = DeviceEvent::power_changed(device_id, PowerState::On);
///
/// assert_eq!(event.device_id(), device_id);
/// assert!(event.is_power_change());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DeviceEvent {
    /// A device was added to the registry.
    DeviceAdded {
        /// The ID of the added device.
        device_id: DeviceId,
    },

    /// A device was removed from the registry.
    DeviceRemoved {
        /// The ID of the removed device.
        device_id: DeviceId,
    },

    /// The remote side confirmed a new power state and it was stored.
    PowerChanged {
        /// The ID of the device.
        device_id: DeviceId,
        /// The confirmed state.
        state: PowerState,
    },

    /// A power command failed; the stored state is unchanged.
    CommandFailed {
        /// The ID of the device.
        device_id: DeviceId,
        /// Human-readable failure reason.
        reason: String,
    },
}

impl DeviceEvent {
    /// Returns the device ID associated with this event.
    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        match self {
            Self::DeviceAdded { device_id }
            | Self::DeviceRemoved { device_id }
            | Self::PowerChanged { device_id, .. }
            | Self::CommandFailed { device_id, .. } => *device_id,
        }
    }

    /// Returns `true` if this is a device lifecycle event (added/removed).
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::DeviceAdded { .. } | Self::DeviceRemoved { .. })
    }

    /// Returns `true` if this is a confirmed power change.
    #[must_use]
    pub fn is_power_change(&self) -> bool {
        matches!(self, Self::PowerChanged { .. })
    }

    /// Returns `true` if this reports a failed command.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }

    /// Creates a device added event.
    #[must_use]
    pub fn device_added(device_id: DeviceId) -> Self {
        Self::DeviceAdded { device_id }
    }

    /// Creates a device removed event.
    #[must_use]
    pub fn device_removed(device_id: DeviceId) -> Self {
        Self::DeviceRemoved { device_id }
    }

    /// Creates a power changed event.
    #[must_use]
    pub fn power_changed(device_id: DeviceId, state: PowerState) -> Self {
        Self::PowerChanged { device_id, state }
    }

    /// Creates a command failed event.
    #[must_use]
    pub fn command_failed(device_id: DeviceId, reason: impl Into<String>) -> Self {
        Self::CommandFailed {
            device_id,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_extraction() {
        let id = DeviceId::new();

        assert_eq!(DeviceEvent::device_added(id).device_id(), id);
        assert_eq!(DeviceEvent::device_removed(id).device_id(), id);
        assert_eq!(DeviceEvent::power_changed(id, PowerState::Off).device_id(), id);
        assert_eq!(DeviceEvent::command_failed(id, "timeout").device_id(), id);
    }

    #[test]
    fn classification() {
        let id = DeviceId::new();

        assert!(DeviceEvent::device_added(id).is_lifecycle());
        assert!(DeviceEvent::device_removed(id).is_lifecycle());
        assert!(!DeviceEvent::power_changed(id, PowerState::On).is_lifecycle());

        assert!(DeviceEvent::power_changed(id, PowerState::On).is_power_change());
        assert!(DeviceEvent::command_failed(id, "x").is_failure());
        assert!(!DeviceEvent::command_failed(id, "x").is_power_change());
    }

    #[test]
    fn serializes_with_event_tag() {
        let id: DeviceId = "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8".parse().unwrap();
        let json = serde_json::to_value(DeviceEvent::power_changed(id, PowerState::On)).unwrap();

        assert_eq!(json["event"], "power_changed");
        assert_eq!(json["device_id"], "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8");
        assert_eq!(json["state"], "ON");
    }
}
