// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory device registry.

use chrono::Utc;
use parking_lot::RwLock;

use crate::types::DeviceKind;

use super::{Device, DeviceId, NewDevice};

/// Aggregate counts over the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct DeviceStats {
    /// Number of devices.
    pub total: usize,
    /// Number of devices whose confirmed status is on.
    pub online: usize,
    /// `total - online`.
    pub offline: usize,
}

/// Devices that share a room number.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomGroup {
    /// The uppercase room identifier.
    pub room_number: String,
    /// Devices in that room, in registry order.
    pub devices: Vec<Device>,
}

/// Ordered, thread-safe collection of device records.
///
/// Insertion order is display order. Every read returns cloned snapshots, and
/// every write replaces a whole record under the write lock, so readers see
/// either the old or the new record and never a mix of both. The lock is never
/// held across an `.await`.
///
/// # Examples
///
/// ```
/// use hotelctl_lib::registry::{NewDevice, Registry};
/// use hotelctl_lib::types::DeviceKind;
///
/// let registry = Registry::new();
/// let device = registry.add(NewDevice::new("Lobby Chandelier", DeviceKind::Light, "lobby", "tuya_001"));
///
/// assert_eq!(device.room_number(), "LOBBY");
/// assert_eq!(registry.stats().total, 1);
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    devices: RwLock<Vec<Device>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with the given records, in order.
    #[must_use]
    pub fn with_devices(devices: impl IntoIterator<Item = NewDevice>) -> Self {
        let registry = Self::new();
        for new in devices {
            registry.add(new);
        }
        registry
    }

    /// Adds a device, assigning a fresh id and timestamps.
    ///
    /// Input is expected to be validated already; see [`NewDevice::validate`].
    pub fn add(&self, new: NewDevice) -> Device {
        let device = Device::from_new(new, Utc::now());
        self.devices.write().push(device.clone());

        tracing::debug!(
            device_id = %device.id(),
            external_id = %device.external_device_id(),
            room = %device.room_number(),
            "Device added to registry"
        );

        device
    }

    /// Removes a device and returns it. Absent ids are a no-op.
    pub fn remove(&self, id: DeviceId) -> Option<Device> {
        let mut devices = self.devices.write();
        let position = devices.iter().position(|d| d.id() == id)?;
        let removed = devices.remove(position);
        drop(devices);

        tracing::debug!(device_id = %id, "Device removed from registry");
        Some(removed)
    }

    /// Returns a snapshot of the device with the given id.
    #[must_use]
    pub fn find(&self, id: DeviceId) -> Option<Device> {
        self.devices.read().iter().find(|d| d.id() == id).cloned()
    }

    /// Returns all devices in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<Device> {
        self.devices.read().clone()
    }

    /// Returns devices of one kind, keeping their relative order.
    #[must_use]
    pub fn filter_by_kind(&self, kind: DeviceKind) -> Vec<Device> {
        self.devices
            .read()
            .iter()
            .filter(|d| d.kind() == kind)
            .cloned()
            .collect()
    }

    /// Groups devices by room, rooms ordered by first appearance.
    #[must_use]
    pub fn by_room(&self) -> Vec<RoomGroup> {
        let mut groups: Vec<RoomGroup> = Vec::new();
        for device in self.devices.read().iter() {
            match groups
                .iter_mut()
                .find(|g| g.room_number == device.room_number())
            {
                Some(group) => group.devices.push(device.clone()),
                None => groups.push(RoomGroup {
                    room_number: device.room_number().to_string(),
                    devices: vec![device.clone()],
                }),
            }
        }
        groups
    }

    /// Computes total/online/offline counts.
    #[must_use]
    pub fn stats(&self) -> DeviceStats {
        let devices = self.devices.read();
        let total = devices.len();
        let online = devices.iter().filter(|d| d.status()).count();
        DeviceStats {
            total,
            online,
            offline: total - online,
        }
    }

    /// Returns the number of devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    /// Returns `true` if the registry holds no devices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }

    /// Stores a remotely confirmed status.
    ///
    /// Returns the updated record, or `None` if the device was removed while
    /// the remote call was outstanding.
    pub(crate) fn commit_status(&self, id: DeviceId, status: bool) -> Option<Device> {
        let mut devices = self.devices.write();
        let device = devices.iter_mut().find(|d| d.id() == id)?;

        let mut updated = device.clone();
        updated.confirm_status(status, Utc::now());
        *device = updated.clone();

        Some(updated)
    }
}
