// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device records held by the registry.

use chrono::{DateTime, Utc};

use crate::error::ValueError;
use crate::types::{DeviceKind, PowerState};

use super::DeviceId;

/// A controllable physical unit as known to the registry.
///
/// Records are snapshots: the registry hands out clones, so a `Device` held
/// by a caller never changes under it. Only the coordinator can change the
/// stored `status`, and only after the remote side confirmed the command.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    id: DeviceId,
    name: String,
    #[serde(rename = "type")]
    kind: DeviceKind,
    status: bool,
    room_number: String,
    external_device_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Device {
    /// Builds a stored record from add-time fields.
    pub(crate) fn from_new(new: NewDevice, now: DateTime<Utc>) -> Self {
        Self {
            id: DeviceId::new(),
            name: new.name,
            kind: new.kind,
            status: new.status,
            room_number: normalize_room(&new.room_number),
            external_device_id: new.external_device_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Records a confirmed status and bumps `updated_at`.
    pub(crate) fn confirm_status(&mut self, status: bool, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    /// Returns the registry identifier.
    #[must_use]
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the device category.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Returns the last confirmed power status (`true` = on).
    #[must_use]
    pub fn status(&self) -> bool {
        self.status
    }

    /// Returns the last confirmed status as a [`PowerState`].
    #[must_use]
    pub fn power_state(&self) -> PowerState {
        PowerState::from(self.status)
    }

    /// Returns the uppercase room identifier.
    #[must_use]
    pub fn room_number(&self) -> &str {
        &self.room_number
    }

    /// Returns the identifier used by the remote control API.
    #[must_use]
    pub fn external_device_id(&self) -> &str {
        &self.external_device_id
    }

    /// Returns when the record was added.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the status was last confirmed (or the creation time).
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

fn normalize_room(room: &str) -> String {
    room.trim().to_uppercase()
}

/// Fields supplied when adding a device.
///
/// # Examples
///
/// ```
/// use hotelctl_lib::registry::NewDevice;
/// use hotelctl_lib::types::DeviceKind;
///
/// let new = NewDevice::new("Room 101 Fan", DeviceKind::Fan, "101", "tuya_005");
/// assert!(new.validate().is_ok());
/// assert!(!new.status());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDevice {
    name: String,
    #[serde(rename = "type")]
    kind: DeviceKind,
    #[serde(default)]
    status: bool,
    room_number: String,
    external_device_id: String,
}

impl NewDevice {
    /// Creates add-time fields for a device that starts switched off.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: DeviceKind,
        room_number: impl Into<String>,
        external_device_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            status: false,
            room_number: room_number.into(),
            external_device_id: external_device_id.into(),
        }
    }

    /// Sets the initial status, as last known before the record was added.
    #[must_use]
    pub fn with_status(mut self, status: bool) -> Self {
        self.status = status;
        self
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the device category.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Returns the initial status.
    #[must_use]
    pub fn status(&self) -> bool {
        self.status
    }

    /// Returns the room number as entered.
    #[must_use]
    pub fn room_number(&self) -> &str {
        &self.room_number
    }

    /// Returns the external identifier.
    #[must_use]
    pub fn external_device_id(&self) -> &str {
        &self.external_device_id
    }

    /// Checks that every required field is filled in.
    ///
    /// The external identifier is not checked against the remote side.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::MissingField` for the first blank field.
    pub fn validate(&self) -> Result<(), ValueError> {
        if self.name.trim().is_empty() {
            return Err(ValueError::MissingField("name"));
        }
        if self.room_number.trim().is_empty() {
            return Err(ValueError::MissingField("room_number"));
        }
        if self.external_device_id.trim().is_empty() {
            return Err(ValueError::MissingField("external_device_id"));
        }
        Ok(())
    }
}
