// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory store of device records.
//!
//! The [`Registry`] keeps devices in insertion order and answers queries
//! (`find`, `list`, `filter_by_kind`, `by_room`, `stats`) without touching the
//! network. Adding and removing records is public; changing a device's power
//! status is reserved for the [`Coordinator`](crate::sync::Coordinator),
//! which only does so after the remote side confirmed the change.
//!
//! # Examples
//!
//! ```
//! use hotelctl_lib::registry::{NewDevice, Registry};
//! use hotelctl_lib::types::DeviceKind;
//!
//! let registry = Registry::new();
//! let fan = registry.add(NewDevice::new("Room 101 Fan", DeviceKind::Fan, "101", "tuya_005"));
//!
//! assert_eq!(registry.find(fan.id()).unwrap().name(), "Room 101 Fan");
//! assert!(registry.remove(fan.id()).is_some());
//! assert!(registry.remove(fan.id()).is_none());
//! ```

mod device;
mod device_id;
mod device_registry;
mod seed;

pub use device::{Device, NewDevice};
pub use device_id::DeviceId;
pub use device_registry::{DeviceStats, Registry, RoomGroup};
pub use seed::demo_devices;
