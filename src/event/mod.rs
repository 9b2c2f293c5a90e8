// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for device changes.
//!
//! The coordinator publishes a [`DeviceEvent`] whenever a device is added or
//! removed, a power change is confirmed, or a power command fails. The
//! [`EventBus`] fans events out to any number of subscribers.

mod device_event;
mod event_bus;

pub use device_event::DeviceEvent;
pub use event_bus::EventBus;
