// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the registry, gateways and coordinator.
//!
//! - [`DeviceKind`] - Closed set of device categories (light, fan, AC, ...)
//! - [`PowerState`] - On/Off state of a device

mod device_kind;
mod power;

pub use device_kind::DeviceKind;
pub use power::PowerState;
