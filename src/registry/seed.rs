// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sample hotel inventory for demos and manual testing.

use crate::types::DeviceKind;

use super::NewDevice;

/// Returns the sample inventory: 14 devices across the lobby, two guest
/// rooms, the electrical room and the main entrance.
///
/// External ids run from `tuya_001` to `tuya_014` in list order.
///
/// # Examples
///
/// ```
/// use hotelctl_lib::registry::{demo_devices, Registry};
///
/// let registry = Registry::with_devices(demo_devices());
/// assert_eq!(registry.stats().total, 14);
/// ```
#[must_use]
pub fn demo_devices() -> Vec<NewDevice> {
    use DeviceKind::{Ac, Fan, Light, Lock, Mcb, Tv};

    let rows: [(&str, DeviceKind, bool, &str); 14] = [
        ("Lobby Chandelier", Light, true, "LOBBY"),
        ("Room 101 Light", Light, false, "101"),
        ("Room 102 Light", Light, true, "102"),
        ("Lobby Ceiling Fan", Fan, true, "LOBBY"),
        ("Room 101 Fan", Fan, false, "101"),
        ("Room 101 AC", Ac, true, "101"),
        ("Room 102 AC", Ac, true, "102"),
        ("Lobby TV", Tv, false, "LOBBY"),
        ("Room 101 TV", Tv, true, "101"),
        ("Main MCB", Mcb, true, "ELEC"),
        ("Floor 1 MCB", Mcb, true, "ELEC"),
        ("Room 101 Lock", Lock, true, "101"),
        ("Room 102 Lock", Lock, false, "102"),
        ("Main Entrance Lock", Lock, true, "MAIN"),
    ];

    rows.into_iter()
        .enumerate()
        .map(|(i, (name, kind, status, room))| {
            NewDevice::new(name, kind, room, format!("tuya_{:03}", i + 1)).with_status(status)
        })
        .collect()
}
