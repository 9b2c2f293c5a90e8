// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state of a controllable device.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Represents the power state of a device.
///
/// Devices only track a single on/off switch. A `bool` status converts
/// losslessly in both directions.
///
/// # Examples
///
/// ```
/// use hotelctl_lib::types::PowerState;
///
/// let on = PowerState::from(true);
/// assert_eq!(on, PowerState::On);
/// assert_eq!(on.inverted(), PowerState::Off);
/// assert_eq!(on.as_str(), "ON");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PowerState {
    /// Power is off.
    Off,
    /// Power is on.
    On,
}

impl PowerState {
    /// Returns the display string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }

    /// Returns `true` if the device is powered.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Returns the opposite state.
    #[must_use]
    pub const fn inverted(&self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OFF" | "0" | "FALSE" => Ok(Self::Off),
            "ON" | "1" | "TRUE" => Ok(Self::On),
            _ => Err(ValueError::InvalidPowerState(s.to_string())),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl From<PowerState> for bool {
    fn from(state: PowerState) -> Self {
        state.is_on()
    }
}
