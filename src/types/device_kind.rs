// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed set of device categories found in a hotel.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Category of a controllable device.
///
/// The kind is fixed when a device is added and drives how a presentation
/// layer groups and labels it.
///
/// # Examples
///
/// ```
/// use hotelctl_lib::types::DeviceKind;
///
/// let kind: DeviceKind = "mcb".parse().unwrap();
/// assert_eq!(kind, DeviceKind::Mcb);
/// assert_eq!(kind.label(), "MCB");
/// assert_eq!(kind.description(), "Main circuit breakers");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Room lighting.
    Light,
    /// Ceiling and exhaust fans.
    Fan,
    /// Air conditioning unit.
    Ac,
    /// Television set.
    Tv,
    /// Miniature circuit breaker.
    Mcb,
    /// Smart door lock.
    Lock,
}

impl DeviceKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 6] = [
        Self::Light,
        Self::Fan,
        Self::Ac,
        Self::Tv,
        Self::Mcb,
        Self::Lock,
    ];

    /// Returns the wire/identifier form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Fan => "fan",
            Self::Ac => "ac",
            Self::Tv => "tv",
            Self::Mcb => "mcb",
            Self::Lock => "lock",
        }
    }

    /// Returns the plural label used for tabs and headings.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Light => "Lights",
            Self::Fan => "Fans",
            Self::Ac => "AC",
            Self::Tv => "TV",
            Self::Mcb => "MCB",
            Self::Lock => "Lock",
        }
    }

    /// Returns a one-line description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Light => "Room lighting control",
            Self::Fan => "Ceiling and exhaust fans",
            Self::Ac => "Air conditioning units",
            Self::Tv => "Television sets",
            Self::Mcb => "Main circuit breakers",
            Self::Lock => "Smart door locks",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| ValueError::InvalidDeviceKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Light".parse::<DeviceKind>().unwrap(), DeviceKind::Light);
        assert_eq!("AC".parse::<DeviceKind>().unwrap(), DeviceKind::Ac);
        assert_eq!(" lock ".parse::<DeviceKind>().unwrap(), DeviceKind::Lock);
    }

    #[test]
    fn parse_rejects_unknown_kind() {
        let err = "heater".parse::<DeviceKind>().unwrap_err();
        assert_eq!(err, ValueError::InvalidDeviceKind("heater".to_string()));
    }

    #[test]
    fn display_matches_as_str() {
        for kind in DeviceKind::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&DeviceKind::Tv).unwrap();
        assert_eq!(json, "\"tv\"");
        let kind: DeviceKind = serde_json::from_str("\"mcb\"").unwrap();
        assert_eq!(kind, DeviceKind::Mcb);
    }
}
