// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `hotelctl` library.
//!
//! Failures are split by layer: value validation, communication with the
//! remote control API, and coordinator outcomes. Every failure is returned as
//! a value; an unknown remote status is an `Option::None`, not an error.

use thiserror::Error;

use crate::registry::DeviceId;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The referenced device is not in the registry.
    #[error("device {0} not found")]
    DeviceNotFound(DeviceId),

    /// A command for this device is still outstanding.
    #[error("an operation is already in flight for device {0}")]
    OperationInFlight(DeviceId),

    /// The remote control API did not confirm the power command.
    #[error("remote command for {external_id} failed: {source}")]
    RemoteCommandFailed {
        /// External identifier the command was addressed to.
        external_id: String,
        /// Underlying communication failure.
        #[source]
        source: ProtocolError,
    },

    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred outside of a power command (e.g. building a client).
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl Error {
    /// Returns `true` if the error means the device does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DeviceNotFound(_))
    }

    /// Returns `true` if the remote side rejected or never answered a command.
    #[must_use]
    pub fn is_remote_failure(&self) -> bool {
        matches!(self, Self::RemoteCommandFailed { .. })
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// An unknown device kind string was provided.
    #[error("invalid device kind: {0}")]
    InvalidDeviceKind(String),

    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// A required field was empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A required configuration setting was not provided.
    #[error("missing setting: {0}")]
    MissingSetting(&'static str),

    /// A configuration setting could not be parsed.
    #[error("invalid setting {name}: {value}")]
    InvalidSetting {
        /// Name of the setting.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Errors related to communication with the remote control API.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the remote endpoint failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The remote API answered but refused the command.
    #[error("command rejected: {0}")]
    Rejected(String),

    /// The remote API answered with a body we could not interpret.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::MissingField("room_number");
        assert_eq!(err.to_string(), "missing required field: room_number");
    }

    #[test]
    fn error_from_value_error() {
        let value_err = ValueError::InvalidDeviceKind("heater".to_string());
        let err: Error = value_err.into();
        assert!(matches!(err, Error::Value(ValueError::InvalidDeviceKind(_))));
    }

    #[test]
    fn remote_failure_display_includes_source() {
        let err = Error::RemoteCommandFailed {
            external_id: "tuya_005".to_string(),
            source: ProtocolError::Timeout(500),
        };
        assert_eq!(
            err.to_string(),
            "remote command for tuya_005 failed: request timed out after 500 ms"
        );
        assert!(err.is_remote_failure());
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_predicate() {
        let err = Error::DeviceNotFound(DeviceId::new());
        assert!(err.is_not_found());
        assert!(!err.is_remote_failure());
    }
}
