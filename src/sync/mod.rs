// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State synchronization between the registry and the remote side.
//!
//! The [`Coordinator`] owns the only path that changes a device's power
//! status: a command goes out through a [`Gateway`](crate::gateway::Gateway),
//! and the registry is updated once the gateway confirms it. Nothing is
//! written optimistically.
//!
//! Each device carries its own in-flight marker while a command is
//! outstanding. [`Coordinator::is_busy`] reports whether any marker is set,
//! which is what a UI uses to disable its toggles.

mod config;
mod coordinator;
mod in_flight;

pub use config::{RetryPolicy, SyncConfig};
pub use coordinator::Coordinator;
