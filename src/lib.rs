// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `HotelCtl` Lib - device registry and power synchronization for hotel rooms.
//!
//! This library keeps an in-memory inventory of room devices (lights, fans,
//! air conditioners, TVs, breakers, locks) and switches them on and off
//! through a remote control API. A device's stored status only changes after
//! the remote side confirmed the command.
//!
//! # Building Blocks
//!
//! - [`Registry`]: the device inventory with room grouping and statistics
//! - [`Gateway`]: the boundary to the remote API, with an HTTP client, a
//!   simulator and a scripted test double
//! - [`Coordinator`]: confirm-before-commit power changes with per-device
//!   in-flight markers and an event stream
//!
//! # Quick Start
//!
//! ## Simulated Devices
//!
//! ```no_run
//! use hotelctl_lib::gateway::SimulatedGateway;
//! use hotelctl_lib::registry::{Registry, demo_devices};
//! use hotelctl_lib::Coordinator;
//!
//! #[tokio::main]
//! async fn main() -> hotelctl_lib::Result<()> {
//!     let registry = Registry::with_devices(demo_devices());
//!     let coordinator = Coordinator::with_registry(SimulatedGateway::new(), registry);
//!
//!     let first = coordinator.list_devices()[0].id();
//!     let device = coordinator.toggle(first).await?;
//!     println!("{} is now {}", device.name(), device.power_state());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Cloud API
//!
//! ```no_run
//! use hotelctl_lib::gateway::HttpConfig;
//! use hotelctl_lib::registry::NewDevice;
//! use hotelctl_lib::{Coordinator, DeviceKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = HttpConfig::from_env()?.into_gateway()?;
//!     let coordinator = Coordinator::new(gateway);
//!
//!     let lock = coordinator.add_device(NewDevice::new(
//!         "Room 201 Door Lock",
//!         DeviceKind::Lock,
//!         "201",
//!         "tuya_014",
//!     ))?;
//!     coordinator.toggle(lock.id()).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Watching Changes
//!
//! ```no_run
//! use hotelctl_lib::gateway::SimulatedGateway;
//! use hotelctl_lib::Coordinator;
//!
//! # async fn watch() {
//! let coordinator = Coordinator::new(SimulatedGateway::new());
//! let mut events = coordinator.subscribe();
//!
//! while let Ok(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! # }
//! ```

pub mod error;
pub mod event;
pub mod gateway;
pub mod registry;
pub mod sync;
pub mod types;

pub use error::{Error, ProtocolError, Result, ValueError};
pub use event::{DeviceEvent, EventBus};
pub use gateway::{Gateway, GatewayCall, ScriptedGateway, SimulatedGateway};
#[cfg(feature = "http")]
pub use gateway::{HttpConfig, HttpGateway};
pub use registry::{Device, DeviceId, DeviceStats, NewDevice, Registry, RoomGroup, demo_devices};
pub use sync::{Coordinator, RetryPolicy, SyncConfig};
pub use types::{DeviceKind, PowerState};
