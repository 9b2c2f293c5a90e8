// SPDX-License-Identifier: MPL-2.0

//! Demo program: load the sample hotel inventory and toggle devices against
//! the simulated gateway (500 ms per command, about 1 in 20 commands fails).
//!
//! # Usage
//!
//! ```bash
//! cargo run --example console -- [toggles]
//! ```
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=hotelctl_lib=debug cargo run --example console -- 6
//! ```

use std::env;

use hotelctl_lib::gateway::SimulatedGateway;
use hotelctl_lib::registry::{Registry, demo_devices};
use hotelctl_lib::{Coordinator, DeviceEvent, DeviceStats};

fn print_stats(stats: DeviceStats) {
    println!(
        "Devices: {} total, {} online, {} offline",
        stats.total, stats.online, stats.offline
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let toggles: usize = match env::args().nth(1) {
        Some(raw) => raw.parse()?,
        None => 4,
    };

    let coordinator =
        Coordinator::with_registry(SimulatedGateway::new(), Registry::with_devices(demo_devices()));
    let mut events = coordinator.subscribe();

    print_stats(coordinator.device_stats());
    println!();

    for room in coordinator.devices_by_room() {
        println!("Room {}", room.room_number);
        for device in &room.devices {
            println!(
                "  [{:>3}] {:<28} {:<16} {}",
                device.power_state().as_str(),
                device.name(),
                device.kind().label(),
                device.external_device_id()
            );
        }
    }
    println!();

    for device in coordinator.list_devices().into_iter().take(toggles) {
        println!("Toggling {}...", device.name());
        match coordinator.toggle(device.id()).await {
            Ok(updated) => println!("  {} is now {}", updated.name(), updated.power_state()),
            Err(e) => println!("  Failed: {e}"),
        }
    }
    println!();

    while let Ok(event) = events.try_recv() {
        match event {
            DeviceEvent::PowerChanged { device_id, state } => {
                println!("event: {device_id} -> {state}");
            }
            DeviceEvent::CommandFailed { device_id, reason } => {
                println!("event: {device_id} failed ({reason})");
            }
            other => println!("event: {other:?}"),
        }
    }

    println!();
    print_stats(coordinator.device_stats());

    Ok(())
}
