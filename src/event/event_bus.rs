// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting device events.

use tokio::sync::broadcast;

use super::DeviceEvent;

/// Event bus for broadcasting device events to multiple subscribers.
///
/// Backed by a tokio broadcast channel with a fixed capacity. A subscriber
/// that falls behind by more than the capacity loses the oldest events and
/// receives `RecvError::Lagged`.
///
/// # Examples
///
/// ```
/// use hotelctl_lib::event::{DeviceEvent, EventBus};
/// use hotelctl_lib::registry::DeviceId;
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(DeviceEvent::device_added(DeviceId::new()));
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DeviceEvent>,
}

impl EventBus {
    /// Default channel capacity.
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// Without subscribers the event is dropped.
    pub fn publish(&self, event: DeviceEvent) {
        // no subscribers is not an error
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
