// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device in-flight markers.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::registry::DeviceId;

#[derive(Debug)]
struct Inner {
    ids: Mutex<HashSet<DeviceId>>,
    busy_tx: watch::Sender<bool>,
}

/// Set of devices with an outstanding remote operation.
///
/// A marker is held by an [`InFlightGuard`] and released when the guard
/// drops, so it clears on success, failure and cancellation alike.
#[derive(Debug, Clone)]
pub(crate) struct InFlight {
    inner: Arc<Inner>,
}

impl InFlight {
    pub(crate) fn new() -> Self {
        let (busy_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                ids: Mutex::new(HashSet::new()),
                busy_tx,
            }),
        }
    }

    /// Marks `id` as in flight, or returns `None` if it already is.
    pub(crate) fn try_begin(&self, id: DeviceId) -> Option<InFlightGuard> {
        let mut ids = self.inner.ids.lock();
        if !ids.insert(id) {
            return None;
        }
        self.inner.busy_tx.send_replace(true);
        drop(ids);

        Some(InFlightGuard {
            inner: Arc::clone(&self.inner),
            id,
        })
    }

    pub(crate) fn contains(&self, id: DeviceId) -> bool {
        self.inner.ids.lock().contains(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.ids.lock().len()
    }

    pub(crate) fn watch(&self) -> watch::Receiver<bool> {
        self.inner.busy_tx.subscribe()
    }
}

/// Releases its device's in-flight marker on drop.
#[derive(Debug)]
pub(crate) struct InFlightGuard {
    inner: Arc<Inner>,
    id: DeviceId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut ids = self.inner.ids.lock();
        ids.remove(&self.id);
        let busy = !ids.is_empty();
        self.inner.busy_tx.send_if_modified(|current| {
            let changed = *current != busy;
            *current = busy;
            changed
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_on_same_device_is_refused() {
        let in_flight = InFlight::new();
        let id = DeviceId::new();

        let guard = in_flight.try_begin(id);
        assert!(guard.is_some());
        assert!(in_flight.try_begin(id).is_none());
        assert!(in_flight.contains(id));
    }

    #[test]
    fn different_devices_are_independent() {
        let in_flight = InFlight::new();

        let _a = in_flight.try_begin(DeviceId::new()).unwrap();
        let _b = in_flight.try_begin(DeviceId::new()).unwrap();

        assert_eq!(in_flight.len(), 2);
    }

    #[test]
    fn drop_releases_marker() {
        let in_flight = InFlight::new();
        let id = DeviceId::new();

        drop(in_flight.try_begin(id).unwrap());

        assert!(!in_flight.contains(id));
        assert!(in_flight.try_begin(id).is_some());
    }

    #[test]
    fn watch_tracks_busy_flag() {
        let in_flight = InFlight::new();
        let rx = in_flight.watch();
        assert!(!*rx.borrow());

        let a = in_flight.try_begin(DeviceId::new()).unwrap();
        let b = in_flight.try_begin(DeviceId::new()).unwrap();
        assert!(*rx.borrow());

        drop(a);
        assert!(*rx.borrow());

        drop(b);
        assert!(!*rx.borrow());
    }
}
