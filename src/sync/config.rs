// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinator configuration.

use std::time::Duration;

use crate::event::EventBus;

/// Settings for a [`Coordinator`](super::Coordinator).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use hotelctl_lib::sync::{RetryPolicy, SyncConfig};
///
/// let config = SyncConfig::new()
///     .with_command_timeout(Duration::from_secs(2))
///     .with_retry(RetryPolicy::new().with_max_retries(2));
///
/// assert_eq!(config.command_timeout, Some(Duration::from_secs(2)));
/// ```
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Upper bound for a single remote call. `None` waits indefinitely.
    pub command_timeout: Option<Duration>,
    /// What to do after a failed power command.
    pub retry: RetryPolicy,
    /// Capacity of the event channel.
    pub event_capacity: usize,
}

impl SyncConfig {
    /// Creates a configuration with defaults: no timeout, no retries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds every remote call by `timeout`; expiry counts as a failure.
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }

    /// Sets the retry policy for power commands.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the event channel capacity (minimum 1).
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            command_timeout: None,
            retry: RetryPolicy::default(),
            event_capacity: EventBus::DEFAULT_CAPACITY,
        }
    }
}

/// Retry policy for failed power commands.
///
/// The default makes a single attempt. Retries are opt-in, with exponential
/// backoff between attempts. The default delays only take effect once
/// `max_retries` is raised above zero; pick delays that suit the remote API.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use hotelctl_lib::sync::RetryPolicy;
///
/// let policy = RetryPolicy::new()
///     .with_max_retries(3)
///     .with_initial_delay(Duration::from_millis(100))
///     .with_max_delay(Duration::from_secs(1));
///
/// assert!(policy.should_retry(0));
/// assert!(!policy.should_retry(3));
/// assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for the delay between retries.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub backoff_multiplier: f32,
}

impl RetryPolicy {
    /// Creates a policy that never retries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Alias for [`new`](Self::new), for readability at call sites.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Sets the maximum number of retries.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay before the first retry.
    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the backoff multiplier.
    #[must_use]
    pub fn with_backoff_multiplier(mut self, multiplier: f32) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Calculates the delay before retry number `attempt` (0-based).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return self.initial_delay.min(self.max_delay);
        }

        let multiplier = self
            .backoff_multiplier
            .powi(i32::try_from(attempt).unwrap_or(i32::MAX));

        #[allow(clippy::cast_precision_loss)]
        let delay_ms = self.initial_delay.as_millis() as f32 * multiplier;

        // delay_ms is non-negative; the cast saturates on overflow
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let delay = Duration::from_millis(delay_ms as u64);

        delay.min(self.max_delay)
    }

    /// Returns true if another attempt should follow failed attempt `attempt`.
    #[must_use]
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

impl Default for RetryPolicy {
    // delays are inert while max_retries is 0
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_make_a_single_attempt() {
        let config = SyncConfig::default();

        assert!(config.command_timeout.is_none());
        assert!(!config.retry.should_retry(0));
        assert_eq!(config.event_capacity, 256);
    }

    #[test]
    fn event_capacity_has_floor() {
        assert_eq!(SyncConfig::new().with_event_capacity(0).event_capacity, 1);
    }

    #[test]
    fn should_retry_respects_max() {
        let policy = RetryPolicy::new().with_max_retries(2);

        assert!(policy.should_retry(0));
        assert!(policy.should_retry(1));
        assert!(!policy.should_retry(2));
    }

    #[test]
    fn backoff_grows_and_is_capped() {
        let policy = RetryPolicy::new()
            .with_initial_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(500))
            .with_backoff_multiplier(2.0);

        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(30), Duration::from_millis(500));
    }

    #[test]
    fn none_equals_default() {
        assert_eq!(RetryPolicy::none(), RetryPolicy::default());
    }
}
