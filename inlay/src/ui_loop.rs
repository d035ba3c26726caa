// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use crate::arena::{Arena, Key};

/// Identifies a timer registered with a [`UiLoop`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(Key);

/// A timer firing, delivered by [`UiLoop::poll_until`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimerEvent<T> {
    /// The timer that fired.
    pub timer: TimerId,
    /// The value the timer was registered with.
    pub target: T,
    /// The loop time at which the timer fired.
    pub due: Duration,
}

#[derive(Debug)]
struct Timer<T> {
    target: T,
    interval: Duration,
    next_due: Duration,
}

/// A single-threaded timer registry driven by a virtual clock.
///
/// The host advances the clock; due timers fire one at a time in deadline order (ties in
/// registration slot order). A cancelled timer is removed from the registry immediately, so
/// it cannot fire afterwards, even if it was already due within the current advance.
#[derive(Debug)]
pub struct UiLoop<T> {
    now: Duration,
    timers: Arena<Timer<T>>,
}

impl<T> Default for UiLoop<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            timers: Arena::default(),
        }
    }
}

impl<T: Copy> UiLoop<T> {
    /// Creates a loop at time zero with no timers.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current loop time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Registers a timer that fires every `interval`, starting one interval from now.
    ///
    /// A zero interval is treated as one nanosecond.
    pub fn schedule_repeating(&mut self, interval: Duration, target: T) -> TimerId {
        let interval = interval.max(Duration::from_nanos(1));
        TimerId(self.timers.insert(Timer {
            target,
            interval,
            next_due: self.now + interval,
        }))
    }

    /// Unregisters `timer`. Returns `false` if it was not registered.
    pub fn cancel(&mut self, timer: TimerId) -> bool {
        self.timers.remove(timer.0).is_some()
    }

    /// Returns `true` if `timer` is registered.
    pub fn is_scheduled(&self, timer: TimerId) -> bool {
        self.timers.get(timer.0).is_some()
    }

    /// The number of registered timers.
    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    /// Fires the earliest timer due at or before `deadline`.
    ///
    /// Moves the clock to that timer's due time and reschedules it. When nothing is due,
    /// moves the clock to `deadline` and returns `None`.
    pub fn poll_until(&mut self, deadline: Duration) -> Option<TimerEvent<T>> {
        let next = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.next_due <= deadline)
            .min_by_key(|(key, timer)| (timer.next_due, *key))
            .map(|(key, _)| key);
        let Some(key) = next else {
            self.now = self.now.max(deadline);
            return None;
        };
        let timer = self.timers.get_mut(key)?;
        let due = timer.next_due;
        timer.next_due += timer.interval;
        self.now = due;
        Some(TimerEvent {
            timer: TimerId(key),
            target: timer.target,
            due,
        })
    }

    /// Advances the clock by `dt`, passing every timer firing to `on_fire` in order.
    pub fn advance(&mut self, dt: Duration, mut on_fire: impl FnMut(TimerEvent<T>)) {
        let deadline = self.now + dt;
        while let Some(event) = self.poll_until(deadline) {
            on_fire(event);
        }
    }
}
