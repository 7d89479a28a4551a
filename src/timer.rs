//! Explicit timers owned by the engine.
//!
//! The engine is synchronous and never sleeps. Deferred work (the settle delay
//! after a library manipulation ends, throttled pan/zoom flushes) is recorded
//! here as a deadline in host milliseconds. The host calls
//! [`crate::engine::EngineCore::tick`] at or after [`Timers::next_deadline`]
//! and the engine drains whatever is due.
//!
//! Every timer has an owner-visible [`TimerId`] so it can be cancelled. Session
//! resets cancel their timers and teardown cancels all of them, so nothing can
//! fire into a session that no longer exists.

#[cfg(test)]
#[path = "timer_test.rs"]
mod timer_test;

use std::collections::BTreeMap;

use crate::doc::LayerId;

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerKind {
    /// End the settle window after a library manipulation of `layer` ended.
    Settle { layer: LayerId },
    /// Apply accumulated pan delta.
    FlushPan,
    /// Apply accumulated wheel delta.
    FlushWheel,
    /// Apply accumulated pinch ratio.
    FlushPinch,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    deadline_ms: f64,
    kind: TimerKind,
}

/// The engine's set of pending timers.
#[derive(Debug, Default)]
pub struct Timers {
    entries: BTreeMap<TimerId, Entry>,
    next_id: u64,
}

impl Timers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire at `deadline_ms`.
    pub fn schedule(&mut self, kind: TimerKind, deadline_ms: f64) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, Entry { deadline_ms, kind });
        id
    }

    /// Cancel a timer. Returns whether it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Cancel every pending timer.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Remove and return every timer due at `now_ms`, earliest first.
    pub fn take_due(&mut self, now_ms: f64) -> Vec<(TimerId, TimerKind)> {
        let mut due: Vec<(TimerId, Entry)> = self
            .entries
            .iter()
            .filter(|(_, e)| e.deadline_ms <= now_ms)
            .map(|(id, e)| (*id, *e))
            .collect();
        for (id, _) in &due {
            self.entries.remove(id);
        }
        due.sort_by(|a, b| a.1.deadline_ms.total_cmp(&b.1.deadline_ms).then(a.0.cmp(&b.0)));
        due.into_iter().map(|(id, e)| (id, e.kind)).collect()
    }

    /// Earliest pending deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<f64> {
        self.entries.values().map(|e| e.deadline_ms).min_by(f64::total_cmp)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Coalesces a high-frequency stream so it is applied at most once per window.
///
/// The first value after a quiet period passes straight through. Values
/// arriving inside the window are folded into a pending value, which the
/// owner applies when its flush timer fires (or when the gesture ends).
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    window_ms: f64,
    last_applied_ms: Option<f64>,
    pending: Option<T>,
    timer: Option<TimerId>,
}

/// Outcome of feeding a value into a [`Throttle`].
#[derive(Debug, Clone, PartialEq)]
pub enum Throttled<T> {
    /// Apply this value now.
    Apply(T),
    /// Value was folded into the pending one; schedule a flush at this deadline
    /// unless one is already scheduled.
    Deferred { flush_at_ms: f64 },
}

impl<T> Throttle<T> {
    #[must_use]
    pub fn new(window_ms: f64) -> Self {
        Self { window_ms: window_ms.max(0.0), last_applied_ms: None, pending: None, timer: None }
    }

    /// Feed a value at `now_ms`. `fold` merges it into an already pending value.
    pub fn push(&mut self, value: T, now_ms: f64, fold: impl FnOnce(T, T) -> T) -> Throttled<T> {
        let within_window = self.last_applied_ms.is_some_and(|last| now_ms - last < self.window_ms);
        if !within_window && self.pending.is_none() {
            self.last_applied_ms = Some(now_ms);
            return Throttled::Apply(value);
        }
        let merged = match self.pending.take() {
            Some(prev) => fold(prev, value),
            None => value,
        };
        self.pending = Some(merged);
        let flush_at_ms = self.last_applied_ms.map_or(now_ms, |last| last + self.window_ms);
        Throttled::Deferred { flush_at_ms }
    }

    /// Take the pending value (if any) as applied at `now_ms`.
    pub fn flush(&mut self, now_ms: f64) -> Option<T> {
        self.timer = None;
        let value = self.pending.take()?;
        self.last_applied_ms = Some(now_ms);
        Some(value)
    }

    /// The flush timer currently scheduled for this throttle.
    #[must_use]
    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Record the flush timer scheduled by the owner.
    pub fn set_timer(&mut self, id: TimerId) {
        self.timer = Some(id);
    }

    /// Drop pending state; returns the timer that should be cancelled.
    pub fn reset(&mut self) -> Option<TimerId> {
        self.pending = None;
        self.last_applied_ms = None;
        self.timer.take()
    }
}
