/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Deadline-ordered alarm store.
//!
//! [`AlarmStore`] is the plain ordered collection; [`SharedAlarmStore`] is
//! the mutex-guarded handle that the intake and the worker both hold.
//!
//! # Ordering
//! Entries are kept ascending by [`Deadline`](crate::alarm::Deadline).  A new alarm is placed
//! **before** any existing alarm with an equal deadline, so among alarms that
//! share a deadline the most recently submitted one fires first.
//!
//! # Locking discipline
//! Every [`SharedAlarmStore`] method takes the lock, does one O(n) operation
//! and releases it before returning.  No guard ever escapes a method, which
//! makes it impossible for a caller to hold the lock across an `.await`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::alarm::Alarm;
use crate::error::FatalError;

// ── AlarmStore ────────────────────────────────────────────────────────────────

/// Ordered sequence of pending alarms.  Sole owner of queued entries.
#[derive(Debug, Default)]
pub struct AlarmStore {
    alarms: VecDeque<Alarm>,
}

impl AlarmStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `alarm`, keeping the deadline order and the newest-first
    /// tie-break.
    ///
    /// # Errors
    /// [`FatalError::Exhausted`] if room for one more entry cannot be
    /// reserved.  There is no other rejection.
    pub fn insert(&mut self, alarm: Alarm) -> Result<(), FatalError> {
        self.alarms
            .try_reserve(1)
            .map_err(|_| FatalError::Exhausted { operation: "insert" })?;

        // First entry whose deadline is >= the newcomer's; equal deadlines
        // therefore end up behind the new alarm.
        let pos = self
            .alarms
            .partition_point(|queued| queued.deadline() < alarm.deadline());
        self.alarms.insert(pos, alarm);
        Ok(())
    }

    /// Remove and return the head (earliest deadline), or `None` if empty.
    pub fn remove_earliest(&mut self) -> Option<Alarm> {
        self.alarms.pop_front()
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    /// Iterate in firing order.
    pub fn iter(&self) -> impl Iterator<Item = &Alarm> {
        self.alarms.iter()
    }
}

// ── SharedAlarmStore ──────────────────────────────────────────────────────────

/// Cloneable, mutex-guarded handle to one [`AlarmStore`].
///
/// Cloning shares the same store; build one per scheduler instance and pass
/// clones to the intake and the worker.
#[derive(Debug, Clone, Default)]
pub struct SharedAlarmStore {
    inner: Arc<Mutex<AlarmStore>>,
}

impl SharedAlarmStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self, operation: &'static str) -> Result<MutexGuard<'_, AlarmStore>, FatalError> {
        self.inner
            .lock()
            .map_err(|_| FatalError::LockPoisoned { operation })
    }

    /// Insert under exclusive access.
    pub fn insert(&self, alarm: Alarm) -> Result<(), FatalError> {
        self.lock("insert")?.insert(alarm)
    }

    /// Remove the head under exclusive access.
    pub fn remove_earliest(&self) -> Result<Option<Alarm>, FatalError> {
        Ok(self.lock("remove_earliest")?.remove_earliest())
    }

    pub fn len(&self) -> Result<usize, FatalError> {
        Ok(self.lock("len")?.len())
    }

    /// Owned copy of the pending alarms in firing order.
    ///
    /// Used for the debug listing and by tests; the lock is released before
    /// the copy is returned.
    pub fn snapshot(&self) -> Result<Vec<Alarm>, FatalError> {
        Ok(self.lock("snapshot")?.iter().cloned().collect())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
