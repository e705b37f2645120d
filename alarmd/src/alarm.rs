/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core alarm data structures.
//!
//! ```text
//! "5 hello"  ──(intake)──►  Alarm { seconds: 5, deadline: now+5, message }  ──(store)──►  worker  ──►  "(5) hello"
//! ```
//!
//! # Ownership model
//! An [`Alarm`] is created by the intake, **moved** into the store, and
//! **moved** out again by the worker when it is dequeued.  The worker drops it
//! right after firing, so the type system guarantees an alarm can never fire
//! twice.  No field is mutable after construction.

use std::fmt;

use tokio::time::Instant;

// ── Message ───────────────────────────────────────────────────────────────────

/// Maximum message length in characters.
///
/// The C buffer was `char[64]`: 63 characters plus the terminator.
pub const MAX_MESSAGE_LEN: usize = 63;

/// Bounded alarm message text.
///
/// Replaces the fixed in-place buffer with an owned `String` whose length is
/// capped at [`MAX_MESSAGE_LEN`] characters.  Truncation is explicit and
/// deterministic: the first `MAX_MESSAGE_LEN` characters are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmMessage(String);

impl AlarmMessage {
    /// Build a message from `text`, keeping at most [`MAX_MESSAGE_LEN`]
    /// characters.
    ///
    /// Counts Unicode scalar values, not bytes, so multi-byte text is never
    /// cut in the middle of a character.
    pub fn truncated(text: &str) -> Self {
        match text.char_indices().nth(MAX_MESSAGE_LEN) {
            Some((cut, _)) => Self(text[..cut].to_string()),
            None => Self(text.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlarmMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Deadline / Clock ──────────────────────────────────────────────────────────

/// Absolute due time, in whole seconds on the scheduler [`Clock`].
///
/// Two requests with the same duration submitted within the same second get
/// equal deadlines, which is what the store's tie-break rule operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Deadline(u64);

impl Deadline {
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t+{}s", self.0)
    }
}

/// Monotonic, second-granular scheduler clock.
///
/// Built on [`tokio::time::Instant`] so that tests running with paused time
/// (`#[tokio::test(start_paused = true)]`) see the clock advance exactly as
/// `tokio::time::sleep` advances it.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    /// Start a clock whose second `0` is now.
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Current time, truncated to whole seconds.
    pub fn now(&self) -> Deadline {
        Deadline(self.origin.elapsed().as_secs())
    }

    /// `now() + seconds`.
    pub fn deadline_after(&self, seconds: u32) -> Deadline {
        Deadline(self.now().0.saturating_add(u64::from(seconds)))
    }

    /// Whole seconds left until `deadline`; `0` once it has been reached or
    /// passed.
    pub fn seconds_until(&self, deadline: Deadline) -> u64 {
        deadline.0.saturating_sub(self.now().0)
    }
}

// ── Alarm ─────────────────────────────────────────────────────────────────────

/// One pending timed notification.
///
/// Alarms are anonymous: no identifier is handed back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alarm {
    seconds: u32,
    deadline: Deadline,
    message: AlarmMessage,
}

impl Alarm {
    pub fn new(seconds: u32, deadline: Deadline, message: AlarmMessage) -> Self {
        Self {
            seconds,
            deadline,
            message,
        }
    }

    /// Duration originally requested by the client.
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    pub fn message(&self) -> &AlarmMessage {
        &self.message
    }
}

impl fmt::Display for Alarm {
    /// Firing format: `(<seconds>) <message>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.seconds, self.message)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
