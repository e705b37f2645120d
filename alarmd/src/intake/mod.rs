/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Request intake: turns input lines into queued alarms.
//!
//! [`Intake::run`] is the main-thread loop.  It reads one line at a time from
//! any [`AsyncBufRead`] (stdin in production, a byte slice in tests):
//!
//! | Line | Effect |
//! |---|---|
//! | empty | ignored |
//! | `<seconds> <message>` | deadline computed, alarm inserted |
//! | anything else (whitespace only included) | `Bad command` on stderr, line dropped |
//! | end of input | `run` returns – the caller shuts the process down |
//!
//! The store lock is held only inside [`SharedAlarmStore::insert`].

pub mod parse;

pub use parse::{parse_request, Request, RequestError};

use std::io::{ErrorKind, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::alarm::{Alarm, Clock};
use crate::error::FatalError;
use crate::store::SharedAlarmStore;

/// Outcome of submitting a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Blank line, nothing done.
    Blank,
    /// Alarm queued.
    Accepted,
    /// Bad command; the store is untouched.
    Rejected(RequestError),
}

/// Counters reported when intake reaches end of input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntakeSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub blank: usize,
}

/// The request-intake role.
pub struct Intake {
    store: SharedAlarmStore,
    clock: Clock,
    prompt: Option<String>,
}

impl Intake {
    pub fn new(store: SharedAlarmStore, clock: Clock, prompt: Option<String>) -> Self {
        Self {
            store,
            clock,
            prompt,
        }
    }

    /// Read and submit lines until end of input.
    ///
    /// # Errors
    /// Only [`FatalError`]s from the store.  Malformed lines are counted in
    /// the returned summary, never returned as errors.
    pub async fn run<R>(&self, reader: R) -> Result<IntakeSummary, FatalError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        let mut summary = IntakeSummary::default();

        loop {
            self.show_prompt();

            let submission = match lines.next_line().await {
                Ok(Some(line)) => self.submit(&line)?,
                Ok(None) => break,
                // The undecodable bytes were consumed; treat it as a bad line.
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    Submission::Rejected(RequestError::Undecodable)
                }
                Err(e) => {
                    warn!(error = %e, "input read failed, treating as end of input");
                    break;
                }
            };

            match submission {
                Submission::Blank => summary.blank += 1,
                Submission::Accepted => summary.accepted += 1,
                Submission::Rejected(reason) => {
                    eprintln!("Bad command");
                    warn!(%reason, "bad command");
                    summary.rejected += 1;
                }
            }
        }

        debug!(
            accepted = summary.accepted,
            rejected = summary.rejected,
            blank = summary.blank,
            "end of input"
        );
        Ok(summary)
    }

    /// Parse `line` and, if valid, insert the resulting alarm.
    ///
    /// `line` comes without its terminator; only a line with no content at
    /// all is blank.
    pub fn submit(&self, line: &str) -> Result<Submission, FatalError> {
        if line.is_empty() {
            return Ok(Submission::Blank);
        }

        let request = match parse_request(line) {
            Ok(r) => r,
            Err(reason) => return Ok(Submission::Rejected(reason)),
        };

        let deadline = self.clock.deadline_after(request.seconds);
        let alarm = Alarm::new(request.seconds, deadline, request.message);
        debug!(seconds = alarm.seconds(), %deadline, message = %alarm.message(), "alarm queued");

        self.store.insert(alarm)?;
        self.log_pending()?;
        Ok(Submission::Accepted)
    }

    fn show_prompt(&self) {
        if let Some(prompt) = &self.prompt {
            let mut out = std::io::stdout().lock();
            // A closed stdout is not an intake error; firing will notice it.
            let _ = out.write_all(prompt.as_bytes());
            let _ = out.flush();
        }
    }

    /// Debug listing of every pending alarm with its remaining time.
    fn log_pending(&self) -> Result<(), FatalError> {
        if !tracing::enabled!(tracing::Level::DEBUG) {
            return Ok(());
        }
        let listing: Vec<String> = self
            .store
            .snapshot()?
            .iter()
            .map(|a| {
                format!(
                    "{}({})[\"{}\"]",
                    a.deadline(),
                    self.clock.seconds_until(a.deadline()),
                    a.message()
                )
            })
            .collect();
        debug!(pending = listing.len(), "[list: {}]", listing.join(""));
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
