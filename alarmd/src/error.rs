/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Fatal error taxonomy.
//!
//! Only two things can go wrong in alarmd:
//!
//! * A request line is malformed.  That is a *soft* error, modelled by
//!   [`RequestError`](crate::intake::RequestError): the line is dropped, a
//!   diagnostic is printed and intake continues.
//! * Something that should never happen does happen: the store lock is
//!   poisoned, memory for a new entry cannot be reserved, or the worker task
//!   dies.  Those are [`FatalError`]s.  Nothing inside the crate tries to
//!   recover from them; `main` reports and exits with a non-zero status.

use thiserror::Error;

/// Unrecoverable failure of a store operation or of the worker itself.
#[derive(Debug, Error)]
pub enum FatalError {
    /// The store mutex was poisoned by a panic while it was held.
    ///
    /// Shared state may be inconsistent; proceeding is unsafe.
    #[error("alarm store lock poisoned during {operation}")]
    LockPoisoned { operation: &'static str },

    /// Capacity for a new store entry could not be reserved.
    #[error("cannot allocate alarm entry during {operation}")]
    Exhausted { operation: &'static str },

    /// The scheduler worker task panicked or was aborted.
    #[error("scheduler worker terminated unexpectedly: {0}")]
    WorkerPanicked(String),
}
