/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Request line grammar.
//!
//! ```text
//! request  := ws* seconds ws+ message
//! seconds  := decimal integer, 0 ..= u32::MAX (optional leading '+')
//! message  := rest of the line, at least one non-whitespace character,
//!             truncated to MAX_MESSAGE_LEN characters
//! ```
//!
//! The line terminator (`\n` or `\r\n`) is not part of the message.
//! Whitespace inside and at the end of the message is preserved.

use thiserror::Error;

use crate::alarm::AlarmMessage;

/// A successfully parsed request, not yet bound to a deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub seconds: u32,
    pub message: AlarmMessage,
}

/// Why a request line was rejected.  Every variant is a "Bad command".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The line does not start with a number at all (e.g. `oops`).
    #[error("expected '<seconds> <message>', no duration given")]
    MissingDuration,

    /// The leading token looks numeric but is not a valid duration
    /// (negative, too large, or glued to the message like `5hello`).
    #[error("invalid duration '{0}'")]
    InvalidDuration(String),

    /// A duration with nothing after it.
    #[error("missing message after duration")]
    MissingMessage,

    /// The line is not valid UTF-8 and was dropped unread.
    #[error("line is not valid UTF-8")]
    Undecodable,
}

/// Parse one input line into a [`Request`].
pub fn parse_request(line: &str) -> Result<Request, RequestError> {
    let line = line.trim_end_matches(&['\n', '\r'][..]).trim_start();

    let token_end = line.find(char::is_whitespace).unwrap_or(line.len());
    let (token, rest) = line.split_at(token_end);

    if token.is_empty() {
        return Err(RequestError::MissingDuration);
    }

    let seconds = token.parse::<u32>().map_err(|_| {
        if token.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+') {
            RequestError::InvalidDuration(token.to_string())
        } else {
            RequestError::MissingDuration
        }
    })?;

    let message = rest.trim_start();
    if message.is_empty() {
        return Err(RequestError::MissingMessage);
    }

    Ok(Request {
        seconds,
        message: AlarmMessage::truncated(message),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
