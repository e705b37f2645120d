/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! alarmd – single-process alarm scheduler
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── alarm.rs        – Alarm, bounded message, second-granular clock
//! ├── error.rs        – fatal error taxonomy
//! ├── config/         – optional YAML configuration
//! ├── store/          – mutex-guarded, deadline-ordered alarm store
//! ├── intake/         – request parsing + stdin intake loop
//! └── worker/         – background scheduler worker + firing sink
//! ```
//!
//! Two roles share one [`store::SharedAlarmStore`]:
//!
//! ```text
//! stdin ──► Intake ──insert──► SharedAlarmStore ──remove_earliest──► SchedulerWorker ──► AlarmSink
//! ```

pub mod alarm;
pub mod config;
pub mod error;
pub mod intake;
pub mod store;
pub mod worker;
