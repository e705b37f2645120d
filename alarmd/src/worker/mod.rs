/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Background scheduler worker.
//!
//! [`SchedulerWorker`] is the single long-lived task that drains the store in
//! deadline order.  One loop iteration:
//!
//! ```text
//! lock ─► remove_earliest ─► unlock ─┬─ empty ─────► sleep(poll_interval) ───────────┐
//!                                    ├─ wait > 0 ──► sleep(wait) ─► fire ─► drop ───┤
//!                                    └─ wait == 0 ─► yield_now   ─► fire ─► drop ───┤
//!                                                                                   └─► loop
//! ```
//!
//! The lock is released before any suspension point, so intake is never
//! blocked behind a wait.
//!
//! # Known limitation
//! Once an alarm is dequeued the worker commits to waiting it out.  An alarm
//! inserted during that wait with an even earlier deadline is only picked up
//! on the next iteration, i.e. after the current alarm has fired.  Firing is
//! unconditional once the wait elapses; the deadline is not re-checked.
//!
//! # Shutdown
//! The worker stops at its next suspension point when the broadcast shutdown
//! signal arrives or its sender is dropped.  A dequeued but unfired alarm is
//! discarded.

use std::io::Write;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::alarm::{Alarm, Clock};
use crate::error::FatalError;
use crate::store::SharedAlarmStore;

// ── Firing seam ───────────────────────────────────────────────────────────────

/// Destination for fired alarms.  Takes ownership, so a fired alarm is gone.
pub trait AlarmSink: Send + Sync {
    fn fire(&self, alarm: Alarm);
}

/// Prints `(<seconds>) <message>` on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl AlarmSink for StdoutSink {
    fn fire(&self, alarm: Alarm) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{alarm}");
        let _ = out.flush();
    }
}

// ── Worker ────────────────────────────────────────────────────────────────────

/// What the worker does between dequeue and fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pause {
    Sleep(Duration),
    Yield,
}

impl Pause {
    async fn wait(self) {
        match self {
            Pause::Sleep(d) => tokio::time::sleep(d).await,
            Pause::Yield => tokio::task::yield_now().await,
        }
    }
}

/// The scheduler-worker role.
pub struct SchedulerWorker<S> {
    store: SharedAlarmStore,
    clock: Clock,
    sink: S,
    poll_interval: Duration,
}

impl<S: AlarmSink + 'static> SchedulerWorker<S> {
    pub fn new(store: SharedAlarmStore, clock: Clock, sink: S, poll_interval: Duration) -> Self {
        Self {
            store,
            clock,
            sink,
            poll_interval,
        }
    }

    /// Run [`run`](Self::run) on a new tokio task.
    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> JoinHandle<Result<(), FatalError>> {
        tokio::spawn(self.run(shutdown))
    }

    /// Loop until shutdown.
    ///
    /// # Errors
    /// A [`FatalError`] from the store ends the loop immediately.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Result<(), FatalError> {
        info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            "scheduler worker started"
        );

        loop {
            // Lock is taken and released inside remove_earliest().
            let next = self.store.remove_earliest()?;
            let pause = self.pause_for(next.as_ref());

            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    if let Some(alarm) = next {
                        debug!(message = %alarm.message(), "discarding unfired alarm on shutdown");
                    }
                    info!("scheduler worker stopped");
                    return Ok(());
                }
                _ = pause.wait() => {}
            }

            if let Some(alarm) = next {
                debug!(seconds = alarm.seconds(), message = %alarm.message(), "firing");
                self.sink.fire(alarm);
            }
        }
    }

    fn pause_for(&self, alarm: Option<&Alarm>) -> Pause {
        let Some(alarm) = alarm else {
            return Pause::Sleep(self.poll_interval);
        };

        let wait = self.clock.seconds_until(alarm.deadline());
        debug!(
            deadline = %alarm.deadline(),
            wait_secs = wait,
            message = %alarm.message(),
            "[waiting]"
        );

        if wait > 0 {
            Pause::Sleep(Duration::from_secs(wait))
        } else {
            Pause::Yield
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::Intake;
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    /// Records every fired alarm with the (virtual) time it fired at.
    struct RecordingSink(mpsc::UnboundedSender<(Alarm, Instant)>);

    impl AlarmSink for RecordingSink {
        fn fire(&self, alarm: Alarm) {
            let _ = self.0.send((alarm, Instant::now()));
        }
    }

    struct Harness {
        store: SharedAlarmStore,
        intake: Intake,
        fired: mpsc::UnboundedReceiver<(Alarm, Instant)>,
        shutdown: broadcast::Sender<()>,
        worker: JoinHandle<Result<(), FatalError>>,
        start: Instant,
    }

    /// Build store + intake, queue `lines`, then start the worker.
    fn harness(lines: &[&str]) -> Harness {
        let store = SharedAlarmStore::new();
        let clock = Clock::start();
        let intake = Intake::new(store.clone(), clock, None);
        for line in lines {
            intake.submit(line).unwrap();
        }

        let (tx, fired) = mpsc::unbounded_channel();
        let (shutdown, rx) = broadcast::channel(1);
        let worker = SchedulerWorker::new(
            store.clone(),
            clock,
            RecordingSink(tx),
            Duration::from_secs(1),
        )
        .spawn(rx);

        Harness {
            store,
            intake,
            fired,
            shutdown,
            worker,
            start: Instant::now(),
        }
    }

    impl Harness {
        /// Next fired alarm: (message, whole seconds since start).
        async fn next_fired(&mut self) -> (String, u64) {
            let (alarm, at) = self.fired.recv().await.unwrap();
            (
                alarm.message().to_string(),
                (at - self.start).as_secs(),
            )
        }

        async fn stop(self) -> mpsc::UnboundedReceiver<(Alarm, Instant)> {
            self.shutdown.send(()).unwrap();
            self.worker.await.unwrap().unwrap();
            self.fired
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_earliest_deadline_first() {
        let mut h = harness(&["5 hello", "2 world"]);

        assert_eq!(h.next_fired().await, ("world".to_string(), 2));
        assert_eq!(h.next_fired().await, ("hello".to_string(), 5));
        assert_eq!(h.store.len().unwrap(), 0);
        h.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn equal_deadlines_fire_newest_first() {
        let mut h = harness(&["3 aaa", "3 bbb"]);

        assert_eq!(h.next_fired().await, ("bbb".to_string(), 3));
        assert_eq!(h.next_fired().await, ("aaa".to_string(), 3));
        h.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_fires_without_delay() {
        let mut h = harness(&["0 now"]);
        assert_eq!(h.next_fired().await, ("now".to_string(), 0));
        h.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn alarm_submitted_while_idle_is_picked_up_within_one_poll() {
        let mut h = harness(&[]);
        tokio::time::sleep(Duration::from_millis(500)).await;
        h.intake.submit("0 ping").unwrap();

        let (msg, secs) = h.next_fired().await;
        assert_eq!(msg, "ping");
        assert!(secs <= 1, "fired after {secs}s, expected within one poll interval");
        h.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn each_alarm_fires_exactly_once() {
        let mut h = harness(&["1 one", "2 two"]);
        assert_eq!(h.next_fired().await.0, "one");
        assert_eq!(h.next_fired().await.0, "two");

        tokio::time::sleep(Duration::from_secs(10)).await;
        let mut fired = h.stop().await;
        assert!(fired.try_recv().is_err(), "nothing may fire twice");
    }

    #[tokio::test(start_paused = true)]
    async fn sooner_alarm_waits_behind_dequeued_alarm() {
        let mut h = harness(&["10 late"]);
        tokio::time::sleep(Duration::from_secs(1)).await;
        // Deadline 3, but the worker is already committed to "late".
        h.intake.submit("2 early").unwrap();

        assert_eq!(h.next_fired().await, ("late".to_string(), 10));
        assert_eq!(h.next_fired().await, ("early".to_string(), 10));
        h.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn intake_is_not_blocked_during_a_wait() {
        let h = harness(&["30 long"]);
        tokio::time::sleep(Duration::from_secs(1)).await;

        h.intake.submit("5 queued").unwrap();
        assert_eq!(h.store.len().unwrap(), 1);
        h.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_with_empty_store_fires_nothing() {
        let h = harness(&[]);
        tokio::time::sleep(Duration::from_secs(3)).await;
        let mut fired = h.stop().await;
        assert!(fired.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_discards_dequeued_alarm() {
        let h = harness(&["5 never"]);
        tokio::time::sleep(Duration::from_secs(1)).await;

        let store = h.store.clone();
        let mut fired = h.stop().await;
        assert!(fired.try_recv().is_err());
        assert_eq!(store.len().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_shutdown_sender_stops_worker() {
        let h = harness(&[]);
        drop(h.shutdown);
        h.worker.await.unwrap().unwrap();
    }
}
