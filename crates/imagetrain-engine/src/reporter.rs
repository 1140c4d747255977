// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Progress Reporting
//!
//! Workers never call the `ProgressListener` themselves. Each one owns an
//! `EventSink` that `try_send`s into a bounded channel; a single reporter
//! thread drains it, forwards events to the listener and emits periodic
//! snapshots. A full channel drops the event instead of blocking the worker.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError, bounded};
use imagetrain_search::progress::event::{ProgressEvent, ProgressSnapshot};
use imagetrain_search::progress::listener::ProgressListener;
use imagetrain_search::stats::OutcomeCounters;
use std::cell::Cell;
use std::time::{Duration, Instant};
use tracing::warn;

/// Worker-side end of the progress channel.
#[derive(Debug)]
pub struct EventSink {
    sender: Option<Sender<ProgressEvent>>,
    warned: Cell<bool>,
}

impl Clone for EventSink {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            warned: Cell::new(false),
        }
    }
}

impl EventSink {
    /// A sink that discards every event.
    pub fn disabled() -> Self {
        Self {
            sender: None,
            warned: Cell::new(false),
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Enqueues `event` without blocking. Dropped events are counted in
    /// `counters`; the first drop per sink is logged.
    pub fn emit(&self, event: ProgressEvent, counters: &OutcomeCounters) {
        let Some(sender) = &self.sender else {
            return;
        };
        match sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                counters.record_dropped_event();
                if !self.warned.replace(true) {
                    warn!(
                        capacity = sender.capacity().unwrap_or_default(),
                        "progress channel full, dropping events"
                    );
                }
            }
            // The reporter is gone; nothing left to inform.
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

/// Creates a bounded progress channel of `capacity` events.
pub fn channel(capacity: usize) -> (EventSink, Receiver<ProgressEvent>) {
    let (sender, receiver) = bounded(capacity);
    let sink = EventSink {
        sender: Some(sender),
        warned: Cell::new(false),
    };
    (sink, receiver)
}

/// Drains `receiver` into `listener` until every sink has been dropped.
///
/// A snapshot produced by `snapshot` is delivered every `interval` and once
/// more after the last event.
pub fn run_reporter<F>(
    receiver: Receiver<ProgressEvent>,
    listener: &dyn ProgressListener,
    interval: Duration,
    snapshot: F,
) where
    F: Fn() -> ProgressSnapshot,
{
    let mut next_snapshot = Instant::now() + interval;
    loop {
        let timeout = next_snapshot.saturating_duration_since(Instant::now());
        match receiver.recv_timeout(timeout) {
            Ok(event) => listener.on_event(&event),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        let now = Instant::now();
        if now >= next_snapshot {
            listener.on_snapshot(&snapshot());
            next_snapshot = now + interval;
        }
    }
    listener.on_snapshot(&snapshot());
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagetrain_search::outcome::StepOutcome;
    use imagetrain_search::result::TerminationReason;
    use imagetrain_search::stats::SolverStatistics;
    use parking_lot::Mutex;
    use std::thread;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<StepOutcome>>,
        snapshots: Mutex<usize>,
    }

    impl ProgressListener for Recorder {
        fn name(&self) -> &str {
            "Recorder"
        }

        fn on_event(&self, event: &ProgressEvent) {
            self.events.lock().push(event.outcome());
        }

        fn on_snapshot(&self, _snapshot: &ProgressSnapshot) {
            *self.snapshots.lock() += 1;
        }

        fn on_finished(&self, _reason: TerminationReason, _statistics: &SolverStatistics) {}
    }

    fn step(outcome: StepOutcome) -> ProgressEvent {
        ProgressEvent::step(outcome, 0, 0)
    }

    #[test]
    fn test_full_channel_drops_and_counts() {
        let counters = OutcomeCounters::new();
        let (sink, receiver) = channel(1);
        sink.emit(step(StepOutcome::Forked), &counters);
        sink.emit(step(StepOutcome::DeadEnd), &counters);
        sink.emit(step(StepOutcome::DeadEnd), &counters);

        assert_eq!(counters.events_dropped(), 2);
        assert_eq!(receiver.len(), 1);
    }

    #[test]
    fn test_disabled_sink_is_silent() {
        let counters = OutcomeCounters::new();
        let sink = EventSink::disabled();
        assert!(!sink.is_enabled());
        sink.emit(step(StepOutcome::Forked), &counters);
        assert_eq!(counters.events_dropped(), 0);
    }

    #[test]
    fn test_reporter_forwards_and_finishes() {
        let counters = OutcomeCounters::new();
        let recorder = Recorder::default();
        let (sink, receiver) = channel(16);

        thread::scope(|s| {
            s.spawn(|| {
                run_reporter(receiver, &recorder, Duration::from_secs(60), ProgressSnapshot::default)
            });
            let worker = sink.clone();
            worker.emit(step(StepOutcome::Forked), &counters);
            worker.emit(step(StepOutcome::NoSensorConnection), &counters);
            drop(worker);
            drop(sink);
        });

        assert_eq!(
            *recorder.events.lock(),
            vec![StepOutcome::Forked, StepOutcome::NoSensorConnection]
        );
        assert_eq!(*recorder.snapshots.lock(), 1);
    }
}
