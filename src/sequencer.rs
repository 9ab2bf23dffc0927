//! First-load sequencer: simulated progress, a short hold, an exit
//! transition, then a single hand-off callback to the host.
//!
//! The machine never sleeps itself. It keeps one pending deadline and a
//! driver (see [`driver`]) advances it against a [`clock::Clock`], so
//! cancelling is just dropping that deadline along with the callback.

pub(crate) mod clock;
pub(crate) mod driver;

use rand::Rng;
use std::ops::Range;
use std::time::Duration;

pub(crate) const PROGRESS_COMPLETE: f64 = 100.0;
const INCREMENT_RANGE: Range<f64> = 5.0..20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SequencerTimings {
    pub(crate) tick: Duration,
    pub(crate) hold: Duration,
    pub(crate) exit: Duration,
}

impl Default for SequencerTimings {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(100),
            hold: Duration::from_millis(300),
            exit: Duration::from_millis(800),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    Running,
    Holding,
    Exiting,
    Done,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum SequencerEvent {
    Progress(f64),
    Holding,
    Exiting,
    Completed,
}

/// Loading state machine. `R` draws the progress increments and `F` is the
/// hand-off callback, run at most once when the exit delay elapses.
pub(crate) struct LoadingSequencer<R, F> {
    phase: Phase,
    progress: f64,
    timings: SequencerTimings,
    next_wake: Option<Duration>,
    rng: R,
    on_complete: Option<F>,
}

impl<R: Rng, F: FnOnce()> LoadingSequencer<R, F> {
    pub(crate) fn new(timings: SequencerTimings, rng: R, on_complete: F) -> Self {
        Self {
            phase: Phase::Idle,
            progress: 0.0,
            timings,
            next_wake: None,
            rng,
            on_complete: Some(on_complete),
        }
    }

    /// Enter `Running(0)` and schedule the first tick. Only valid once.
    pub(crate) fn start(&mut self, now: Duration) {
        if self.phase != Phase::Idle {
            return;
        }
        self.phase = Phase::Running;
        self.progress = 0.0;
        self.next_wake = Some(now + self.timings.tick);
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn progress(&self) -> f64 {
        self.progress
    }

    pub(crate) fn is_exiting(&self) -> bool {
        self.phase == Phase::Exiting
    }

    pub(crate) fn next_deadline(&self) -> Option<Duration> {
        self.next_wake
    }

    /// Fire every wakeup due at or before `now`, in order.
    pub(crate) fn advance(&mut self, now: Duration) -> Vec<SequencerEvent> {
        let mut events = Vec::new();
        while let Some(deadline) = self.next_wake {
            if deadline > now {
                break;
            }
            self.fire(deadline, &mut events);
        }
        events
    }

    /// Stop before `Done`: the pending wakeup is dropped and the completion
    /// callback will never run. Returns false if already terminal.
    pub(crate) fn cancel(&mut self) -> bool {
        if matches!(self.phase, Phase::Done | Phase::Cancelled) {
            return false;
        }
        self.phase = Phase::Cancelled;
        self.next_wake = None;
        self.on_complete = None;
        tracing::debug!(progress = self.progress, "loading sequence cancelled");
        true
    }

    fn fire(&mut self, at: Duration, events: &mut Vec<SequencerEvent>) {
        match self.phase {
            Phase::Running => {
                let next = self.progress + self.rng.random_range(INCREMENT_RANGE);
                if next >= PROGRESS_COMPLETE {
                    self.progress = PROGRESS_COMPLETE;
                    self.phase = Phase::Holding;
                    self.next_wake = Some(at + self.timings.hold);
                    events.push(SequencerEvent::Progress(PROGRESS_COMPLETE));
                    events.push(SequencerEvent::Holding);
                } else {
                    self.progress = next;
                    self.next_wake = Some(at + self.timings.tick);
                    events.push(SequencerEvent::Progress(next));
                }
            }
            Phase::Holding => {
                self.phase = Phase::Exiting;
                self.next_wake = Some(at + self.timings.exit);
                events.push(SequencerEvent::Exiting);
            }
            Phase::Exiting => {
                self.phase = Phase::Done;
                self.next_wake = None;
                if let Some(on_complete) = self.on_complete.take() {
                    on_complete();
                }
                events.push(SequencerEvent::Completed);
            }
            Phase::Idle | Phase::Done | Phase::Cancelled => {
                self.next_wake = None;
            }
        }
    }
}
