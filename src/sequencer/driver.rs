//! Runs a sequencer to completion against a clock, one wakeup at a time.
use super::clock::Clock;
use super::{LoadingSequencer, Phase, SequencerEvent};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Host-side teardown signal, checked between wakeups.
#[derive(Debug, Clone, Default)]
pub(crate) struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunOutcome {
    Completed,
    Cancelled,
}

/// Start the sequencer and feed it wakeups until it completes or the token
/// is cancelled. `observe` sees every event in order.
pub(crate) fn run_sequence<R, F, C>(
    sequencer: &mut LoadingSequencer<R, F>,
    clock: &mut C,
    cancel: &CancelToken,
    mut observe: impl FnMut(SequencerEvent),
) -> RunOutcome
where
    R: Rng,
    F: FnOnce(),
    C: Clock,
{
    sequencer.start(clock.now());
    loop {
        if cancel.is_cancelled() {
            sequencer.cancel();
            return RunOutcome::Cancelled;
        }
        let Some(deadline) = sequencer.next_deadline() else {
            return match sequencer.phase() {
                Phase::Done => RunOutcome::Completed,
                _ => RunOutcome::Cancelled,
            };
        };
        clock.sleep_until(deadline);
        if cancel.is_cancelled() {
            sequencer.cancel();
            return RunOutcome::Cancelled;
        }
        for event in sequencer.advance(clock.now()) {
            observe(event);
        }
        tracing::trace!(
            progress = sequencer.progress(),
            exiting = sequencer.is_exiting(),
            "sequencer advanced"
        );
    }
}
