// Lookahead scheduler - the core of the playback engine
// A coarse, jitter-prone poll commits exact audio-clock deadlines up to a
// fixed horizon ahead; the audio output then starts samples on those
// deadlines independently of poll jitter.

use std::time::Duration;

use crate::audio::clock::AudioClock;

use super::pattern::Pattern;
use super::timing::{SchedulerConfig, SharedTempo};

/// A scheduled instruction to start one instrument's sample at an exact
/// audio-clock timestamp. Produced and consumed within one scheduling pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTrigger {
    pub step: usize,
    pub instrument: usize,
    /// Audio-clock deadline in seconds.
    pub deadline: f64,
}

/// Step-boundary notification for UI highlighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepBoundary {
    pub step: usize,
    pub deadline: f64,
}

impl StepBoundary {
    /// Wall-clock delay until this boundary is audible, computed at receipt
    /// time. Consumers apply the highlight after this delay and must drop
    /// it if playback has left the Playing state by then.
    pub fn ui_delay(&self, clock: &dyn AudioClock) -> Duration {
        Duration::from_secs_f64((self.deadline - clock.now()).max(0.0))
    }
}

/// Receives the events produced by a scheduling pass.
///
/// Within one pass, triggers arrive in non-decreasing deadline order and
/// every active instrument of a step shares the identical deadline.
pub trait TriggerSink {
    fn trigger(&mut self, event: ScheduledTrigger);
    fn step_boundary(&mut self, event: StepBoundary);
}

/// Playback cursor: the step to schedule next and its audio-clock deadline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepCursor {
    pub step: usize,
    pub next_deadline: f64,
}

impl StepCursor {
    /// Cursor at step zero, due at the given clock time.
    pub fn at(deadline: f64) -> Self {
        Self {
            step: 0,
            next_deadline: deadline,
        }
    }
}

/// The lookahead scheduler. Owns the step cursor; everything else (clock,
/// pattern, tempo, sink) is borrowed per pass so the component stays
/// testable and free of global state.
pub struct LookaheadScheduler {
    config: SchedulerConfig,
    cursor: StepCursor,
}

impl LookaheadScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            cursor: StepCursor::at(0.0),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn cursor(&self) -> StepCursor {
        self.cursor
    }

    /// Restart from step zero with the first deadline at `now`. Called on
    /// the Stopped -> Playing transition; resuming from Paused skips this
    /// so playback continues where it left off.
    pub fn reset(&mut self, now: f64) {
        self.cursor = StepCursor::at(now);
    }

    /// Rewind only the step index, leaving the stale deadline behind.
    /// Deadlines are only ever compared against a future `now`, so they
    /// need no adjustment until the next reset.
    pub fn rewind_step(&mut self) {
        self.cursor.step = 0;
    }

    /// One scheduling pass.
    ///
    /// Schedules every step whose deadline falls inside the lookahead
    /// horizon: scans the step's column for active cells, emits one trigger
    /// per active instrument (all sharing the step deadline), emits the
    /// step-boundary notification, then advances the cursor. The tempo is
    /// observed at each advance, so a tempo change applies from the next
    /// boundary while deadlines already committed keep their old spacing.
    pub fn poll(
        &mut self,
        clock: &dyn AudioClock,
        pattern: &Pattern,
        tempo: &SharedTempo,
        sink: &mut dyn TriggerSink,
    ) {
        let horizon = clock.now() + self.config.schedule_ahead;

        while self.cursor.next_deadline < horizon {
            let step = self.cursor.step;
            let deadline = self.cursor.next_deadline;

            for instrument in pattern.active_in_step(step) {
                sink.trigger(ScheduledTrigger {
                    step,
                    instrument,
                    deadline,
                });
            }
            sink.step_boundary(StepBoundary { step, deadline });

            self.cursor.next_deadline = deadline + tempo.get().seconds_per_step();
            self.cursor.step = (step + 1) % self.config.steps_per_pattern;
        }
    }
}
