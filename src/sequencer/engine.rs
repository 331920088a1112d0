// Sequencer - the playback state machine driving the lookahead poll loop
// Owns the worker thread that re-arms the scheduler every poll interval

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::audio::clock::{AudioClock, StreamClock};

use super::dispatcher::SampleDispatcher;
use super::pattern::Pattern;
use super::scheduler::{LookaheadScheduler, StepCursor};
use super::timing::{SchedulerConfig, SharedTempo, Tempo};
use super::transport::{PlaybackState, SharedPlaybackState};

/// State shared between the control side and the poll worker.
///
/// The pattern is behind a mutex so each scheduling pass reads one
/// consistent snapshot; tempo and playback flags are atomics. The cursor
/// lives inside the scheduler and survives the worker across pause/resume.
struct Shared {
    playback: Arc<SharedPlaybackState>,
    tempo: SharedTempo,
    pattern: Mutex<Pattern>,
    scheduler: Mutex<LookaheadScheduler>,
    dispatcher: Mutex<SampleDispatcher>,
}

/// The sequencer state machine: Stopped / Playing / Paused.
///
/// While Playing, exactly one worker thread polls the scheduler every
/// `lookahead_interval`. Stop and pause join that thread before returning,
/// so no trigger can fire after a transition completes.
pub struct Sequencer {
    shared: Arc<Shared>,
    clock: StreamClock,
    config: SchedulerConfig,
    worker: Option<JoinHandle<()>>,
}

impl Sequencer {
    pub fn new(
        clock: StreamClock,
        dispatcher: SampleDispatcher,
        config: SchedulerConfig,
        pattern: Pattern,
        tempo: Tempo,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                playback: SharedPlaybackState::new(),
                tempo: SharedTempo::new(tempo),
                pattern: Mutex::new(pattern),
                scheduler: Mutex::new(LookaheadScheduler::new(config)),
                dispatcher: Mutex::new(dispatcher),
            }),
            clock,
            config,
            worker: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.shared.playback.state()
    }

    /// Start or resume playback.
    ///
    /// From Stopped, the cursor restarts at step zero with its first
    /// deadline at the current clock time; from Paused, the cursor is left
    /// alone and playback continues where it stopped. Starting while
    /// already Playing is a no-op.
    pub fn start(&mut self) {
        match self.state() {
            PlaybackState::Playing => return,
            PlaybackState::Stopped => {
                let now = self.clock.now();
                self.shared.scheduler.lock().unwrap().reset(now);
            }
            PlaybackState::Paused => {}
        }

        self.shared.playback.set_playing();
        self.spawn_worker();
    }

    /// Pause, keeping the cursor for a later resume. The worker is joined
    /// before returning so no pass runs after this call.
    pub fn pause(&mut self) {
        if self.state() != PlaybackState::Playing {
            return;
        }
        self.shared.playback.set_paused();
        self.join_worker();
    }

    /// Full stop: halt the poll loop and rewind to step zero. Idempotent.
    pub fn stop(&mut self) {
        self.shared.playback.set_stopped();
        self.join_worker();
        self.shared.scheduler.lock().unwrap().rewind_step();
    }

    pub fn tempo(&self) -> Tempo {
        self.shared.tempo.get()
    }

    /// Change the tempo. Applies from the next step boundary the scheduler
    /// advances past; steps already inside the lookahead horizon keep
    /// their committed deadlines. No restart needed.
    pub fn set_bpm(&self, bpm: f64) {
        self.shared.tempo.set_bpm(bpm);
    }

    /// Mutate the pattern under the lock the scheduler snapshots from.
    pub fn edit_pattern<R>(&self, edit: impl FnOnce(&mut Pattern) -> R) -> R {
        let mut pattern = self.shared.pattern.lock().unwrap();
        edit(&mut pattern)
    }

    /// Clone of the current pattern.
    pub fn pattern(&self) -> Pattern {
        self.shared.pattern.lock().unwrap().clone()
    }

    /// Toggle a cell; a cell that turns active also fires an immediate
    /// preview trigger, like clicking the grid in the editor.
    pub fn toggle_cell(&self, instrument: usize, step: usize) -> bool {
        let active = self.edit_pattern(|p| p.toggle(instrument, step));
        if active {
            self.preview(instrument);
        }
        active
    }

    /// Trigger one instrument immediately, outside the scheduled loop.
    pub fn preview(&self, instrument: usize) {
        let now = self.clock.now();
        self.shared
            .dispatcher
            .lock()
            .unwrap()
            .dispatch_at(instrument, now);
    }

    pub fn cursor(&self) -> StepCursor {
        self.shared.scheduler.lock().unwrap().cursor()
    }

    pub fn current_step(&self) -> usize {
        self.cursor().step
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    fn spawn_worker(&mut self) {
        if self.worker.is_some() {
            return;
        }

        let shared = Arc::clone(&self.shared);
        let clock = self.clock.clone();
        let interval = self.config.lookahead_interval;

        self.worker = Some(std::thread::spawn(move || {
            while shared.playback.is_playing() {
                {
                    let pattern = shared.pattern.lock().unwrap();
                    let mut scheduler = shared.scheduler.lock().unwrap();
                    let mut dispatcher = shared.dispatcher.lock().unwrap();
                    scheduler.poll(&clock, &pattern, &shared.tempo, &mut *dispatcher);
                }
                std::thread::sleep(interval);
            }
        }));
    }

    fn join_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            // The worker re-checks the playing flag every interval; joining
            // here makes cancellation synchronous for the caller.
            let _ = handle.join();
        }
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        self.shared.playback.set_stopped();
        self.join_worker();
    }
}
