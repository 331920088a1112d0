// Sequencer module - pattern model, lookahead scheduling, and transport

pub mod dispatcher;
pub mod engine;
pub mod pattern;
pub mod scheduler;
pub mod timing;
pub mod transport;

pub use dispatcher::SampleDispatcher;
pub use engine::Sequencer;
pub use pattern::{Pattern, DEFAULT_STEPS_PER_PATTERN};
pub use scheduler::{
    LookaheadScheduler, ScheduledTrigger, StepBoundary, StepCursor, TriggerSink,
};
pub use timing::{SchedulerConfig, SharedTempo, Tempo, MAX_BPM, MIN_BPM};
pub use transport::{PlaybackState, SharedPlaybackState};
