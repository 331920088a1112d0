// steptrack - Step-sequencer drum machine core
// Lookahead scheduling of sample triggers against the audio-device clock

pub mod audio;
pub mod messaging;
pub mod project;
pub mod sampler;
pub mod sequencer;

// Re-export commonly used types for convenience
pub use audio::clock::{AudioClock, StreamClock};
pub use audio::output::{AudioError, AudioOutput, TriggerCommand};
pub use messaging::channels::{
    create_notification_channel, create_step_channel, create_trigger_channel,
    NotificationConsumer, NotificationProducer, StepEventConsumer, StepEventProducer,
    TriggerConsumer, TriggerProducer,
};
pub use messaging::notification::{Notification, NotificationCategory, NotificationLevel};
pub use project::{ProjectData, ProjectError, ProjectStore, SampleMeta};
pub use sampler::{load_sample, SampleBank, SampleBuffer, SampleError, SampleProvider};
pub use sequencer::{
    LookaheadScheduler, Pattern, PlaybackState, SampleDispatcher, SchedulerConfig,
    ScheduledTrigger, Sequencer, StepBoundary, StepCursor, Tempo, TriggerSink,
};
