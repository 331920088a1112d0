// Sample trigger dispatcher - resolves instruments to decoded buffers and
// hands them to the audio output with exact start frames

use ringbuf::traits::Producer;

use crate::audio::clock::StreamClock;
use crate::audio::output::TriggerCommand;
use crate::messaging::channels::{NotificationProducer, StepEventProducer, TriggerProducer};
use crate::messaging::notification::{Notification, NotificationCategory};
use crate::sampler::bank::SampleProvider;

use super::scheduler::{ScheduledTrigger, StepBoundary, TriggerSink};

/// Turns scheduled triggers into audio-output commands.
///
/// A missing buffer is a silent no-op: the warning goes to the notification
/// channel once per instrument and playback continues. Dispatch never
/// blocks, so a sample that has not finished loading simply stays silent
/// until it is ready.
pub struct SampleDispatcher {
    provider: Box<dyn SampleProvider + Send>,
    triggers: TriggerProducer,
    steps: StepEventProducer,
    notifications: NotificationProducer,
    clock: StreamClock,
    missing_warned: Vec<bool>,
}

impl SampleDispatcher {
    pub fn new(
        provider: Box<dyn SampleProvider + Send>,
        triggers: TriggerProducer,
        steps: StepEventProducer,
        notifications: NotificationProducer,
        clock: StreamClock,
    ) -> Self {
        let missing_warned = vec![false; provider.instrument_count()];
        Self {
            provider,
            triggers,
            steps,
            notifications,
            clock,
            missing_warned,
        }
    }

    /// Submit one instrument for playback at the given audio-clock deadline.
    /// Also used for immediate "preview" triggers with `deadline = now`.
    pub fn dispatch_at(&mut self, instrument: usize, deadline: f64) {
        let buffer = match self.provider.buffer(instrument) {
            Some(buffer) => buffer,
            None => {
                self.warn_missing(instrument);
                return;
            }
        };

        let command = TriggerCommand {
            buffer,
            start_frame: self.clock.seconds_to_frames(deadline),
        };

        if self.triggers.try_push(command).is_err() {
            let _ = self.notifications.try_push(Notification::warning(
                NotificationCategory::Sequencer,
                format!("trigger queue full, dropped instrument {instrument}"),
            ));
        }
    }

    fn warn_missing(&mut self, instrument: usize) {
        let warned = self.missing_warned.get(instrument).copied().unwrap_or(true);
        if !warned {
            if let Some(flag) = self.missing_warned.get_mut(instrument) {
                *flag = true;
            }
            let _ = self.notifications.try_push(Notification::warning(
                NotificationCategory::Sampler,
                format!("no sample loaded for instrument {instrument}, triggers are muted"),
            ));
        }
    }
}

impl TriggerSink for SampleDispatcher {
    fn trigger(&mut self, event: ScheduledTrigger) {
        self.dispatch_at(event.instrument, event.deadline);
    }

    fn step_boundary(&mut self, event: StepBoundary) {
        // Dropped boundaries only cost a skipped highlight frame
        let _ = self.steps.try_push(event);
    }
}
