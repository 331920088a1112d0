// Lock-free communication channels
// Poll worker -> audio callback (triggers), poll worker -> UI (step events,
// notifications). Ringbuffers keep the audio callback allocation-free.

use crate::audio::output::TriggerCommand;
use crate::messaging::notification::Notification;
use crate::sequencer::scheduler::StepBoundary;
use ringbuf::{traits::Split, HeapRb};

pub type TriggerProducer = ringbuf::HeapProd<TriggerCommand>;
pub type TriggerConsumer = ringbuf::HeapCons<TriggerCommand>;

pub fn create_trigger_channel(capacity: usize) -> (TriggerProducer, TriggerConsumer) {
    let rb = HeapRb::<TriggerCommand>::new(capacity);
    rb.split()
}

pub type StepEventProducer = ringbuf::HeapProd<StepBoundary>;
pub type StepEventConsumer = ringbuf::HeapCons<StepBoundary>;

pub fn create_step_channel(capacity: usize) -> (StepEventProducer, StepEventConsumer) {
    let rb = HeapRb::<StepBoundary>::new(capacity);
    rb.split()
}

pub type NotificationProducer = ringbuf::HeapProd<Notification>;
pub type NotificationConsumer = ringbuf::HeapCons<Notification>;

pub fn create_notification_channel(
    capacity: usize,
) -> (NotificationProducer, NotificationConsumer) {
    let rb = HeapRb::<Notification>::new(capacity);
    rb.split()
}
