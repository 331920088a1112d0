// Audio module - CPAL output backend and the scheduling clock

pub mod clock;
pub mod output;

pub use clock::{AudioClock, StreamClock};
pub use output::{AudioError, AudioOutput, TriggerCommand};
