// Audio clock - high-resolution time reference for trigger scheduling
// Driven by the frame counter the output callback advances, not by wall time

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic, high-resolution time reference in seconds.
///
/// The scheduler compares step deadlines against this clock, so
/// implementations must never go backwards and must keep their value across
/// pause/resume (a paused clock simply stops advancing).
pub trait AudioClock {
    /// Current time in seconds since the clock started.
    fn now(&self) -> f64;
}

/// Clock backed by the audio output stream's frame counter.
///
/// The audio callback calls [`StreamClock::advance`] once per buffer, so
/// `now()` tracks the device's own sample clock rather than the OS timer.
/// Clones share the same counter and can be handed to other threads.
#[derive(Debug, Clone)]
pub struct StreamClock {
    frames: Arc<AtomicU64>,
    sample_rate: f64,
}

impl StreamClock {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            frames: Arc::new(AtomicU64::new(0)),
            sample_rate,
        }
    }

    /// Advance the clock by one callback buffer (called from the audio thread).
    pub fn advance(&self, frames: usize) {
        self.frames.fetch_add(frames as u64, Ordering::Relaxed);
    }

    /// Absolute frame index of the next frame the device will render.
    pub fn current_frame(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Convert an audio-clock timestamp in seconds to an absolute frame index.
    pub fn seconds_to_frames(&self, seconds: f64) -> u64 {
        (seconds.max(0.0) * self.sample_rate).round() as u64
    }
}

impl AudioClock for StreamClock {
    fn now(&self) -> f64 {
        self.current_frame() as f64 / self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_starts_at_zero() {
        let clock = StreamClock::new(48000.0);
        assert_eq!(clock.current_frame(), 0);
        assert_eq!(clock.now(), 0.0);
    }

    #[test]
    fn test_clock_advances_monotonically() {
        let clock = StreamClock::new(48000.0);
        clock.advance(480);
        assert_eq!(clock.current_frame(), 480);
        assert_eq!(clock.now(), 0.01);

        clock.advance(480);
        assert_eq!(clock.now(), 0.02);
    }

    #[test]
    fn test_clones_share_the_counter() {
        let clock = StreamClock::new(44100.0);
        let other = clock.clone();
        other.advance(44100);
        assert_eq!(clock.now(), 1.0);
    }

    #[test]
    fn test_seconds_to_frames() {
        let clock = StreamClock::new(48000.0);
        assert_eq!(clock.seconds_to_frames(1.0), 48000);
        assert_eq!(clock.seconds_to_frames(0.125), 6000);
        // Deadlines in the past clamp to frame zero rather than underflow
        assert_eq!(clock.seconds_to_frames(-0.5), 0);
    }
}
