// Musical timing - tempo and the scheduler's tunables

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Lowest accepted tempo. A zero or negative BPM would make the step
/// duration non-positive and the lookahead loop spin or run backwards, so
/// out-of-range input clamps instead of being stored.
pub const MIN_BPM: f64 = 20.0;
pub const MAX_BPM: f64 = 999.0;

/// Subdivisions per beat: the grid is 16th notes.
pub const STEPS_PER_BEAT: f64 = 4.0;

/// Tempo in BPM (beats per minute), always inside [MIN_BPM, MAX_BPM].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    pub fn new(bpm: f64) -> Self {
        Self {
            bpm: bpm.clamp(MIN_BPM, MAX_BPM),
        }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Duration of one 16th-note step in seconds: 60 / (bpm * 4).
    pub fn seconds_per_step(&self) -> f64 {
        60.0 / (self.bpm * STEPS_PER_BEAT)
    }

    pub fn beat_duration_seconds(&self) -> f64 {
        60.0 / self.bpm
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(120.0)
    }
}

/// Lock-free tempo cell shared between the editing thread and the poll
/// worker. Stored as f64 bits in an atomic; the scheduler reads it at each
/// step advance, so a change applies from the next step boundary.
#[derive(Debug, Clone)]
pub struct SharedTempo {
    bits: Arc<AtomicU64>,
}

impl SharedTempo {
    pub fn new(tempo: Tempo) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(tempo.bpm().to_bits())),
        }
    }

    pub fn get(&self) -> Tempo {
        Tempo::new(f64::from_bits(self.bits.load(Ordering::Relaxed)))
    }

    /// Set the tempo (called from the UI thread). Takes effect without a
    /// playback restart.
    pub fn set(&self, tempo: Tempo) {
        self.bits.store(tempo.bpm().to_bits(), Ordering::Relaxed);
    }

    pub fn set_bpm(&self, bpm: f64) {
        self.set(Tempo::new(bpm));
    }
}

impl Default for SharedTempo {
    fn default() -> Self {
        Self::new(Tempo::default())
    }
}

/// Tunables of the lookahead scheduler.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Steps in one pattern loop.
    pub steps_per_pattern: usize,
    /// Coarse poll period between scheduling passes.
    pub lookahead_interval: Duration,
    /// How far ahead of the audio clock each pass commits deadlines, in
    /// seconds. Must exceed the poll period or steps starve between passes.
    pub schedule_ahead: f64,
}

impl SchedulerConfig {
    pub fn new(
        steps_per_pattern: usize,
        lookahead_interval: Duration,
        schedule_ahead: f64,
    ) -> Self {
        assert!(steps_per_pattern > 0, "pattern must have at least one step");
        assert!(
            schedule_ahead > lookahead_interval.as_secs_f64(),
            "schedule_ahead ({schedule_ahead}s) must exceed the poll interval ({:?})",
            lookahead_interval
        );
        Self {
            steps_per_pattern,
            lookahead_interval,
            schedule_ahead,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new(
            super::pattern::DEFAULT_STEPS_PER_PATTERN,
            Duration::from_millis(25),
            0.1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tempo_step_duration() {
        let tempo = Tempo::new(120.0);
        assert_eq!(tempo.bpm(), 120.0);
        assert_eq!(tempo.seconds_per_step(), 0.125);
        assert_eq!(tempo.beat_duration_seconds(), 0.5);

        let tempo = Tempo::new(60.0);
        assert_eq!(tempo.seconds_per_step(), 0.25);
    }

    #[test]
    fn test_tempo_clamps_invalid_bpm() {
        assert_eq!(Tempo::new(0.0).bpm(), MIN_BPM);
        assert_eq!(Tempo::new(-30.0).bpm(), MIN_BPM);
        assert_eq!(Tempo::new(5000.0).bpm(), MAX_BPM);
        // A clamped tempo still yields a positive, finite step duration
        assert!(Tempo::new(-1.0).seconds_per_step() > 0.0);
    }

    #[test]
    fn test_shared_tempo_roundtrip() {
        let shared = SharedTempo::default();
        assert_eq!(shared.get().bpm(), 120.0);

        shared.set_bpm(140.0);
        assert_eq!(shared.get().bpm(), 140.0);

        let clone = shared.clone();
        clone.set_bpm(90.0);
        assert_eq!(shared.get().bpm(), 90.0);
    }

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.steps_per_pattern, 64);
        assert_eq!(config.lookahead_interval, Duration::from_millis(25));
        assert_eq!(config.schedule_ahead, 0.1);
    }

    #[test]
    #[should_panic(expected = "must exceed the poll interval")]
    fn test_starving_horizon_is_rejected() {
        SchedulerConfig::new(64, Duration::from_millis(50), 0.04);
    }
}
