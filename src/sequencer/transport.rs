// Transport - playback state shared between control and worker threads

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Playback state, owned exclusively by the sequencer state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, PlaybackState::Paused)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, PlaybackState::Stopped)
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        PlaybackState::Stopped
    }
}

/// Thread-safe playback flags. The poll worker reads `is_playing` to decide
/// whether to re-arm; the control side flips the flags and joins the worker
/// so no stray pass runs after a transition.
#[derive(Debug)]
pub struct SharedPlaybackState {
    playing: AtomicBool,
    paused: AtomicBool,
}

impl SharedPlaybackState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            playing: AtomicBool::new(false),
            paused: AtomicBool::new(false),
        })
    }

    pub fn state(&self) -> PlaybackState {
        if self.playing.load(Ordering::Relaxed) {
            PlaybackState::Playing
        } else if self.paused.load(Ordering::Relaxed) {
            PlaybackState::Paused
        } else {
            PlaybackState::Stopped
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    pub fn set_playing(&self) {
        self.playing.store(true, Ordering::Relaxed);
        self.paused.store(false, Ordering::Relaxed);
    }

    pub fn set_paused(&self) {
        self.playing.store(false, Ordering::Relaxed);
        self.paused.store(true, Ordering::Relaxed);
    }

    pub fn set_stopped(&self) {
        self.playing.store(false, Ordering::Relaxed);
        self.paused.store(false, Ordering::Relaxed);
    }
}
