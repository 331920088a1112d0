// Sample bank - instrument index to decoded buffer mapping
// One loader serves both the built-in kit and project-uploaded kits

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::project::{ProjectData, ProjectStore};
use crate::sampler::loader::{load_sample, SampleBuffer, SampleError};

/// The built-in three-piece kit: display name and sample filename.
pub const DEFAULT_KIT: [(&str, &str); 3] = [
    ("Bass Drum", "bass.wav"),
    ("Snare", "snare.wav"),
    ("Hi Hat", "hit.wav"),
];

/// Resolves an instrument index to its decoded buffer.
///
/// Playback-time lookups must never block: a buffer that is not loaded is
/// reported as `None` and the caller treats the trigger as a silent no-op.
pub trait SampleProvider {
    fn buffer(&self, instrument: usize) -> Option<Arc<SampleBuffer>>;
    fn instrument_count(&self) -> usize;
}

/// A file that failed to decode during bank loading.
///
/// Failures are isolated per file; the bank keeps an empty slot for the
/// instrument and the rest of the kit loads normally.
#[derive(Debug)]
pub struct LoadFailure {
    pub instrument: usize,
    pub path: PathBuf,
    pub error: SampleError,
}

/// In-memory bank of decoded samples, indexed by instrument row.
pub struct SampleBank {
    slots: Vec<Option<Arc<SampleBuffer>>>,
    names: Vec<String>,
}

impl SampleBank {
    /// Create an empty bank with the given number of instrument slots.
    pub fn new(instrument_count: usize) -> Self {
        Self {
            slots: vec![None; instrument_count],
            names: (0..instrument_count)
                .map(|i| format!("Instrument {}", i + 1))
                .collect(),
        }
    }

    /// Install a decoded buffer into an instrument slot.
    pub fn insert(&mut self, instrument: usize, buffer: SampleBuffer) {
        if let Some(slot) = self.slots.get_mut(instrument) {
            self.names[instrument] = buffer.name.clone();
            *slot = Some(Arc::new(buffer));
        }
    }

    pub fn name(&self, instrument: usize) -> Option<&str> {
        self.names.get(instrument).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Decode a list of (display name, file path) entries positionally.
    ///
    /// Decode failures leave the slot empty and are returned to the caller
    /// for reporting; one bad file never blocks the others.
    pub fn load_files(entries: &[(String, PathBuf)]) -> (Self, Vec<LoadFailure>) {
        let mut bank = Self::new(entries.len());
        let mut failures = Vec::new();

        for (instrument, (name, path)) in entries.iter().enumerate() {
            bank.names[instrument] = name.clone();
            match load_sample(path) {
                Ok(buffer) => {
                    bank.slots[instrument] = Some(Arc::new(SampleBuffer {
                        name: name.clone(),
                        ..buffer
                    }));
                }
                Err(error) => failures.push(LoadFailure {
                    instrument,
                    path: path.clone(),
                    error,
                }),
            }
        }

        (bank, failures)
    }

    /// Load the built-in kit from a samples directory.
    pub fn load_default_kit(dir: &Path) -> (Self, Vec<LoadFailure>) {
        let entries: Vec<(String, PathBuf)> = DEFAULT_KIT
            .iter()
            .map(|(name, file)| (name.to_string(), dir.join(file)))
            .collect();
        Self::load_files(&entries)
    }

    /// Load a kit from a project's uploaded samples, one instrument per
    /// sample in upload order.
    pub fn load_project_kit(
        store: &ProjectStore,
        project: &ProjectData,
    ) -> (Self, Vec<LoadFailure>) {
        let entries: Vec<(String, PathBuf)> = project
            .samples
            .iter()
            .map(|meta| {
                (
                    meta.filename.clone(),
                    store.sample_path(&project.id, &meta.filename),
                )
            })
            .collect();
        Self::load_files(&entries)
    }
}

impl SampleProvider for SampleBank {
    fn buffer(&self, instrument: usize) -> Option<Arc<SampleBuffer>> {
        self.slots.get(instrument).and_then(Clone::clone)
    }

    fn instrument_count(&self) -> usize {
        self.slots.len()
    }
}
