// Project store - saves patterns and samples under a projects directory
// One folder per project: project.json, history.json, and the sample files

use std::fs;
use std::path::{Path, PathBuf};

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::project::types::{ChangeRecord, History, ProjectData, SampleMeta};
use crate::sequencer::pattern::Pattern;

/// Per-project storage limit, metadata files excluded.
pub const MAX_PROJECT_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Sample formats accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["wav", "mp3", "ogg", "flac"];

const PROJECT_FILE: &str = "project.json";
const HISTORY_FILE: &str = "history.json";
const PROJECT_ID_LEN: usize = 12;

/// Persistence error types. These surface to the caller; they never reach
/// the scheduler, and a load failure downgrades to an empty pattern.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("project not found: {0}")]
    NotFound(String),

    #[error("no filename in upload path")]
    MissingFilename,

    #[error("file type not allowed: {0}")]
    FileTypeNotAllowed(String),

    #[error("project size limit exceeded ({MAX_PROJECT_SIZE_BYTES} bytes)")]
    SizeLimitExceeded,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Directory-backed pattern store and sample provider root.
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    /// Open (and create if missing) a projects directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ProjectError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project_path(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    pub fn sample_path(&self, id: &str, filename: &str) -> PathBuf {
        self.project_path(id).join(filename)
    }

    pub fn project_exists(&self, id: &str) -> bool {
        self.project_path(id).is_dir()
    }

    /// Create a new project with a random 12-character id.
    pub fn create_project(&self) -> Result<ProjectData, ProjectError> {
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(PROJECT_ID_LEN)
            .map(char::from)
            .collect();

        let path = self.project_path(&id);
        fs::create_dir_all(&path)?;

        let project = ProjectData::new(id.clone());
        self.write_project(&project)?;

        let history = History {
            changes: vec![ChangeRecord::new(
                "project_created",
                serde_json::json!({ "id": id }),
            )],
        };
        self.write_history(&project.id, &history)?;

        Ok(project)
    }

    pub fn load_project(&self, id: &str) -> Result<ProjectData, ProjectError> {
        if !self.project_exists(id) {
            return Err(ProjectError::NotFound(id.to_string()));
        }
        let json = fs::read_to_string(self.project_path(id).join(PROJECT_FILE))?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load the persisted pattern rows and tempo.
    ///
    /// Absent or malformed data is "no saved pattern": the caller gets an
    /// empty grid at 120 BPM rather than an error, so a corrupt file can
    /// never keep the sequencer from starting.
    pub fn load_pattern(&self, id: &str) -> (Vec<Vec<bool>>, u32) {
        match self.load_project(id) {
            Ok(project) => (project.pattern, project.bpm),
            Err(_) => (Vec::new(), 120),
        }
    }

    /// Persist the pattern grid and tempo, appending to the change log.
    /// Advisory: failures are reported to the caller and leave the
    /// sequencer's own state untouched.
    pub fn save_pattern(
        &self,
        id: &str,
        pattern: &Pattern,
        bpm: u32,
    ) -> Result<(), ProjectError> {
        let mut project = self.load_project(id)?;
        project.pattern = pattern.rows().to_vec();
        project.bpm = bpm;
        project.last_modified = Some(chrono::Utc::now());
        self.write_project(&project)?;

        self.append_history(
            id,
            ChangeRecord::new(
                "pattern_saved",
                serde_json::json!({ "bpm": bpm, "steps": pattern.steps() }),
            ),
        )
    }

    /// Copy a sample file into the project folder and record it.
    ///
    /// Rejects extensions outside [`ALLOWED_EXTENSIONS`] and uploads that
    /// would push the project past [`MAX_PROJECT_SIZE_BYTES`].
    pub fn add_sample(&self, id: &str, source: &Path) -> Result<SampleMeta, ProjectError> {
        let mut project = self.load_project(id)?;

        let filename = source
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or(ProjectError::MissingFilename)?;

        let extension = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ProjectError::FileTypeNotAllowed(extension));
        }

        let incoming = fs::metadata(source)?.len();
        if self.project_size(id) + incoming > MAX_PROJECT_SIZE_BYTES {
            return Err(ProjectError::SizeLimitExceeded);
        }

        let destination = self.sample_path(id, &filename);
        fs::copy(source, &destination)?;

        let meta = SampleMeta {
            filename: filename.clone(),
            uploaded: chrono::Utc::now(),
            size: fs::metadata(&destination)?.len(),
        };
        project.samples.retain(|s| s.filename != filename);
        project.samples.push(meta.clone());
        self.write_project(&project)?;

        self.append_history(
            id,
            ChangeRecord::new(
                "sample_uploaded",
                serde_json::json!({ "filename": filename }),
            ),
        )?;

        Ok(meta)
    }

    /// Total size of a project's sample files, metadata excluded.
    pub fn project_size(&self, id: &str) -> u64 {
        let path = self.project_path(id);
        let entries = match fs::read_dir(&path) {
            Ok(entries) => entries,
            Err(_) => return 0,
        };

        entries
            .flatten()
            .filter(|entry| {
                let name = entry.file_name();
                name != PROJECT_FILE && name != HISTORY_FILE
            })
            .filter_map(|entry| entry.metadata().ok())
            .filter(|meta| meta.is_file())
            .map(|meta| meta.len())
            .sum()
    }

    pub fn load_history(&self, id: &str) -> Result<History, ProjectError> {
        let json = fs::read_to_string(self.project_path(id).join(HISTORY_FILE))?;
        Ok(serde_json::from_str(&json)?)
    }

    fn write_project(&self, project: &ProjectData) -> Result<(), ProjectError> {
        let json = serde_json::to_string_pretty(project)?;
        fs::write(self.project_path(&project.id).join(PROJECT_FILE), json)?;
        Ok(())
    }

    fn write_history(&self, id: &str, history: &History) -> Result<(), ProjectError> {
        let json = serde_json::to_string_pretty(history)?;
        fs::write(self.project_path(id).join(HISTORY_FILE), json)?;
        Ok(())
    }

    fn append_history(&self, id: &str, record: ChangeRecord) -> Result<(), ProjectError> {
        let mut history = self.load_history(id).unwrap_or_default();
        history.changes.push(record);
        self.write_history(id, &history)
    }
}
