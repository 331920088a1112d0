// Project persistence - directory-per-project pattern and sample storage

pub mod store;
pub mod types;

pub use store::{ProjectError, ProjectStore, ALLOWED_EXTENSIONS, MAX_PROJECT_SIZE_BYTES};
pub use types::{ChangeRecord, History, ProjectData, SampleMeta};
