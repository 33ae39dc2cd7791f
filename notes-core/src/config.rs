//! Location of the notebook file.

use std::path::{Path, PathBuf};

use directories::{ProjectDirs, UserDirs};

/// File name of the notebook inside the data directory.
pub const DATA_FILENAME: &str = "notes.json";

/// The notebook file in the user's documents directory, falling back to the
/// per-user application data directory on platforms without one.
pub fn default_data_path() -> Option<PathBuf> {
    documents_dir().map(|dir| data_path_in(&dir))
}

pub fn data_path_in(dir: &Path) -> PathBuf {
    dir.join(DATA_FILENAME)
}

fn documents_dir() -> Option<PathBuf> {
    UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(Path::to_path_buf))
        .or_else(|| ProjectDirs::from("", "", "notes").map(|dirs| dirs.data_dir().to_path_buf()))
}
