use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotebookError {
    #[error("notebook file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("failed to access notebook file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("notebook file is not valid JSON")]
    Json(#[source] serde_json::Error),

    #[error("failed to serialize notes")]
    Serialize(#[source] serde_json::Error),

    #[error("notebook file does not hold an array of note objects")]
    NotAnArray,

    #[error("could not determine a documents directory for the current user")]
    NoDocumentsDir,
}
