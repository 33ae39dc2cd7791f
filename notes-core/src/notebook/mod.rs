//! File-backed collection of notes.
//!
//! A [`Notebook`] keeps notes in memory keyed by uid and persists the whole
//! set as one JSON array. The plain [`Notebook::load`] and
//! [`Notebook::save`] never fail from the caller's point of view; the
//! `try_` variants report what went wrong.

mod errors;
mod io;

pub use errors::*;
pub use io::*;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::config;
use crate::models::Note;

/// Outcome of a successful [`Notebook::try_load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub added: usize,
    pub skipped_malformed: usize,
    pub skipped_duplicate: usize,
}

#[derive(Debug)]
pub struct Notebook<Io = FsNotebookIo> {
    path: PathBuf,
    notes: HashMap<String, Note>,
    io: Io,
}

impl Notebook {
    /// Create an empty notebook persisted at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_io(path, FsNotebookIo)
    }

    /// Create an empty notebook persisted at the default location.
    pub fn open_default() -> Result<Self, NotebookError> {
        let path = config::default_data_path().ok_or(NotebookError::NoDocumentsDir)?;
        Ok(Self::new(path))
    }
}

impl<Io: NotebookIo> Notebook<Io> {
    pub fn with_io(path: impl Into<PathBuf>, io: Io) -> Self {
        Self {
            path: path.into(),
            notes: HashMap::new(),
            io,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn notes(&self) -> &HashMap<String, Note> {
        &self.notes
    }

    pub fn get(&self, uid: &str) -> Option<&Note> {
        self.notes.get(uid)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    /// Add a note unless one with the same uid is already present.
    ///
    /// Returns whether the note was inserted. An existing note is never
    /// overwritten.
    pub fn add(&mut self, note: Note) -> bool {
        if self.notes.contains_key(note.uid()) {
            tracing::debug!(uid = note.uid(), "Ignoring note with duplicate uid");
            return false;
        }

        self.notes.insert(note.uid().to_string(), note);
        true
    }

    /// Remove the note with `uid`, returning it if it was present.
    pub fn remove(&mut self, uid: &str) -> Option<Note> {
        self.notes.remove(uid)
    }

    /// Write every note to the notebook file, replacing its contents.
    pub fn try_save(&self) -> Result<(), NotebookError> {
        let notes: Vec<&Note> = self.notes.values().collect();
        let data = serde_json::to_vec(&notes).map_err(NotebookError::Serialize)?;

        self.io
            .write(&self.path, &data)
            .map_err(|source| NotebookError::Io {
                path: self.path.clone(),
                source,
            })?;

        tracing::info!(count = notes.len(), path = %self.path.display(), "Saved notebook");
        Ok(())
    }

    /// Like [`try_save`](Self::try_save), but failures are only logged.
    pub fn save(&self) {
        if let Err(err) = self.try_save() {
            tracing::warn!(error = %err, "Failed to save notebook");
        }
    }

    /// Merge the notes stored in the notebook file into this notebook.
    ///
    /// Records that fail to parse are skipped, as are records whose uid is
    /// already present (the first occurrence wins). On error the in-memory
    /// notes are left untouched.
    pub fn try_load(&mut self) -> Result<LoadReport, NotebookError> {
        let data = self.io.read(&self.path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                NotebookError::NotFound(self.path.clone())
            } else {
                NotebookError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        let value: Value = serde_json::from_slice(&data).map_err(NotebookError::Json)?;
        let records: Vec<Map<String, Value>> =
            serde_json::from_value(value).map_err(|_| NotebookError::NotAnArray)?;

        let mut report = LoadReport::default();
        for record in &records {
            match Note::try_parse(record) {
                Ok(note) => {
                    if self.add(note) {
                        report.added += 1;
                    } else {
                        report.skipped_duplicate += 1;
                    }
                }
                Err(err) => {
                    tracing::debug!(error = %err, "Skipping malformed note record");
                    report.skipped_malformed += 1;
                }
            }
        }

        tracing::info!(
            added = report.added,
            skipped_malformed = report.skipped_malformed,
            skipped_duplicate = report.skipped_duplicate,
            path = %self.path.display(),
            "Loaded notebook"
        );
        Ok(report)
    }

    /// Like [`try_load`](Self::try_load), but any failure leaves the
    /// notebook as it was and yields an empty report.
    pub fn load(&mut self) -> LoadReport {
        match self.try_load() {
            Ok(report) => report,
            Err(NotebookError::NotFound(path)) => {
                tracing::debug!(path = %path.display(), "No notebook file to load");
                LoadReport::default()
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load notebook");
                LoadReport::default()
            }
        }
    }
}
