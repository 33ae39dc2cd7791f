//! Command implementations behind the CLI.
//!
//! Every mutating command saves the notebook right away, and every failure
//! is reported instead of swallowed.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use notes_core::models::{Importance, Note, Rgb, DATE_FORMAT};
use notes_core::notebook::NotebookIo;
use notes_core::{Notebook, NotebookError};

/// Fields of a note being composed on the command line.
#[derive(Debug, Clone)]
pub struct Draft {
    pub uid: Option<String>,
    pub title: String,
    pub content: String,
    pub importance: Importance,
    pub color: Rgb,
    pub self_destruction_date: Option<NaiveDateTime>,
}

impl Draft {
    fn into_note(self) -> Note {
        let note = match self.uid {
            Some(uid) => Note::with_uid(uid, self.title, self.content),
            None => Note::new(self.title, self.content),
        };
        note.with_importance(self.importance)
            .with_color(self.color)
            .with_self_destruction_date(self.self_destruction_date)
    }
}

/// Open the notebook at `path` (or the default location) and load it.
///
/// A missing file is an empty notebook; an unreadable or corrupt one is an
/// error, so that a later save cannot clobber it.
pub fn open(path: Option<PathBuf>) -> Result<Notebook> {
    let mut notebook = match path {
        Some(path) => Notebook::new(path),
        None => Notebook::open_default()?,
    };

    match notebook.try_load() {
        Ok(_) | Err(NotebookError::NotFound(_)) => Ok(notebook),
        Err(err) => Err(err)
            .with_context(|| format!("Failed to load {}", notebook.path().display())),
    }
}

fn sorted<Io: NotebookIo>(notebook: &Notebook<Io>) -> Vec<&Note> {
    let mut notes: Vec<&Note> = notebook.iter().collect();
    notes.sort_by(|a, b| a.title().cmp(b.title()).then_with(|| a.uid().cmp(b.uid())));
    notes
}

fn summary(note: &Note) -> String {
    let mut line = format!(
        "{}  {:<6}  {}  {}",
        note.uid(),
        note.importance(),
        note.color(),
        note.title()
    );
    if let Some(date) = note.self_destruction_date() {
        line.push_str(&format!("  (self-destructs {})", date.format(DATE_FORMAT)));
    }
    line
}

pub fn list<Io: NotebookIo>(
    notebook: &Notebook<Io>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let notes = sorted(notebook);

    if json {
        serde_json::to_writer_pretty(&mut *out, &notes)?;
        writeln!(out)?;
        return Ok(());
    }

    if notes.is_empty() {
        writeln!(out, "No notes.")?;
    }
    for note in notes {
        writeln!(out, "{}", summary(note))?;
    }
    Ok(())
}

pub fn show<Io: NotebookIo>(
    notebook: &Notebook<Io>,
    uid: &str,
    out: &mut impl Write,
) -> Result<()> {
    let note = notebook
        .get(uid)
        .with_context(|| format!("No note with uid {}", uid))?;

    writeln!(out, "uid:        {}", note.uid())?;
    writeln!(out, "title:      {}", note.title())?;
    writeln!(out, "importance: {}", note.importance())?;
    writeln!(out, "color:      {}", note.color())?;
    if let Some(date) = note.self_destruction_date() {
        writeln!(out, "destroy at: {}", date.format(DATE_FORMAT))?;
    }
    writeln!(out)?;
    writeln!(out, "{}", note.content())?;
    Ok(())
}

/// Add the drafted note and save. Returns whether it was added.
pub fn add<Io: NotebookIo>(
    notebook: &mut Notebook<Io>,
    draft: Draft,
    out: &mut impl Write,
) -> Result<bool> {
    let note = draft.into_note();
    let uid = note.uid().to_string();

    if !notebook.add(note) {
        tracing::warn!(uid = %uid, "Note already exists");
        writeln!(out, "A note with uid {} already exists; nothing changed.", uid)?;
        return Ok(false);
    }

    notebook.try_save().context("Failed to save notebook")?;
    tracing::info!(uid = %uid, "Added note");
    writeln!(out, "Added note {}", uid)?;
    Ok(true)
}

/// Remove the note and save. Returns whether a note was removed.
pub fn remove<Io: NotebookIo>(
    notebook: &mut Notebook<Io>,
    uid: &str,
    out: &mut impl Write,
) -> Result<bool> {
    if notebook.remove(uid).is_none() {
        writeln!(out, "No note with uid {}.", uid)?;
        return Ok(false);
    }

    notebook.try_save().context("Failed to save notebook")?;
    tracing::info!(uid = %uid, "Removed note");
    writeln!(out, "Removed note {}", uid)?;
    Ok(true)
}
