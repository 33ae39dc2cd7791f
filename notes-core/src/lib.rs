//! Core library for Notes.
//!
//! This crate provides the note model, its JSON codec and the file-backed
//! notebook, independent of any front end (CLI, GUI, etc.).
//!
//! # Usage
//!
//! ```no_run
//! use notes_core::models::*;
//! use notes_core::Notebook;
//!
//! let mut notebook = Notebook::open_default()?;
//! notebook.load();
//!
//! notebook.add(Note::new("Groceries", "Milk, eggs").with_importance(Importance::High));
//! notebook.save();
//! # Ok::<(), notes_core::NotebookError>(())
//! ```

pub mod config;
pub mod models;
pub mod notebook;

// Re-export commonly used types at crate root
pub use models::{Hsb, Importance, Note, Rgb};
pub use notebook::{LoadReport, Notebook, NotebookError};
