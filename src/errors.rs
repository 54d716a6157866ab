//! Error types for the diarynotes application.
//!
//! This module defines custom error types that categorize the different failures
//! that can occur while managing, persisting and exporting diary notes.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Rejected input for a note mutation. No state changes when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The note text was empty or whitespace-only.
    #[error("Note text is empty")]
    EmptyText,

    /// No note with the given id exists.
    #[error("Note not found: {id}")]
    NotFound { id: i64 },
}

/// The main error type for the diarynotes application.
#[derive(Error, Debug)]
pub enum DiaryError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A create/update/delete was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Stored data under `key` could not be decoded.
    #[error("Stored data under '{key}' is corrupt: {message}")]
    CorruptStore { key: String, message: String },

    /// Export was requested for an empty collection.
    #[error("There are no notes to export yet")]
    NothingToExport,

    /// Building or writing the export document failed.
    #[error("PDF Error: {message}")]
    ExportFailed { message: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    /// A category name outside the fixed set.
    #[error("Unknown category '{name}' (expected one of General, Work, Health, Love)")]
    InvalidCategory { name: String },
}

impl DiaryError {
    /// True for the soft failures the presentation layer may choose to ignore.
    pub fn is_validation(&self) -> bool {
        matches!(self, DiaryError::Validation(_))
    }
}
