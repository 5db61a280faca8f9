//! Crate-wide error type.
//!
//! Every storage failure carries the offending path. Absence is never an
//! error anywhere in the crate: a missing manifest, spec tree, or rules
//! directory loads as a valid zero state.

use std::io;
use std::path::PathBuf;

/// Errors surfaced by discovery, staging, and commit.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to stat {}: {source}", path.display())]
    Stat { path: PathBuf, source: io::Error },

    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to list {}: {source}", path.display())]
    List { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    /// The manifest file exists but is not valid JSON. Recoverable only by
    /// the caller deciding to overwrite or abort.
    #[error("failed to unmarshal manifest at {}: {source}", path.display())]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// In-memory manifest state could not be serialized. Indicates an
    /// invariant violation rather than bad user input.
    #[error("failed to marshal manifest: {0}")]
    ManifestSerialize(#[source] serde_json::Error),

    #[error("expected a file at {}, found a directory", path.display())]
    ExpectedFile { path: PathBuf },

    #[error("expected a directory at {}, found a file", path.display())]
    ExpectedDir { path: PathBuf },

    /// A file and a directory under one `inputs/` directory share a base
    /// name, so both would claim the same expected-output file.
    #[error("ambiguous fixture inputs named {name:?} under {}: both a file and a directory", dir.display())]
    InputConflict { dir: PathBuf, name: String },
}

pub type Result<T> = core::result::Result<T, Error>;
