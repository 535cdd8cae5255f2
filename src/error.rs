// Copyright (c) 2024 Mike Tsao

//! Recoverable failures. Nothing in this crate lets a bad file or a dead
//! network connection stop the detection loop; instead, loaders return these
//! values, the caller logs them, and processing moves on to the next source.

use std::path::PathBuf;
use thiserror::Error;

/// The most commonly used imports.
pub mod prelude {
    pub use super::{Diagnostic, LoadError};
}

/// Why a curve or row source produced no content.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file does not exist.
    #[error("file not found at path: {0}")]
    MissingFile(PathBuf),

    /// The file exists but couldn't be read as UTF-8 text.
    #[error("couldn't read {path}: {source}")]
    Io {
        #[allow(missing_docs)]
        path: PathBuf,
        #[allow(missing_docs)]
        #[source]
        source: std::io::Error,
    },

    /// A web request failed or returned a non-success status.
    #[error("error loading {url}: {reason}")]
    Network {
        #[allow(missing_docs)]
        url: String,
        #[allow(missing_docs)]
        reason: String,
    },

    /// The fetcher doesn't know how to retrieve this kind of location.
    #[error("unsupported source: {0}")]
    Unsupported(String),
}

/// A line of input that was skipped. Parsers collect these rather than
/// failing, so that one typo in a hand-edited file costs one line, not the
/// whole curve.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::Display)]
#[display(fmt = "line {}: {} ({:?})", line_number, reason, line)]
pub struct Diagnostic {
    /// One-based line number within the source text.
    pub line_number: usize,
    /// The offending line, untrimmed.
    pub line: String,
    /// What was wrong with it.
    pub reason: String,
}
impl Diagnostic {
    #[allow(missing_docs)]
    pub fn new(line_number: usize, line: &str, reason: impl Into<String>) -> Self {
        Self {
            line_number,
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}
