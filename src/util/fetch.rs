// Copyright (c) 2024 Mike Tsao

use crate::{error::LoadError, traits::FetchesContent, types::FetchTicket, types::UidFactory};
use core::fmt;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where a curve or row source's text lives.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceLocation {
    /// A file on the local filesystem.
    File(PathBuf),
    /// An `http://` or `https://` URL.
    Url(String),
}
impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::File(path) => write!(f, "{}", path.display()),
            SourceLocation::Url(url) => write!(f, "{url}"),
        }
    }
}
impl SourceLocation {
    /// Whether a configured source name is a web URL rather than a file name.
    pub fn is_url(source: &str) -> bool {
        source.starts_with("http://") || source.starts_with("https://")
    }

    /// Turns a configured source name into a location. URLs are taken as-is;
    /// anything else is a file name relative to `root`.
    pub fn resolve(source: &str, root: &Path) -> Self {
        if Self::is_url(source) {
            Self::Url(source.to_string())
        } else {
            Self::File(root.join(source))
        }
    }
}

/// Reads a whole text file, distinguishing "not there" from "couldn't read".
pub fn read_text_file(path: &Path) -> Result<String, LoadError> {
    if !path.is_file() {
        return Err(LoadError::MissingFile(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// A [FetchesContent] that reads local files synchronously. Every fetch is
/// complete by the time [FetchesContent::begin_fetch()] returns, so the first
/// poll always succeeds. It has no network stack; URLs fail with
/// [LoadError::Unsupported]. Hosts that need URLs should use the fetch service
/// in the `proximity-rtpc-services` crate.
#[derive(Debug, Default)]
pub struct FileFetcher {
    tickets: UidFactory<FetchTicket>,
    ready: FxHashMap<FetchTicket, Result<String, LoadError>>,
}
impl FetchesContent for FileFetcher {
    fn begin_fetch(&mut self, location: &SourceLocation) -> FetchTicket {
        let ticket = self.tickets.mint_next();
        let result = match location {
            SourceLocation::File(path) => read_text_file(path),
            SourceLocation::Url(url) => Err(LoadError::Unsupported(url.clone())),
        };
        self.ready.insert(ticket, result);
        ticket
    }

    fn poll_fetch(&mut self, ticket: FetchTicket) -> Option<Result<String, LoadError>> {
        self.ready.remove(&ticket)
    }
}
