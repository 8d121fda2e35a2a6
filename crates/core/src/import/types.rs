//! Types for playlist imports.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{CatalogError, Playlist};

/// Result of an import that did not hit a hard failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ImportOutcome {
    /// A playlist was created and populated.
    Imported {
        playlist: Playlist,
        /// Candidate paths found in the input.
        attempted: usize,
        /// Memberships the catalog accepted.
        imported: usize,
    },
    /// A playlist with the name already exists. Nothing was written.
    NameConflict { name: String },
    /// The input had no candidate paths. Nothing was written.
    NoValidLines,
    /// No candidate path matched a catalog item. Nothing was written.
    NoMatches { attempted: usize },
}

/// How an import outcome should be reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    /// Every candidate path was imported.
    Full,
    /// Some candidate paths were imported.
    Partial,
    /// Nothing was imported although the input had candidate paths.
    NoMatches,
    NoValidLines,
    NameConflict,
}

impl ImportOutcome {
    pub fn status(&self) -> ImportStatus {
        match self {
            ImportOutcome::Imported {
                attempted,
                imported,
                ..
            } => {
                if *imported == 0 {
                    ImportStatus::NoMatches
                } else if imported >= attempted {
                    ImportStatus::Full
                } else {
                    ImportStatus::Partial
                }
            }
            ImportOutcome::NameConflict { .. } => ImportStatus::NameConflict,
            ImportOutcome::NoValidLines => ImportStatus::NoValidLines,
            ImportOutcome::NoMatches { .. } => ImportStatus::NoMatches,
        }
    }

    /// Number of candidate paths considered.
    pub fn attempted(&self) -> usize {
        match self {
            ImportOutcome::Imported { attempted, .. } | ImportOutcome::NoMatches { attempted } => {
                *attempted
            }
            ImportOutcome::NameConflict { .. } | ImportOutcome::NoValidLines => 0,
        }
    }

    /// Number of memberships written.
    pub fn imported(&self) -> usize {
        match self {
            ImportOutcome::Imported { imported, .. } => *imported,
            _ => 0,
        }
    }

    /// The created playlist, if any.
    pub fn playlist(&self) -> Option<&Playlist> {
        match self {
            ImportOutcome::Imported { playlist, .. } => Some(playlist),
            _ => None,
        }
    }
}

impl fmt::Display for ImportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status() {
            ImportStatus::Full => write!(
                f,
                "Imported {} entries into playlist \"{}\"",
                self.imported(),
                self.playlist().map(|p| p.name.as_str()).unwrap_or_default()
            ),
            ImportStatus::Partial => write!(
                f,
                "Imported {} of {} entries into playlist \"{}\"",
                self.imported(),
                self.attempted(),
                self.playlist().map(|p| p.name.as_str()).unwrap_or_default()
            ),
            ImportStatus::NoMatches => write!(f, "No matching entries found"),
            ImportStatus::NoValidLines => write!(f, "No valid entries found in playlist file"),
            ImportStatus::NameConflict => match self {
                ImportOutcome::NameConflict { name } => {
                    write!(f, "Playlist \"{}\" already exists", name)
                }
                _ => write!(f, "Playlist already exists"),
            },
        }
    }
}

/// Hard failures that stop an import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid playlist name: {0:?}")]
    InvalidName(String),

    #[error("Import requires write access to the catalog")]
    AccessDenied,

    #[error("Too many playlist entries: entry {0} has no representable play order")]
    TooManyEntries(usize),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
