//! Filesystem persistence for the CLI.
//!
//! Layout under the data directory:
//! - `tournaments/<id>/tournament.json`: metadata and lifecycle flags
//! - `tournaments/<id>/players.jsonl`: roster
//! - `tournaments/<id>/pairings.jsonl`: every pairing, byes included
//! - `active`: id of the tournament CLI commands act on

mod jsonl;
mod store;

pub use jsonl::*;
pub use store::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::TournamentId;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt record at {path:?} line {line}: {source}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("Tournament not found: {0}")]
    NotFound(TournamentId),

    #[error("No active tournament; create one or pass --tournament")]
    NoActiveTournament,
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn tournaments_dir(&self) -> PathBuf {
        self.data_dir.join("tournaments")
    }

    pub fn tournament_dir(&self, id: &TournamentId) -> PathBuf {
        self.tournaments_dir().join(id.as_str())
    }

    pub fn active_file(&self) -> PathBuf {
        self.data_dir.join("active")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
