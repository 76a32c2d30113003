//! Tournament save/load.

use std::fs;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{JsonlReader, JsonlWriter, StorageConfig, StorageError};
use crate::models::{Pairing, Player, Tournament, TournamentId};

const META_FILE: &str = "tournament.json";
const PLAYERS_FILE: &str = "players.jsonl";
const PAIRINGS_FILE: &str = "pairings.jsonl";

/// Tournament fields stored in `tournament.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentMeta {
    pub id: TournamentId,
    pub name: String,
    pub rounds: u32,
    pub current_round: u32,
    pub started: bool,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Tournament> for TournamentMeta {
    fn from(t: &Tournament) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            rounds: t.rounds,
            current_round: t.current_round,
            started: t.started,
            completed: t.completed,
            created_at: t.created_at,
        }
    }
}

/// Reads and writes tournaments under a data directory.
#[derive(Debug, Clone)]
pub struct TournamentStore {
    config: StorageConfig,
}

impl TournamentStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Persist the whole tournament, replacing any previous copy.
    pub fn save(&self, tournament: &Tournament) -> Result<(), StorageError> {
        let dir = self.config.tournament_dir(&tournament.id);
        fs::create_dir_all(&dir)?;

        let meta = TournamentMeta::from(tournament);
        fs::write(dir.join(META_FILE), serde_json::to_string_pretty(&meta)?)?;
        JsonlWriter::new(dir.join(PLAYERS_FILE)).write_all(&tournament.players)?;
        JsonlWriter::new(dir.join(PAIRINGS_FILE)).write_all(&tournament.pairings)?;

        debug!(id = %tournament.id, "Saved tournament");
        Ok(())
    }

    pub fn load(&self, id: &TournamentId) -> Result<Tournament, StorageError> {
        let dir = self.config.tournament_dir(id);
        let meta_path = dir.join(META_FILE);
        if !meta_path.exists() {
            return Err(StorageError::NotFound(id.clone()));
        }

        let meta: TournamentMeta = serde_json::from_str(&fs::read_to_string(meta_path)?)?;
        let players: Vec<Player> = JsonlReader::new(dir.join(PLAYERS_FILE)).read_all()?;
        let pairings: Vec<Pairing> = JsonlReader::new(dir.join(PAIRINGS_FILE)).read_all()?;

        Ok(Tournament {
            id: meta.id,
            name: meta.name,
            rounds: meta.rounds,
            current_round: meta.current_round,
            players,
            pairings,
            started: meta.started,
            completed: meta.completed,
            created_at: meta.created_at,
        })
    }

    /// Mark `id` as the tournament commands default to.
    pub fn set_active(&self, id: &TournamentId) -> Result<(), StorageError> {
        fs::create_dir_all(&self.config.data_dir)?;
        fs::write(self.config.active_file(), id.as_str())?;
        info!(id = %id, "Active tournament set");
        Ok(())
    }

    pub fn active(&self) -> Result<TournamentId, StorageError> {
        let path = self.config.active_file();
        if !path.exists() {
            return Err(StorageError::NoActiveTournament);
        }
        let id = fs::read_to_string(path)?;
        let id = id.trim();
        if id.is_empty() {
            return Err(StorageError::NoActiveTournament);
        }
        Ok(TournamentId::from(id))
    }

    /// The explicit id if given, otherwise the active one.
    pub fn resolve(&self, explicit: Option<&str>) -> Result<TournamentId, StorageError> {
        match explicit {
            Some(id) => Ok(TournamentId::from(id)),
            None => self.active(),
        }
    }

    /// Metadata of every stored tournament, oldest first.
    pub fn list(&self) -> Result<Vec<TournamentMeta>, StorageError> {
        let dir = self.config.tournaments_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut metas = Vec::new();
        for entry in fs::read_dir(dir)? {
            let meta_path = entry?.path().join(META_FILE);
            if meta_path.exists() {
                let meta: TournamentMeta = serde_json::from_str(&fs::read_to_string(meta_path)?)?;
                metas.push(meta);
            }
        }
        metas.sort_by_key(|m| m.created_at);
        Ok(metas)
    }
}
