//! Tournament director.
//!
//! Owns one [`Tournament`] and sequences the engine the way a round manager
//! does: pair once per round, recompute standings after every result, rank
//! on demand. All lifecycle checks live here; the engine only sees rosters and
//! pairing histories.

use thiserror::Error;
use tracing::{debug, info};

use crate::calculate::{
    generate_pairings, rank_players, recompute_standings, EngineError, MissingOpponent, Standing,
};
use crate::config::{AppConfig, MAX_ROUNDS};
use crate::models::{EntityId, GameResult, Pairing, PairingId, Player, PlayerId, Tournament};

/// Errors from director operations.
#[derive(Debug, Error)]
pub enum DirectorError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Tournament has already started")]
    AlreadyStarted,

    #[error("Tournament has not started")]
    NotStarted,

    #[error("Tournament is complete")]
    Completed,

    #[error("Need at least {required} players, have {actual}")]
    NotEnoughPlayers { required: usize, actual: usize },

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Player {0} is referenced by existing pairings")]
    PlayerReferenced(PlayerId),

    #[error("Pairing not found: {0}")]
    PairingNotFound(PairingId),

    #[error("Round {0} already has recorded results")]
    RoundHasResults(u32),

    #[error("Round {0} is not complete")]
    RoundIncomplete(u32),

    #[error("Bye results cannot be edited")]
    ByeNotEditable,

    #[error("Pairing {pairing} belongs to round {round}; only round {current} can be edited")]
    NotCurrentRound {
        pairing: PairingId,
        round: u32,
        current: u32,
    },
}

/// Drives a single tournament through its lifecycle.
#[derive(Debug, Clone)]
pub struct Director {
    tournament: Tournament,
    min_players: usize,
    missing_opponent: MissingOpponent,
}

impl Director {
    /// Create a new, empty tournament.
    pub fn create(name: &str, rounds: u32, config: &AppConfig) -> Result<Self, DirectorError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DirectorError::InvalidInput(
                "tournament name must not be empty".to_string(),
            ));
        }
        if rounds == 0 || rounds > MAX_ROUNDS {
            return Err(DirectorError::InvalidInput(format!(
                "rounds must be between 1 and {}",
                MAX_ROUNDS
            )));
        }

        let tournament = Tournament::new(name.to_string(), rounds);
        info!(id = %tournament.id, name, rounds, "Created tournament");
        Ok(Self::from_tournament(tournament, config))
    }

    /// Wrap an existing tournament (e.g. loaded from storage).
    pub fn from_tournament(tournament: Tournament, config: &AppConfig) -> Self {
        Self {
            tournament,
            min_players: config.tournament.min_players,
            missing_opponent: config.engine.missing_opponent,
        }
    }

    pub fn tournament(&self) -> &Tournament {
        &self.tournament
    }

    pub fn into_tournament(self) -> Tournament {
        self.tournament
    }

    fn ensure_not_started(&self) -> Result<(), DirectorError> {
        if self.tournament.started {
            return Err(DirectorError::AlreadyStarted);
        }
        Ok(())
    }

    fn ensure_in_progress(&self) -> Result<(), DirectorError> {
        if !self.tournament.started {
            return Err(DirectorError::NotStarted);
        }
        if self.tournament.completed {
            return Err(DirectorError::Completed);
        }
        Ok(())
    }

    /// Register a player. The name is trimmed and must not be empty.
    pub fn add_player(&mut self, name: &str, rating: u32) -> Result<PlayerId, DirectorError> {
        self.ensure_not_started()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DirectorError::InvalidInput(
                "player name must not be empty".to_string(),
            ));
        }

        let player = Player::new(EntityId::random(), name, rating);
        let id = player.id.clone();
        debug!(player = %id, name, rating, "Added player");
        self.tournament.players.push(player);
        Ok(id)
    }

    /// Add players from `Name, Rating` lines.
    ///
    /// Lines with a blank name are skipped; a missing or unparsable rating
    /// counts as unrated.
    pub fn import_players(&mut self, text: &str) -> Result<Vec<PlayerId>, DirectorError> {
        self.ensure_not_started()?;
        let mut added = Vec::new();

        for line in text.lines() {
            let mut parts = line.splitn(2, ',');
            let name = parts.next().unwrap_or_default().trim();
            if name.is_empty() {
                continue;
            }
            let rating = parts
                .next()
                .and_then(|r| r.trim().parse::<u32>().ok())
                .unwrap_or(0);
            added.push(self.add_player(name, rating)?);
        }

        info!(count = added.len(), "Imported players");
        Ok(added)
    }

    /// Remove a player. Refused once the tournament has started or any pairing
    /// names the player.
    pub fn remove_player(&mut self, id: &PlayerId) -> Result<Player, DirectorError> {
        self.ensure_not_started()?;
        if self.tournament.is_player_referenced(id) {
            return Err(DirectorError::PlayerReferenced(id.clone()));
        }
        let pos = self
            .tournament
            .players
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| DirectorError::PlayerNotFound(id.clone()))?;

        let removed = self.tournament.players.remove(pos);
        debug!(player = %removed.id, "Removed player");
        Ok(removed)
    }

    /// Start round 1.
    pub fn start(&mut self) -> Result<(), DirectorError> {
        self.ensure_not_started()?;
        let actual = self.tournament.players.len();
        if actual < self.min_players {
            return Err(DirectorError::NotEnoughPlayers {
                required: self.min_players,
                actual,
            });
        }

        self.tournament.started = true;
        self.tournament.current_round = 1;
        info!(players = actual, rounds = self.tournament.rounds, "Tournament started");
        Ok(())
    }

    /// Pair the current round, replacing an existing slice that has no
    /// results yet.
    pub fn generate_pairings(&mut self) -> Result<Vec<Pairing>, DirectorError> {
        self.ensure_in_progress()?;
        let round = self.tournament.current_round;

        // Byes are decided at generation time, so only real games count here.
        if self
            .tournament
            .round_pairings(round)
            .any(|p| !p.is_bye() && p.is_decided())
        {
            return Err(DirectorError::RoundHasResults(round));
        }

        let history: Vec<Pairing> = self
            .tournament
            .pairings
            .iter()
            .filter(|p| p.round != round)
            .cloned()
            .collect();

        // Undo any bye from a discarded pairing of this round before re-pairing.
        let players = recompute_standings(&self.tournament.players, &history)?;
        let generated = generate_pairings(&players, &history, round)?;

        let mut pairings = history;
        pairings.extend(generated.pairings.iter().cloned());
        self.tournament.players = generated.players;
        self.tournament.pairings = pairings;

        info!(round, pairings = generated.pairings.len(), "Round paired");
        Ok(generated.pairings)
    }

    /// Record (or overwrite) a result in the current round and recompute
    /// standings. Earlier rounds are closed once the tournament advances.
    pub fn record_result(
        &mut self,
        pairing_id: &PairingId,
        result: GameResult,
    ) -> Result<(), DirectorError> {
        self.ensure_in_progress()?;
        if result == GameResult::ByeWin {
            return Err(DirectorError::ByeNotEditable);
        }

        let mut pairings = self.tournament.pairings.clone();
        let pairing = pairings
            .iter_mut()
            .find(|p| &p.id == pairing_id)
            .ok_or_else(|| DirectorError::PairingNotFound(pairing_id.clone()))?;
        if pairing.is_bye() {
            return Err(DirectorError::ByeNotEditable);
        }
        let current = self.tournament.current_round;
        if pairing.round != current {
            return Err(DirectorError::NotCurrentRound {
                pairing: pairing_id.clone(),
                round: pairing.round,
                current,
            });
        }
        pairing.result = result;

        let players = recompute_standings(&self.tournament.players, &pairings)?;
        self.tournament.pairings = pairings;
        self.tournament.players = players;

        debug!(pairing = %pairing_id, result = result.as_str(), "Recorded result");
        Ok(())
    }

    /// Move to the next round, or mark the tournament complete after the last one.
    pub fn advance_round(&mut self) -> Result<(), DirectorError> {
        self.ensure_in_progress()?;
        let round = self.tournament.current_round;
        if !self.tournament.is_current_round_complete() {
            return Err(DirectorError::RoundIncomplete(round));
        }

        if round >= self.tournament.rounds {
            self.tournament.completed = true;
            info!(round, "Tournament complete");
        } else {
            self.tournament.current_round = round + 1;
            info!(round = round + 1, "Advanced to next round");
        }
        Ok(())
    }

    /// Pairings of the round in progress.
    pub fn current_round_pairings(&self) -> Vec<&Pairing> {
        self.tournament
            .round_pairings(self.tournament.current_round)
            .collect()
    }

    /// Ranked standings with Buchholz tiebreaks.
    pub fn standings(&self) -> Result<Vec<Standing>, DirectorError> {
        Ok(rank_players(&self.tournament.players, self.missing_opponent)?)
    }
}
