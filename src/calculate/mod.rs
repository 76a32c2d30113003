//! Pairing and standings engine.
//!
//! Three pure functions over the shared data model:
//! - Swiss pairing generation for the next round
//! - Standings recomputation from recorded results
//! - Buchholz tiebreaks and the ranked standings order
//!
//! None of them mutate their inputs; each returns a complete new structure
//! or an [`EngineError`].

mod pairing;
mod standings;
mod tiebreak;

pub use pairing::*;
pub use standings::*;
pub use tiebreak::*;

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{Pairing, Player, PlayerId};

/// Precondition violations reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Invalid round number: {0} (rounds start at 1)")]
    InvalidRoundNumber(u32),

    #[error("Round {0} already has pairings; clear them before regenerating")]
    RoundAlreadyPaired(u32),

    #[error("At least 2 players are required, got {0}")]
    InsufficientPlayers(usize),

    #[error("Pairing {pairing} references unknown player {player}")]
    UnknownPlayerReference { pairing: String, player: PlayerId },

    #[error("Player {player} appears in more than one pairing in round {round}")]
    DuplicatePairingInRound { round: u32, player: PlayerId },

    #[error("Player id {0} appears more than once in the roster")]
    DuplicatePlayer(PlayerId),

    #[error("Player id {0} is reserved for byes")]
    ReservedPlayerId(PlayerId),
}

/// Reject rosters that list the same id twice or use the bye sentinel.
pub(crate) fn validate_roster(players: &[Player]) -> Result<(), EngineError> {
    let mut seen = HashSet::with_capacity(players.len());
    for player in players {
        if player.id.is_bye() {
            return Err(EngineError::ReservedPlayerId(player.id.clone()));
        }
        if !seen.insert(&player.id) {
            return Err(EngineError::DuplicatePlayer(player.id.clone()));
        }
    }
    Ok(())
}

/// Check that no player is booked twice within a single round.
pub fn validate_rounds(pairings: &[Pairing]) -> Result<(), EngineError> {
    let mut booked: HashSet<(u32, &PlayerId)> = HashSet::new();
    for pairing in pairings {
        for player in pairing.players() {
            if !booked.insert((pairing.round, player)) {
                return Err(EngineError::DuplicatePairingInRound {
                    round: pairing.round,
                    player: player.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Check that every player a pairing names is on the roster.
pub(crate) fn validate_references(
    players: &[Player],
    pairings: &[Pairing],
) -> Result<(), EngineError> {
    let roster: HashSet<&PlayerId> = players.iter().map(|p| &p.id).collect();
    for pairing in pairings {
        if let Some(missing) = pairing.players().find(|id| !roster.contains(id)) {
            return Err(EngineError::UnknownPlayerReference {
                pairing: pairing.id.to_string(),
                player: missing.clone(),
            });
        }
    }
    Ok(())
}
