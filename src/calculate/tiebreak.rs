//! Buchholz tiebreaks and ranked standings.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{validate_roster, EngineError};
use crate::models::{Player, PlayerId};

/// What to do when a player's opponent list names an id that is not on the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingOpponent {
    /// The absent opponent contributes 0.
    #[default]
    CountZero,
    /// Fail with [`EngineError::UnknownPlayerReference`].
    Reject,
}

/// One row of the ranked standings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    /// 1-based position
    pub rank: usize,
    pub player: Player,
    /// Buchholz score
    pub tiebreak: f64,
}

/// Buchholz score per player, in input order: the sum of each opponent's points.
///
/// Expects `points` already recomputed from the pairing history.
pub fn buchholz(players: &[Player], policy: MissingOpponent) -> Result<Vec<f64>, EngineError> {
    let points: HashMap<&PlayerId, f64> = players.iter().map(|p| (&p.id, p.points)).collect();

    players
        .iter()
        .map(|player| {
            player.opponents.iter().try_fold(0.0, |sum, opponent| {
                match (points.get(opponent), policy) {
                    (Some(p), _) => Ok(sum + p),
                    (None, MissingOpponent::CountZero) => Ok(sum),
                    (None, MissingOpponent::Reject) => Err(EngineError::UnknownPlayerReference {
                        pairing: format!("opponents of {}", player.id),
                        player: opponent.clone(),
                    }),
                }
            })
        })
        .collect()
}

/// Rank players by points then tiebreak, both descending. Ties keep input order.
pub fn rank_players(
    players: &[Player],
    policy: MissingOpponent,
) -> Result<Vec<Standing>, EngineError> {
    validate_roster(players)?;
    let tiebreaks = buchholz(players, policy)?;

    let mut rows: Vec<(&Player, f64)> = players.iter().zip(tiebreaks).collect();
    rows.sort_by(|(a, ta), (b, tb)| {
        b.points
            .partial_cmp(&a.points)
            .unwrap_or(Ordering::Equal)
            .then_with(|| tb.partial_cmp(ta).unwrap_or(Ordering::Equal))
    });

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(i, (player, tiebreak))| Standing {
            rank: i + 1,
            player: player.clone(),
            tiebreak,
        })
        .collect())
}
