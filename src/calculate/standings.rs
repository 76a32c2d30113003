//! Standings recomputation.

use std::collections::HashMap;

use tracing::debug;

use super::{validate_references, validate_roster, validate_rounds, EngineError};
use crate::models::{Pairing, Player, PlayerId};

/// Recompute every player's `points`, `opponents` and `bye` from `pairings`.
///
/// Derived fields on the input roster are ignored: the result depends only on
/// the pairing history, so calling this twice yields identical output.
/// Undecided pairings are skipped. Bye pairings award their point and set the
/// bye flag but add no opponent.
pub fn recompute_standings(
    players: &[Player],
    pairings: &[Pairing],
) -> Result<Vec<Player>, EngineError> {
    validate_roster(players)?;
    validate_references(players, pairings)?;
    validate_rounds(pairings)?;

    let mut updated: Vec<Player> = players
        .iter()
        .map(|p| Player {
            points: 0.0,
            opponents: Vec::new(),
            bye: false,
            ..p.clone()
        })
        .collect();

    let index: HashMap<PlayerId, usize> = players
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id.clone(), i))
        .collect();

    let mut decided = 0usize;
    for pairing in pairings {
        let Some((white_points, black_points)) = pairing.result.points() else {
            continue;
        };
        decided += 1;

        // References were validated above.
        let white = index[&pairing.player1];
        updated[white].points += white_points;

        if pairing.is_bye() {
            updated[white].bye = true;
            continue;
        }

        let black = index[&pairing.player2];
        updated[black].points += black_points;
        updated[white].opponents.push(pairing.player2.clone());
        updated[black].opponents.push(pairing.player1.clone());
    }

    debug!(
        players = updated.len(),
        pairings = pairings.len(),
        decided,
        "Recomputed standings"
    );

    Ok(updated)
}
