//! Swiss pairing generation.
//!
//! Players are ranked by score then rating and paired greedily from the top,
//! each taking the highest-ranked remaining opponent they have not met yet.
//! When no unplayed opponent is left the next player in rank order is taken
//! anyway, so every player still gets a game.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::{validate_roster, EngineError};
use crate::models::{Pairing, Player, PlayerId};

/// Output of [`generate_pairings`].
#[derive(Debug, Clone, PartialEq)]
pub struct PairingRound {
    /// New undecided games in the order player 1 was taken, then the bye (if any).
    pub pairings: Vec<Pairing>,

    /// Roster in input order with the bye point and flag applied.
    pub players: Vec<Player>,

    /// Player who received the bye this round.
    pub bye: Option<PlayerId>,
}

/// Swiss ranking order: points descending, then rating descending.
/// Equal keys compare equal so a stable sort keeps roster order.
pub fn swiss_order(a: &Player, b: &Player) -> Ordering {
    b.points
        .partial_cmp(&a.points)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.rating.cmp(&a.rating))
}

/// Unordered set of player pairs that already met in `pairings`.
struct History {
    met: HashSet<(PlayerId, PlayerId)>,
}

impl History {
    fn from_pairings(pairings: &[Pairing]) -> Self {
        let met = pairings
            .iter()
            .filter(|p| !p.is_bye())
            .map(|p| Self::key(&p.player1, &p.player2))
            .collect();
        Self { met }
    }

    fn key(a: &PlayerId, b: &PlayerId) -> (PlayerId, PlayerId) {
        if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        }
    }

    fn have_met(&self, a: &PlayerId, b: &PlayerId) -> bool {
        self.met.contains(&Self::key(a, b))
    }
}

/// Produce the pairings for `round`.
///
/// `prior` is the pairing history from earlier rounds. It must not already
/// contain pairings for `round`; the caller clears a round before
/// regenerating it.
pub fn generate_pairings(
    players: &[Player],
    prior: &[Pairing],
    round: u32,
) -> Result<PairingRound, EngineError> {
    if round < 1 {
        return Err(EngineError::InvalidRoundNumber(round));
    }
    if players.len() < 2 {
        return Err(EngineError::InsufficientPlayers(players.len()));
    }
    validate_roster(players)?;
    if prior.iter().any(|p| p.round == round) {
        return Err(EngineError::RoundAlreadyPaired(round));
    }

    // Indices into `players`, in Swiss rank order.
    let mut pool: Vec<usize> = (0..players.len()).collect();
    pool.sort_by(|&a, &b| swiss_order(&players[a], &players[b]));

    let mut updated = players.to_vec();
    let mut bye = None;

    if pool.len() % 2 == 1 {
        let pos = match pool.iter().rposition(|&i| !players[i].bye) {
            Some(pos) => pos,
            None => {
                warn!(
                    round,
                    "Every player has already had a bye; giving a second bye to the lowest-ranked player"
                );
                pool.len() - 1
            }
        };
        let idx = pool.remove(pos);
        let recipient = &mut updated[idx];
        recipient.points += 1.0;
        recipient.bye = true;
        debug!(round, player = %recipient.id, "Bye awarded");
        bye = Some(recipient.id.clone());
    }

    let history = History::from_pairings(prior);
    let mut pairings = Vec::with_capacity(players.len() / 2 + 1);
    let mut repeats = 0usize;

    while !pool.is_empty() {
        let white = &players[pool.remove(0)];
        if pool.is_empty() {
            break;
        }

        let pos = match pool
            .iter()
            .position(|&i| !history.have_met(&white.id, &players[i].id))
        {
            Some(pos) => pos,
            None => {
                repeats += 1;
                warn!(
                    round,
                    player = %white.id,
                    "No unplayed opponent left; allowing a repeat pairing"
                );
                0
            }
        };
        let black = &players[pool.remove(pos)];

        debug!(round, white = %white.id, black = %black.id, "Paired");
        pairings.push(Pairing::new(round, white.id.clone(), black.id.clone()));
    }

    if let Some(id) = &bye {
        pairings.push(Pairing::bye(round, id.clone()));
    }

    info!(
        round,
        games = pairings.len() - usize::from(bye.is_some()),
        bye = bye.is_some(),
        repeats,
        "Generated pairings"
    );

    Ok(PairingRound {
        pairings,
        players: updated,
        bye,
    })
}
