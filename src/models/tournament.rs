//! Tournament model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, Pairing, Player, PlayerId, TournamentId};

/// A Swiss tournament: roster, pairing history and lifecycle flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    /// Unique identifier
    pub id: TournamentId,

    /// Tournament name
    pub name: String,

    /// Planned number of rounds
    pub rounds: u32,

    /// Round in progress (0 before start)
    pub current_round: u32,

    #[serde(default)]
    pub players: Vec<Player>,

    /// All pairings across rounds, byes included
    #[serde(default)]
    pub pairings: Vec<Pairing>,

    pub started: bool,

    pub completed: bool,

    /// When this tournament was created
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create an empty tournament with a freshly minted id.
    pub fn new(name: String, rounds: u32) -> Self {
        Self {
            id: EntityId::random(),
            name,
            rounds,
            current_round: 0,
            players: Vec::new(),
            pairings: Vec::new(),
            started: false,
            completed: false,
            created_at: Utc::now(),
        }
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Display name for a player id, including the bye sentinel.
    pub fn player_name(&self, id: &PlayerId) -> &str {
        if id.is_bye() {
            return "(bye)";
        }
        self.player(id).map_or("Unknown Player", |p| p.name.as_str())
    }

    /// Pairings belonging to `round`.
    pub fn round_pairings(&self, round: u32) -> impl Iterator<Item = &Pairing> {
        self.pairings.iter().filter(move |p| p.round == round)
    }

    /// Whether every pairing of the current round has a result.
    pub fn is_current_round_complete(&self) -> bool {
        let mut pairings = self.round_pairings(self.current_round).peekable();
        pairings.peek().is_some() && pairings.all(|p| p.is_decided())
    }

    /// Whether any pairing references `player`.
    pub fn is_player_referenced(&self, player: &PlayerId) -> bool {
        self.pairings.iter().any(|p| p.involves(player))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameResult;

    fn sample() -> Tournament {
        let mut t = Tournament::new("Club Open".to_string(), 5);
        t.players.push(Player::new(PlayerId::from("a"), "Alice", 1500));
        t.players.push(Player::new(PlayerId::from("b"), "Bob", 1400));
        t.current_round = 1;
        t
    }

    #[test]
    fn test_new_tournament() {
        let t = Tournament::new("Club Open".to_string(), 5);
        assert_eq!(t.current_round, 0);
        assert!(!t.started);
        assert!(!t.completed);
        assert!(t.players.is_empty());
    }

    #[test]
    fn test_player_name_lookup() {
        let t = sample();
        assert_eq!(t.player_name(&PlayerId::from("a")), "Alice");
        assert_eq!(t.player_name(&EntityId::bye()), "(bye)");
        assert_eq!(t.player_name(&PlayerId::from("zz")), "Unknown Player");
    }

    #[test]
    fn test_round_completion() {
        let mut t = sample();
        assert!(!t.is_current_round_complete());

        t.pairings
            .push(Pairing::new(1, PlayerId::from("a"), PlayerId::from("b")));
        assert!(!t.is_current_round_complete());

        t.pairings[0].result = GameResult::Draw;
        assert!(t.is_current_round_complete());
    }

    #[test]
    fn test_player_referenced() {
        let mut t = sample();
        assert!(!t.is_player_referenced(&PlayerId::from("a")));
        t.pairings
            .push(Pairing::new(1, PlayerId::from("a"), PlayerId::from("b")));
        assert!(t.is_player_referenced(&PlayerId::from("a")));
    }
}
