//! Pairing model: one scheduled game between two players in a round.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{EntityId, PairingId, PlayerId};

/// Outcome of a pairing. Player 1 conventionally plays white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameResult {
    #[serde(rename = "1-0")]
    WhiteWin,
    #[serde(rename = "0-1")]
    BlackWin,
    #[serde(rename = "1/2-1/2")]
    Draw,
    #[default]
    #[serde(rename = "")]
    Undecided,
    /// Full point awarded to player 1 of a bye pairing.
    #[serde(rename = "bye")]
    ByeWin,
}

impl GameResult {
    pub fn is_decided(&self) -> bool {
        !matches!(self, GameResult::Undecided)
    }

    /// Points awarded to (player1, player2), or `None` while undecided.
    pub fn points(&self) -> Option<(f64, f64)> {
        match self {
            GameResult::WhiteWin | GameResult::ByeWin => Some((1.0, 0.0)),
            GameResult::BlackWin => Some((0.0, 1.0)),
            GameResult::Draw => Some((0.5, 0.5)),
            GameResult::Undecided => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::WhiteWin => "1-0",
            GameResult::BlackWin => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Undecided => "",
            GameResult::ByeWin => "bye",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Undecided => write!(f, "-"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl FromStr for GameResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1-0" | "white" | "w" => Ok(GameResult::WhiteWin),
            "0-1" | "black" | "b" => Ok(GameResult::BlackWin),
            "1/2-1/2" | "1/2" | "draw" | "d" => Ok(GameResult::Draw),
            "" | "-" | "undecided" | "none" => Ok(GameResult::Undecided),
            "bye" => Ok(GameResult::ByeWin),
            other => Err(format!("Unknown result: {}", other)),
        }
    }
}

/// A single game pairing in one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    /// Unique identifier
    pub id: PairingId,

    /// White player
    pub player1: PlayerId,

    /// Black player, or [`EntityId::bye`] for a bye
    pub player2: PlayerId,

    #[serde(default)]
    pub result: GameResult,

    /// Round number (1-based)
    pub round: u32,
}

impl Pairing {
    /// Create an undecided pairing. The id is derived from round and players.
    pub fn new(round: u32, player1: PlayerId, player2: PlayerId) -> Self {
        let id = EntityId::generate(&[&round.to_string(), player1.as_str(), player2.as_str()]);

        Self {
            id,
            player1,
            player2,
            result: GameResult::Undecided,
            round,
        }
    }

    /// Create the synthetic pairing that records a bye for `player`.
    pub fn bye(round: u32, player: PlayerId) -> Self {
        let mut pairing = Self::new(round, player, EntityId::bye());
        pairing.result = GameResult::ByeWin;
        pairing
    }

    /// Builder method to set the result.
    pub fn with_result(mut self, result: GameResult) -> Self {
        self.result = result;
        self
    }

    pub fn is_bye(&self) -> bool {
        self.player2.is_bye()
    }

    pub fn is_decided(&self) -> bool {
        self.result.is_decided()
    }

    pub fn involves(&self, player: &PlayerId) -> bool {
        &self.player1 == player || &self.player2 == player
    }

    /// The real players in this pairing (excludes the bye sentinel).
    pub fn players(&self) -> impl Iterator<Item = &PlayerId> {
        std::iter::once(&self.player1).chain((!self.is_bye()).then_some(&self.player2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairing_creation() {
        let pairing = Pairing::new(1, PlayerId::from("alice"), PlayerId::from("bob"));

        assert_eq!(pairing.round, 1);
        assert_eq!(pairing.result, GameResult::Undecided);
        assert!(!pairing.is_bye());
        assert!(!pairing.id.as_str().is_empty());
    }

    #[test]
    fn test_pairing_id_deterministic() {
        let p1 = Pairing::new(2, PlayerId::from("alice"), PlayerId::from("bob"));
        let p2 = Pairing::new(2, PlayerId::from("alice"), PlayerId::from("bob"));
        let other_round = Pairing::new(3, PlayerId::from("alice"), PlayerId::from("bob"));
        assert_eq!(p1.id, p2.id);
        assert_ne!(p1.id, other_round.id);
    }

    #[test]
    fn test_bye_pairing() {
        let pairing = Pairing::bye(1, PlayerId::from("carol"));
        assert!(pairing.is_bye());
        assert!(pairing.is_decided());
        assert_eq!(pairing.result, GameResult::ByeWin);
        assert_eq!(pairing.players().count(), 1);
    }

    #[test]
    fn test_result_points_sum_to_one() {
        for result in [
            GameResult::WhiteWin,
            GameResult::BlackWin,
            GameResult::Draw,
            GameResult::ByeWin,
        ] {
            let (a, b) = result.points().unwrap();
            assert_eq!(a + b, 1.0, "{:?}", result);
        }
        assert_eq!(GameResult::Undecided.points(), None);
    }

    #[test]
    fn test_result_parse() {
        assert_eq!("1-0".parse::<GameResult>(), Ok(GameResult::WhiteWin));
        assert_eq!("Black".parse::<GameResult>(), Ok(GameResult::BlackWin));
        assert_eq!("1/2".parse::<GameResult>(), Ok(GameResult::Draw));
        assert!("2-0".parse::<GameResult>().is_err());
    }

    #[test]
    fn test_result_serializes_as_score_string() {
        let pairing = Pairing::new(1, PlayerId::from("a"), PlayerId::from("b"))
            .with_result(GameResult::Draw);
        let json = serde_json::to_string(&pairing).unwrap();
        assert!(json.contains("\"1/2-1/2\""));
        let back: Pairing = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pairing);
    }
}
