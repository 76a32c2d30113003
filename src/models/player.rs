//! Player model.

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// A tournament participant.
///
/// `points`, `opponents` and `bye` are derived from the pairing history by
/// [`crate::calculate::recompute_standings`] and must not be edited directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier
    pub id: PlayerId,

    /// Display name
    pub name: String,

    /// Rating (0 = unrated)
    pub rating: u32,

    /// Score in half-point increments
    #[serde(default)]
    pub points: f64,

    /// Opponents faced in decided games, in pairing order
    #[serde(default)]
    pub opponents: Vec<PlayerId>,

    /// Whether this player has received a bye
    #[serde(default)]
    pub bye: bool,
}

impl Player {
    /// Create a fresh player with no games played.
    pub fn new(id: PlayerId, name: impl Into<String>, rating: u32) -> Self {
        Self {
            id,
            name: name.into(),
            rating,
            points: 0.0,
            opponents: Vec::new(),
            bye: false,
        }
    }

    /// Builder method to set points.
    pub fn with_points(mut self, points: f64) -> Self {
        self.points = points;
        self
    }

    /// Builder method to mark a bye as already received.
    pub fn with_bye(mut self) -> Self {
        self.bye = true;
        self
    }

    pub fn is_unrated(&self) -> bool {
        self.rating == 0
    }
}
