//! Core data models for the tournament.

mod ids;
mod pairing;
mod player;
mod tournament;

pub use ids::*;
pub use pairing::*;
pub use player::*;
pub use tournament::*;
