//! # Swiss Manager
//!
//! Swiss-system chess tournament pairing and standings engine.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, pairings, tournaments, ids)
//! - **calculate**: Pure engine: Swiss pairing, standings, Buchholz tiebreaks
//! - **director**: Tournament lifecycle orchestration on top of the engine
//! - **storage**: Filesystem persistence used by the CLI
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod director;
pub mod models;
pub mod storage;

pub use calculate::{
    buchholz, generate_pairings, rank_players, recompute_standings, EngineError, MissingOpponent,
    PairingRound, Standing,
};
pub use director::{Director, DirectorError};
pub use models::*;
