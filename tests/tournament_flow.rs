//! Full tournament runs through the director, checking the engine invariants
//! after every round.

use std::collections::{HashMap, HashSet};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use swiss_manager::config::AppConfig;
use swiss_manager::storage::{StorageConfig, TournamentStore};
use swiss_manager::{
    calculate::validate_rounds, recompute_standings, Director, GameResult, Tournament,
};

fn five_player_director() -> Director {
    let mut director = Director::create("Club Championship", 4, &AppConfig::default()).unwrap();
    director
        .import_players("A, 2000\nB, 1900\nC, 1800\nD, 1700\nE, 1600")
        .unwrap();
    director.start().unwrap();
    director
}

fn name_pairs(t: &Tournament, round: u32) -> Vec<(String, String)> {
    t.round_pairings(round)
        .map(|p| {
            (
                t.player_name(&p.player1).to_string(),
                t.player_name(&p.player2).to_string(),
            )
        })
        .collect()
}

fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
    raw.iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

/// Play every game of the current round as a white win and advance.
fn play_round_white_wins(director: &mut Director) {
    let games: Vec<_> = director
        .generate_pairings()
        .unwrap()
        .into_iter()
        .filter(|p| !p.is_bye())
        .map(|p| p.id)
        .collect();
    for id in games {
        director.record_result(&id, GameResult::WhiteWin).unwrap();
    }
    director.advance_round().unwrap();
}

fn assert_invariants(t: &Tournament) {
    validate_rounds(&t.pairings).unwrap();

    let recomputed = recompute_standings(&t.players, &t.pairings).unwrap();
    assert_eq!(recomputed, t.players);

    let decided = t.pairings.iter().filter(|p| p.is_decided()).count() as f64;
    let total: f64 = t.players.iter().map(|p| p.points).sum();
    assert_eq!(total, decided);

    let mut byes: HashMap<&str, usize> = HashMap::new();
    for p in t.pairings.iter().filter(|p| p.is_bye()) {
        *byes.entry(p.player1.as_str()).or_default() += 1;
    }
    assert!(byes.values().all(|&n| n == 1), "second bye awarded: {:?}", byes);
}

#[test]
fn test_five_player_four_round_tournament() {
    let mut director = five_player_director();

    for _ in 0..4 {
        play_round_white_wins(&mut director);
        assert_invariants(director.tournament());
    }

    let t = director.tournament();
    assert!(t.completed);

    assert_eq!(
        name_pairs(t, 1),
        pairs(&[("A", "B"), ("C", "D"), ("E", "(bye)")])
    );
    assert_eq!(
        name_pairs(t, 2),
        pairs(&[("A", "C"), ("E", "B"), ("D", "(bye)")])
    );
    // Only repeats are left for the bottom boards from here on.
    assert_eq!(
        name_pairs(t, 3),
        pairs(&[("A", "E"), ("C", "D"), ("B", "(bye)")])
    );
    assert_eq!(
        name_pairs(t, 4),
        pairs(&[("A", "D"), ("E", "B"), ("C", "(bye)")])
    );

    let standings = director.standings().unwrap();
    let table: Vec<(&str, f64, f64)> = standings
        .iter()
        .map(|s| (s.player.name.as_str(), s.player.points, s.tiebreak))
        .collect();
    assert_eq!(
        table,
        vec![
            ("A", 4.0, 8.0),
            ("C", 3.0, 6.0),
            ("E", 3.0, 6.0),
            ("B", 1.0, 10.0),
            ("D", 1.0, 10.0),
        ]
    );
}

#[test]
fn test_no_repeats_while_unplayed_opponents_exist() {
    let mut director = Director::create("Rapid", 3, &AppConfig::default()).unwrap();
    director
        .import_players("P1, 1500\nP2, 1400\nP3, 1300\nP4, 1200")
        .unwrap();
    director.start().unwrap();

    for _ in 0..3 {
        play_round_white_wins(&mut director);
    }

    let t = director.tournament();
    let mut seen = HashSet::new();
    for p in &t.pairings {
        let mut key = [p.player1.as_str(), p.player2.as_str()];
        key.sort();
        assert!(seen.insert(key), "repeat pairing {:?}", key);
    }
    assert_eq!(seen.len(), 6);
}

#[test]
fn test_tournament_survives_save_and_load() {
    let dir = TempDir::new().unwrap();
    let store = TournamentStore::new(StorageConfig::new(dir.path().to_path_buf()));
    let config = AppConfig::default();

    let mut director = five_player_director();
    play_round_white_wins(&mut director);
    director.generate_pairings().unwrap();
    store.save(director.tournament()).unwrap();

    let loaded = store.load(&director.tournament().id).unwrap();
    let mut resumed = Director::from_tournament(loaded, &config);
    assert_eq!(resumed.tournament().players, director.tournament().players);
    assert_eq!(resumed.tournament().pairings, director.tournament().pairings);
    assert_eq!(resumed.current_round_pairings().len(), 3);

    let games: Vec<_> = resumed
        .current_round_pairings()
        .into_iter()
        .filter(|p| !p.is_bye())
        .map(|p| p.id.clone())
        .collect();
    for id in games {
        resumed.record_result(&id, GameResult::Draw).unwrap();
    }
    resumed.advance_round().unwrap();
    assert_eq!(resumed.tournament().current_round, 3);
    assert_invariants(resumed.tournament());
}
