use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swiss_manager::config::AppConfig;
use swiss_manager::storage::{StorageConfig, TournamentStore};
use swiss_manager::{Director, GameResult, PairingId, Pairing, PlayerId, Standing, Tournament};

#[derive(Parser)]
#[command(name = "swiss-manager")]
#[command(about = "Swiss-system chess tournament manager")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error; overrides config)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Tournament id (default: the active tournament)
    #[arg(long, short)]
    tournament: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a tournament and make it active
    Create {
        /// Tournament name
        name: String,

        /// Number of rounds (default from config)
        #[arg(long)]
        rounds: Option<u32>,
    },

    /// List stored tournaments
    List,

    /// Add a player before the tournament starts
    AddPlayer {
        /// Player name
        name: String,

        /// Rating (blank or omitted = unrated)
        #[arg(long, default_value = "")]
        rating: String,
    },

    /// Import players from a file of "Name, Rating" lines ("-" for stdin)
    Import { path: PathBuf },

    /// Remove a player before the tournament starts
    RemovePlayer { id: String },

    /// Start round 1
    Start,

    /// Generate (or regenerate) pairings for the current round
    Pair,

    /// Record a result: 1-0, 0-1, 1/2-1/2 (or white, black, draw)
    Record {
        /// Board number in the current round, or pairing id
        pairing: String,

        result: GameResult,
    },

    /// Advance to the next round (or finish after the last)
    NextRound,

    /// Show ranked standings
    Standings {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show tournament status and current pairings
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Starting swiss-manager v{}", env!("CARGO_PKG_VERSION"));

    let store = TournamentStore::new(StorageConfig::new(config.data_dir.clone()));

    match cli.command {
        Commands::Create { name, rounds } => {
            let rounds = rounds.unwrap_or(config.tournament.default_rounds);
            let director = Director::create(&name, rounds, &config)?;
            let tournament = director.tournament();
            store.save(tournament)?;
            store.set_active(&tournament.id)?;
            println!("Created \"{}\" ({} rounds)", tournament.name, tournament.rounds);
            println!("Id: {}", tournament.id);
        }
        Commands::List => {
            let active = store.active().ok();
            for meta in store.list()? {
                let marker = if active.as_ref() == Some(&meta.id) { "*" } else { " " };
                let status = if meta.completed {
                    "complete".to_string()
                } else if meta.started {
                    format!("round {}/{}", meta.current_round, meta.rounds)
                } else {
                    "not started".to_string()
                };
                println!("{} {}  {:<30} {}", marker, meta.id, meta.name, status);
            }
        }
        Commands::AddPlayer { name, rating } => {
            let rating = parse_rating(&rating)?;
            let mut director = load(&store, &config, cli.tournament.as_deref())?;
            let id = director.add_player(&name, rating)?;
            store.save(director.tournament())?;
            println!("Added {} ({})", name.trim(), id);
        }
        Commands::Import { path } => {
            let text = if path.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read players from stdin")?;
                buf
            } else {
                std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?
            };
            let mut director = load(&store, &config, cli.tournament.as_deref())?;
            let added = director.import_players(&text)?;
            store.save(director.tournament())?;
            println!("Imported {} players", added.len());
        }
        Commands::RemovePlayer { id } => {
            let mut director = load(&store, &config, cli.tournament.as_deref())?;
            let removed = director.remove_player(&PlayerId::from(id))?;
            store.save(director.tournament())?;
            println!("Removed {}", removed.name);
        }
        Commands::Start => {
            let mut director = load(&store, &config, cli.tournament.as_deref())?;
            director.start()?;
            store.save(director.tournament())?;
            println!(
                "Started with {} players",
                director.tournament().players.len()
            );
        }
        Commands::Pair => {
            let mut director = load(&store, &config, cli.tournament.as_deref())?;
            let pairings = director.generate_pairings()?;
            store.save(director.tournament())?;
            let refs: Vec<&Pairing> = pairings.iter().collect();
            print_pairings(director.tournament(), &refs);
        }
        Commands::Record { pairing, result } => {
            let mut director = load(&store, &config, cli.tournament.as_deref())?;
            let pairing_id = resolve_pairing(&director, &pairing)?;
            director.record_result(&pairing_id, result)?;
            store.save(director.tournament())?;
            println!("Recorded {} for {}", result, pairing_id);
            if director.tournament().is_current_round_complete() {
                println!("Round complete; run `next-round` to continue");
            }
        }
        Commands::NextRound => {
            let mut director = load(&store, &config, cli.tournament.as_deref())?;
            director.advance_round()?;
            store.save(director.tournament())?;
            let t = director.tournament();
            if t.completed {
                println!("Tournament complete");
                print_standings(&director.standings()?);
            } else {
                println!("Round {} of {}", t.current_round, t.rounds);
            }
        }
        Commands::Standings { json } => {
            let director = load(&store, &config, cli.tournament.as_deref())?;
            let standings = director.standings()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&standings)?);
            } else {
                print_standings(&standings);
            }
        }
        Commands::Show => {
            let director = load(&store, &config, cli.tournament.as_deref())?;
            let t = director.tournament();
            println!("{} ({})", t.name, t.id);
            println!("Players: {}", t.players.len());
            if t.completed {
                println!("Status:  complete");
            } else if t.started {
                println!("Status:  round {} of {}", t.current_round, t.rounds);
                let pairings = director.current_round_pairings();
                if pairings.is_empty() {
                    println!("No pairings for this round yet; run `pair`");
                } else {
                    print_pairings(t, &pairings);
                }
            } else {
                println!("Status:  not started");
                for p in &t.players {
                    let rating = if p.is_unrated() {
                        "unrated".to_string()
                    } else {
                        p.rating.to_string()
                    };
                    println!("  {:<24} {:>7}  {}", p.name, rating, p.id);
                }
            }
        }
    }

    Ok(())
}

fn load(store: &TournamentStore, config: &AppConfig, id: Option<&str>) -> Result<Director> {
    let id = store.resolve(id)?;
    let tournament = store
        .load(&id)
        .with_context(|| format!("Failed to load tournament {}", id))?;
    Ok(Director::from_tournament(tournament, config))
}

fn parse_rating(raw: &str) -> Result<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<u32>()
        .with_context(|| format!("Rating must be a non-negative integer, got {:?}", raw))
}

/// Board numbers are 1-based positions in the current round's pairing list.
fn resolve_pairing(director: &Director, raw: &str) -> Result<PairingId> {
    let pairings = director.current_round_pairings();
    if let Ok(board) = raw.parse::<usize>() {
        if board >= 1 && board <= pairings.len() {
            return Ok(pairings[board - 1].id.clone());
        }
        bail!("No board {} in the current round", board);
    }
    Ok(PairingId::from(raw))
}

fn print_pairings(tournament: &Tournament, pairings: &[&Pairing]) {
    println!("Round {}", tournament.current_round);
    println!("  # | {:<24} | {:<24} | Result", "White", "Black");
    println!("----|-{}-|-{}-|-------", "-".repeat(24), "-".repeat(24));
    for (i, p) in pairings.iter().enumerate() {
        println!(
            "{:>3} | {:<24} | {:<24} | {}",
            i + 1,
            tournament.player_name(&p.player1),
            tournament.player_name(&p.player2),
            p.result,
        );
    }
}

fn print_standings(standings: &[Standing]) {
    let name_width = standings
        .iter()
        .map(|s| s.player.name.len())
        .max()
        .unwrap_or(6)
        .max(6);

    println!(
        "Rank | {:<name_width$} | Rating | Points | Buchholz",
        "Player"
    );
    println!("-----|-{}-|--------|--------|---------", "-".repeat(name_width));
    for s in standings {
        println!(
            "{:>4} | {:<name_width$} | {:>6} | {:>6.1} | {:>8.1}",
            s.rank, s.player.name, s.player.rating, s.player.points, s.tiebreak,
        );
    }
}
