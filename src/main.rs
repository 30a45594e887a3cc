//! Headless stronghold runner.
//!
//! # Usage
//!
//! ```bash
//! # Play a 50-turn game on hard with the rival AI running the player's kingdom
//! cargo run -- run --seed 7 --turns 50 --difficulty hard --autopilot
//!
//! # Save at the end and keep the chronicle
//! cargo run -- run --save saves/game.json --chronicle saves/chronicle.jsonl
//!
//! # Pick up where a save left off
//! cargo run -- resume saves/game.json
//!
//! # Ask the royal advisor
//! cargo run -- advise "How is the treasury?"
//! ```
//!
//! Turn summaries go to stdout, logs to stderr (`RUST_LOG` overrides the
//! default `info` filter).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stronghold::{Difficulty, GameConfig, GameSession, Result};

#[derive(Parser)]
#[command(name = "stronghold")]
#[command(about = "Turn-based medieval kingdom simulation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a new game headless
    Run {
        /// JSON config file; flags below override its fields
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Turn limit
        #[arg(short, long)]
        turns: Option<u32>,

        /// easy, normal, hard or hardcore
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Let the rival AI govern the player's kingdom
        #[arg(long)]
        autopilot: bool,

        /// Write a save file when the run ends
        #[arg(long)]
        save: Option<PathBuf>,

        /// Write the chronicle as JSONL when the run ends
        #[arg(long)]
        chronicle: Option<PathBuf>,
    },

    /// Continue a saved game
    Resume {
        /// Save file written by `run --save`
        save: PathBuf,

        /// Play at most this many more turns
        #[arg(short, long)]
        turns: Option<u32>,

        /// Write the chronicle as JSONL when the run ends
        #[arg(long)]
        chronicle: Option<PathBuf>,
    },

    /// Ask the royal advisor a question
    Advise {
        question: String,

        /// RNG seed for the advisor's stock replies
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Commands::Run {
            config,
            seed,
            turns,
            difficulty,
            autopilot,
            save,
            chronicle,
        } => cmd_run(config, seed, turns, difficulty, autopilot, save, chronicle),
        Commands::Resume {
            save,
            turns,
            chronicle,
        } => cmd_resume(&save, turns, chronicle),
        Commands::Advise { question, seed } => cmd_advise(&question, seed),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_run(
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    turns: Option<u32>,
    difficulty: Option<Difficulty>,
    autopilot: bool,
    save: Option<PathBuf>,
    chronicle: Option<PathBuf>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => GameConfig::from_file(&path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if let Some(turns) = turns {
        config.max_turns = turns;
    }
    if let Some(difficulty) = difficulty {
        config.difficulty = difficulty;
    }
    config.autopilot |= autopilot;

    let mut game = GameSession::new(config)?;
    println!("{}", game.summary()?);
    play_out(&mut game, None)?;

    if let Some(path) = save {
        game.save(&path)?;
        println!("Saved to {}", path.display());
    }
    finish(&game, chronicle.as_deref())
}

fn cmd_resume(save: &Path, turns: Option<u32>, chronicle: Option<PathBuf>) -> Result<()> {
    let mut game = GameSession::load(save)?;
    println!("{}", game.summary()?);
    play_out(&mut game, turns)?;
    finish(&game, chronicle.as_deref())
}

fn cmd_advise(question: &str, seed: u64) -> Result<()> {
    let game = GameSession::new(GameConfig {
        seed,
        ..GameConfig::default()
    })?;
    println!("{}", game.advise(question));
    Ok(())
}

/// Play until the game ends or `limit` turns have passed, printing each turn.
fn play_out(game: &mut GameSession, limit: Option<u32>) -> Result<()> {
    let mut played = 0;
    while !game.is_over() && limit.is_none_or(|limit| played < limit) {
        for result in game.play_turn()? {
            println!("  {}: {:?}", result.action, result.outcome);
        }
        played += 1;
        match game.summary() {
            Ok(summary) => println!("{summary}"),
            Err(_) => println!("Turn {:>3} | the kingdom has fallen", game.state().turn),
        }
    }
    Ok(())
}

fn finish(game: &GameSession, chronicle: Option<&Path>) -> Result<()> {
    let state = game.state();
    match state.final_score {
        Some(score) => println!("Game over ({:?}) after {} turns. Final score: {score}", state.status, state.turn),
        None => println!("Stopped at turn {}; the game goes on.", state.turn),
    }
    if let Some(path) = chronicle {
        game.flush_chronicle(path)?;
        println!("Chronicle written to {}", path.display());
    }
    Ok(())
}
