//! Droplink command-line tool.
//!
//! # Usage
//!
//! ```sh
//! droplink config block-connect 250
//! droplink board crossword 40 --seed 1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef
//! droplink lives --state lives.json use 1
//! droplink lives --state lives.json reward ad-watch 1 impression-42
//! ```
//!
//! Set `RUST_LOG=debug` to see generation and lives details.

use std::{error::Error, path::PathBuf, process::ExitCode};

use chrono::Utc;
use clap::{Parser, Subcommand};
use droplink_cli::{JsonFileStore, render_config, render_level};
use droplink_core::PuzzleSeed;
use droplink_generator::{LevelGenerator, generate_level_config};
use droplink_lives::{
    LivesConfig, LivesService, LivesSnapshot, RewardEvent, RewardKind, RewardOutcome, UseOutcome,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the configuration of a level.
    Config {
        /// Game id, e.g. block-connect, color-match, crossword or sudoku.
        game: String,
        /// Level number.
        level: u64,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Generate and print the content of a level.
    Board {
        /// Game id, e.g. block-connect, color-match, crossword or sudoku.
        game: String,
        /// Level number.
        level: u64,
        /// Base seed as 64 hex digits. Random when omitted.
        #[arg(long, value_name = "HEX")]
        seed: Option<PuzzleSeed>,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Inspect or change the lives kept in a state file.
    Lives {
        /// JSON file holding the lives of every account.
        #[arg(long, value_name = "FILE")]
        state: PathBuf,
        /// Account to operate on.
        #[arg(long, default_value = "player")]
        account: String,
        /// Maximum number of lives.
        #[arg(long, default_value_t = LivesConfig::default().max_lives)]
        max_lives: u32,
        /// Seconds it takes to regenerate one life.
        #[arg(long, default_value_t = LivesConfig::default().regen_period_secs)]
        regen_secs: u32,
        #[command(subcommand)]
        action: LivesAction,
    },
}

#[derive(Debug, Subcommand)]
enum LivesAction {
    /// Show the current count and regeneration timer.
    Status,
    /// Spend lives.
    Use {
        /// Number of lives to spend.
        #[arg(default_value_t = 1)]
        n: u32,
    },
    /// Credit a confirmed reward.
    Reward {
        /// Reward source: ad-watch or payment.
        kind: RewardKind,
        /// Number of lives to add.
        amount: u32,
        /// Unique id of the reward event.
        key: String,
    },
}

fn main() -> ExitCode {
    better_panic::install();
    env_logger::init();

    let args = Args::parse();
    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Config { game, level, json } => {
            let config = generate_level_config(&game, level);
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("{}", render_config(&config));
            }
        }
        Command::Board {
            game,
            level,
            seed,
            json,
        } => {
            let generator = LevelGenerator::new(seed.unwrap_or_else(PuzzleSeed::random));
            let level = generator.generate(&game, level);
            if json {
                println!("{}", serde_json::to_string_pretty(&level)?);
            } else {
                println!("{}", render_level(&level));
            }
        }
        Command::Lives {
            state,
            account,
            max_lives,
            regen_secs,
            action,
        } => {
            let config = LivesConfig::default()
                .max_lives(max_lives)
                .regen_period_secs(regen_secs);
            let service = LivesService::new(JsonFileStore::new(state), config);
            run_lives(&service, &account, action)?;
        }
    }
    Ok(())
}

fn run_lives(
    service: &LivesService<JsonFileStore>,
    account: &str,
    action: LivesAction,
) -> Result<(), Box<dyn Error>> {
    let snapshot = match action {
        LivesAction::Status => service.status(account)?,
        LivesAction::Use { n } => {
            let update = service.use_lives(account, n)?;
            match update.outcome {
                UseOutcome::Used { remaining } => {
                    println!("Used {n} lives, {remaining} left.");
                }
                UseOutcome::Declined {
                    available,
                    requested,
                } => {
                    println!("Not enough lives: {requested} requested, {available} available.");
                }
            }
            update.snapshot
        }
        LivesAction::Reward { kind, amount, key } => {
            let event = RewardEvent::new(kind, amount, key);
            let update = service.reward(account, &event)?;
            match update.outcome {
                RewardOutcome::Credited { added } => {
                    println!("Credited {added} lives from {kind} reward {:?}.", event.key);
                }
                RewardOutcome::Duplicate => {
                    println!("Reward {:?} was already credited.", event.key);
                }
            }
            update.snapshot
        }
    };
    print_snapshot(account, &snapshot);
    Ok(())
}

fn print_snapshot(account: &str, snapshot: &LivesSnapshot) {
    println!("{account}: {}/{} lives", snapshot.count, snapshot.max);
    if let (Some(at), Some(wait)) = (
        snapshot.next_regen_at,
        snapshot.time_until_next(Utc::now()),
    ) {
        let secs = wait.num_seconds();
        println!(
            "next life in {}m {:02}s (at {})",
            secs / 60,
            secs % 60,
            at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
}
