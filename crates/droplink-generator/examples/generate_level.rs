//! Example generating levels and summarizing the generated content.
//!
//! This example shows how to:
//! - Create a `LevelGenerator` from a random or fixed base seed
//! - Generate and print a single level
//! - Sample a range of levels in parallel and report content statistics
//!
//! # Usage
//!
//! Print one level:
//!
//! ```sh
//! cargo run --example generate_level -- --game block-connect --level 250
//! ```
//!
//! Reproduce a level from a base seed:
//!
//! ```sh
//! cargo run --example generate_level -- --game crossword --level 40 \
//!     --seed 1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef
//! ```
//!
//! Summarize 1000 levels starting at level 0:
//!
//! ```sh
//! cargo run --example generate_level -- --game sudoku --count 1000
//! ```

use std::process;

use clap::Parser;
use droplink_core::PuzzleSeed;
use droplink_generator::{GeneratedContent, GeneratedLevel, LevelGenerator};
use rayon::prelude::*;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Game id to generate levels for.
    #[arg(short, long, default_value = "block-connect")]
    game: String,

    /// First level to generate.
    #[arg(short, long, default_value_t = 0)]
    level: u64,

    /// Number of consecutive levels to sample. Prints the level itself when 1.
    #[arg(short, long, default_value_t = 1)]
    count: u64,

    /// Base seed as 64 hex digits. Random when omitted.
    #[arg(long, value_name = "HEX")]
    seed: Option<PuzzleSeed>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Summary {
    levels: usize,
    cells: usize,
    content: usize,
    playable: usize,
}

impl Summary {
    fn of(level: &GeneratedLevel) -> Self {
        let (cells, content, playable) = match &level.content {
            GeneratedContent::Block(board) => (
                board.cells().len(),
                board.remaining_blocks(),
                board.has_available_move(LevelGenerator::DEFAULT_MIN_CHAIN),
            ),
            GeneratedContent::Crossword(crossword) => (
                crossword.grid.len(),
                crossword.grid.values().filter(|cell| cell.is_some()).count(),
                crossword.word_count() > 0,
            ),
            GeneratedContent::Sudoku(puzzle) => (
                puzzle.puzzle.as_grid().len(),
                puzzle.removed_count(),
                puzzle.removed_count() > 0,
            ),
        };
        Self {
            levels: 1,
            cells,
            content,
            playable: usize::from(playable),
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            levels: self.levels + other.levels,
            cells: self.cells + other.cells,
            content: self.content + other.content,
            playable: self.playable + other.playable,
        }
    }
}

fn main() {
    let args = Args::parse();
    if args.count == 0 {
        eprintln!("--count must be at least 1.");
        process::exit(1);
    }

    let base_seed = args.seed.unwrap_or_else(PuzzleSeed::random);
    let generator = LevelGenerator::new(base_seed);

    if args.count == 1 {
        print_level(&generator.generate(&args.game, args.level));
        return;
    }

    let end = args.level.saturating_add(args.count);
    let summary = (args.level..end)
        .into_par_iter()
        .map(|level| Summary::of(&generator.generate(&args.game, level)))
        .reduce(Summary::default, Summary::merge);

    println!("Base seed:");
    println!("  {base_seed}");
    println!();
    println!("Levels {}..{end} of {:?}:", args.level, args.game);
    println!("  generated: {}", summary.levels);
    println!("  cells: {}", summary.cells);
    println!(
        "  content cells: {} ({:.1}%)",
        summary.content,
        percent(summary.content, summary.cells)
    );
    println!(
        "  playable: {} ({:.1}%)",
        summary.playable,
        percent(summary.playable, summary.levels)
    );
}

#[expect(clippy::cast_precision_loss)]
fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

fn print_level(level: &GeneratedLevel) {
    let config = &level.config;
    println!("Seed:");
    println!("  {}", level.seed);
    println!();
    println!("Config:");
    println!("  game: {}", config.game_id);
    println!("  level: {}", config.level);
    println!("  difficulty: {}", config.difficulty);
    println!("  complexity: {}", config.complexity);
    println!("  grid size: {}", config.grid_size);
    if let Some(limit) = config.time_limit {
        println!("  time limit: {limit}s");
    }
    println!();

    match &level.content {
        GeneratedContent::Block(board) => {
            println!("Board ({} colors):", board.colors());
            for row in board.cells().iter_rows() {
                let line: Vec<String> = row.iter().map(ToString::to_string).collect();
                println!("  {}", line.join(" "));
            }
        }
        GeneratedContent::Crossword(crossword) => {
            println!("Grid:");
            for row in crossword.grid.iter_rows() {
                let line: String = row.iter().map(|cell| cell.unwrap_or('#')).collect();
                println!("  {line}");
            }
            println!();
            println!("Clues:");
            for entry in crossword.entries() {
                println!(
                    "  {} {} at {}: {}",
                    entry.number, entry.direction, entry.start, entry.clue
                );
            }
        }
        GeneratedContent::Sudoku(puzzle) => {
            println!("Problem:");
            println!("  {}", puzzle.puzzle);
            println!();
            println!("Solution:");
            println!("  {}", puzzle.solution);
        }
    }
}
