//! Plain-text rendering of generated content.

use droplink_generator::{BlockBoard, CrosswordData, GeneratedContent, GeneratedLevel, LevelConfig};
use droplink_sudoku::SudokuGrid;

/// Renders a block board, one row per line. Empty cells show as `.`.
#[must_use]
pub fn render_block_board(board: &BlockBoard) -> String {
    board
        .cells()
        .iter_rows()
        .map(|row| {
            row.iter()
                .map(|&cell| match cell {
                    BlockBoard::EMPTY => ".".to_owned(),
                    BlockBoard::MARKED => "*".to_owned(),
                    color => color.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a crossword grid followed by its numbered clues. Blocked cells
/// show as `#`.
#[must_use]
pub fn render_crossword(crossword: &CrosswordData) -> String {
    let mut lines: Vec<String> = crossword
        .grid
        .iter_rows()
        .map(|row| row.iter().map(|cell| cell.unwrap_or('#')).collect())
        .collect();
    lines.push(String::new());
    lines.extend(crossword.entries().into_iter().map(|entry| {
        format!(
            "{:>2}. {} {} at {}: {}",
            entry.number, entry.direction, entry.answer, entry.start, entry.clue
        )
    }));
    lines.join("\n")
}

/// Renders a Sudoku grid, one row per line. Empty cells show as `.`.
#[must_use]
pub fn render_sudoku_grid(grid: &SudokuGrid) -> String {
    grid.as_grid()
        .iter_rows()
        .map(|row| {
            row.iter()
                .map(|&value| match value {
                    0 => '.',
                    value => char::from_digit(u32::from(value), 36)
                        .map_or('?', |ch| ch.to_ascii_uppercase()),
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the settings of a level configuration.
#[must_use]
pub fn render_config(config: &LevelConfig) -> String {
    let mut lines = vec![
        format!("game: {} ({})", config.game_id, config.family),
        format!("level: {}", config.level),
        format!("difficulty: {}", config.difficulty),
        format!("complexity: {}", config.complexity),
        format!("grid size: {}", config.grid_size),
    ];
    if let Some(limit) = config.time_limit {
        lines.push(format!("time limit: {limit}s"));
    }
    lines.join("\n")
}

/// Renders a generated level: seed, configuration and content.
#[must_use]
pub fn render_level(level: &GeneratedLevel) -> String {
    let content = match &level.content {
        GeneratedContent::Block(board) => {
            format!("board ({} colors):\n{}", board.colors(), render_block_board(board))
        }
        GeneratedContent::Crossword(crossword) => {
            format!("crossword:\n{}", render_crossword(crossword))
        }
        GeneratedContent::Sudoku(puzzle) => format!(
            "puzzle ({} holes):\n{}\n\nsolution:\n{}",
            puzzle.removed_count(),
            render_sudoku_grid(&puzzle.puzzle),
            render_sudoku_grid(&puzzle.solution)
        ),
    };
    format!(
        "seed: {}\n{}\n\n{content}",
        level.seed,
        render_config(&level.config)
    )
}
