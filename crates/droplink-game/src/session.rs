//! The block-matching session controller.

use std::time::Duration;

use droplink_core::Position;
use droplink_generator::{BlockBoard, GameProfile, GeneratedContent, LevelConfig, LevelGenerator};
use droplink_lives::{Clock, LivesService, LivesSnapshot, LivesStore, UseOutcome};
use serde::{Deserialize, Serialize};

use crate::{GameError, ScoreEvent, ScoreSink, Selection, SessionOptions, TapOutcome};

/// Lifecycle state of a [`BlockSession`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    /// No level is loaded.
    #[display("idle")]
    Idle,
    /// A board is in play and nothing is selected.
    #[display("level loaded")]
    LevelLoaded,
    /// A board is in play and a chain is being selected.
    #[display("selecting")]
    Selecting,
    /// A chain was cleared and its cells await [`BlockSession::settle`].
    #[display("committed")]
    Committed,
    /// The board was cleared; the next level can be loaded.
    #[display("level complete")]
    LevelComplete,
    /// The session ran out of lives.
    #[display("game over")]
    GameOver,
}

const IN_PLAY: &[SessionState] = &[
    SessionState::LevelLoaded,
    SessionState::Selecting,
    SessionState::Committed,
];
const CAN_LOAD: &[SessionState] = &[SessionState::Idle, SessionState::LevelComplete];

/// Result of committing the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum CommitOutcome {
    /// The chain was cleared.
    Cleared {
        /// Number of cleared cells.
        cells: usize,
        /// Points gained, including the level bonus on a full clear.
        points: u64,
        /// Whether the board is now empty.
        level_complete: bool,
    },
    /// The chain is shorter than the minimum; nothing changed.
    TooShort {
        /// Length of the chain.
        len: usize,
        /// Minimum committable length.
        min_chain: usize,
    },
    /// Nothing is selected.
    Empty,
}

/// Result of failing a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum FailOutcome {
    /// A life was spent and the level restarts.
    Retry {
        /// Lives left after the failure.
        lives_left: u32,
    },
    /// No lives are left; the session is over.
    GameOver {
        /// Final score of the session.
        score: u64,
    },
}

#[derive(Debug, Clone)]
struct ActiveLevel {
    config: LevelConfig,
    initial: BlockBoard,
    board: BlockBoard,
    time_left: Option<Duration>,
}

impl ActiveLevel {
    fn new(config: LevelConfig, board: BlockBoard) -> Self {
        let time_left = config
            .time_limit
            .map(|secs| Duration::from_secs(u64::from(secs)));
        Self {
            config,
            initial: board.clone(),
            board,
            time_left,
        }
    }

    fn restart(&mut self) {
        *self = Self::new(self.config.clone(), self.initial.clone());
    }
}

/// Sequences block-matching levels for one account.
///
/// The session owns no generation or lives logic. It asks a [`LevelGenerator`]
/// for boards, spends lives through a [`LivesService`] when a level is failed,
/// and reports scores to a [`ScoreSink`].
///
/// ```text
/// Idle -> LevelLoaded <-> Selecting
/// Selecting -(commit)-> Committed | LevelComplete
/// Committed -(settle or tap)-> LevelLoaded | Selecting
/// LevelComplete -(load_level)-> LevelLoaded (next level)
/// in play -(fail)-> LevelLoaded (retry) | GameOver
/// ```
///
/// Abandoning a level returns to `Idle` without spending or refunding lives.
///
/// # Examples
///
/// ```
/// use droplink_core::{Position, PuzzleSeed};
/// use droplink_game::{BlockSession, ScoreEvent, SessionState};
/// use droplink_generator::LevelGenerator;
/// use droplink_lives::{LivesConfig, LivesService, MemoryLivesStore};
///
/// let generator = LevelGenerator::new(PuzzleSeed::from_bytes([1; 32]));
/// let lives = LivesService::new(MemoryLivesStore::new(), LivesConfig::default());
/// let mut session =
///     BlockSession::new("block-connect", "player", generator, lives, Vec::<ScoreEvent>::new())
///         .unwrap();
///
/// session.load_level().unwrap();
/// // Generated boards start every even row with a run of three equal blocks.
/// for col in 0..3 {
///     session.tap(Position::new(0, col)).unwrap();
/// }
/// assert_eq!(session.state(), SessionState::Selecting);
/// assert!(session.commit().unwrap().is_cleared());
/// assert_eq!(session.score(), 30);
/// ```
#[derive(Debug)]
pub struct BlockSession<S, C, K> {
    game_id: String,
    account: String,
    generator: LevelGenerator,
    lives: LivesService<S, C>,
    sink: K,
    options: SessionOptions,
    state: SessionState,
    level: u64,
    score: u64,
    active: Option<ActiveLevel>,
    selection: Selection,
}

impl<S, C, K> BlockSession<S, C, K>
where
    S: LivesStore,
    C: Clock,
    K: ScoreSink,
{
    /// Creates an idle session at level 0.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotBlockGame`] if `game_id` is not a block-matching game.
    pub fn new(
        game_id: &str,
        account: &str,
        generator: LevelGenerator,
        lives: LivesService<S, C>,
        sink: K,
    ) -> Result<Self, GameError> {
        if !GameProfile::resolve(game_id).family.is_block() {
            return Err(GameError::NotBlockGame {
                game_id: game_id.to_owned(),
            });
        }
        let options = SessionOptions::default();
        Ok(Self {
            game_id: game_id.to_owned(),
            account: account.to_owned(),
            generator: generator.min_chain(options.min_chain),
            lives,
            sink,
            options,
            state: SessionState::Idle,
            level: 0,
            score: 0,
            active: None,
            selection: Selection::default(),
        })
    }

    /// Replaces the session rules.
    #[must_use]
    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.generator = self.generator.min_chain(options.min_chain);
        self.options = options;
        self
    }

    /// Sets the level the next [`BlockSession::load_level`] loads.
    #[must_use]
    pub fn starting_at(mut self, level: u64) -> Self {
        self.level = level;
        self
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the current level number.
    ///
    /// After a level is completed this is already the next level.
    #[must_use]
    pub fn level(&self) -> u64 {
        self.level
    }

    /// Returns the accumulated score.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Returns the session rules.
    #[must_use]
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Returns the configuration of the loaded level.
    #[must_use]
    pub fn config(&self) -> Option<&LevelConfig> {
        self.active.as_ref().map(|active| &active.config)
    }

    /// Returns the board in play. Cleared cells may still show as
    /// [`BlockBoard::MARKED`] until [`BlockSession::settle`] is called.
    #[must_use]
    pub fn board(&self) -> Option<&BlockBoard> {
        self.active.as_ref().map(|active| &active.board)
    }

    /// Returns the current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Returns the remaining countdown of a timed level.
    #[must_use]
    pub fn time_left(&self) -> Option<Duration> {
        self.active.as_ref().and_then(|active| active.time_left)
    }

    /// Returns the score sink.
    #[must_use]
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Returns the account's lives, with regeneration caught up.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Lives`] if the lives service fails.
    pub fn lives(&self) -> Result<LivesSnapshot, GameError> {
        Ok(self.lives.status(&self.account)?)
    }

    /// Generates and loads the board of the current level.
    ///
    /// Loading does not spend a life, but the account must have one left.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] unless the session is idle or the
    /// previous level was completed, [`GameError::NoLivesLeft`] if the
    /// account has no lives, and [`GameError::Lives`] if the lives service
    /// fails.
    pub fn load_level(&mut self) -> Result<&LevelConfig, GameError> {
        self.require("load a level", CAN_LOAD)?;
        self.require_lives()?;
        let generated = self.generator.generate(&self.game_id, self.level);
        let GeneratedContent::Block(board) = generated.content else {
            return Err(GameError::NotBlockGame {
                game_id: self.game_id.clone(),
            });
        };
        Ok(self.start(generated.config, board))
    }

    /// Loads a prepared board, e.g. one restored from a saved session.
    ///
    /// The session continues at `config.level`.
    ///
    /// # Errors
    ///
    /// Same as [`BlockSession::load_level`].
    pub fn load_board(
        &mut self,
        config: LevelConfig,
        board: BlockBoard,
    ) -> Result<&LevelConfig, GameError> {
        self.require("load a board", CAN_LOAD)?;
        self.require_lives()?;
        self.level = config.level;
        Ok(self.start(config, board))
    }

    fn start(&mut self, config: LevelConfig, board: BlockBoard) -> &LevelConfig {
        log::info!(
            "loaded level {} of {:?} ({}x{} board)",
            config.level,
            self.game_id,
            board.size(),
            board.size()
        );
        self.selection.clear();
        self.state = SessionState::LevelLoaded;
        &self.active.insert(ActiveLevel::new(config, board)).config
    }

    /// Taps the cell at `pos`, extending or restarting the selection.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] if no level is in play and
    /// [`GameError::OutOfBounds`] if `pos` is outside the board.
    pub fn tap(&mut self, pos: Position) -> Result<TapOutcome, GameError> {
        self.require("tap", IN_PLAY)?;
        let state = self.state;
        let Some(active) = self.active.as_mut() else {
            return Err(GameError::InvalidState {
                action: "tap",
                state,
            });
        };
        if !active.board.cells().contains(pos) {
            return Err(GameError::OutOfBounds { pos });
        }
        active.board.sweep_marked();
        let outcome = self.selection.tap(&active.board, pos);
        self.state = if self.selection.is_empty() {
            SessionState::LevelLoaded
        } else {
            SessionState::Selecting
        };
        Ok(outcome)
    }

    /// Commits the current selection.
    ///
    /// A chain of at least [`SessionOptions::min_chain`] blocks is tagged for
    /// clearing and scored. If no blocks remain, the level bonus is added and
    /// the session moves to [`SessionState::LevelComplete`] with the level
    /// counter already advanced.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] if no level is in play.
    pub fn commit(&mut self) -> Result<CommitOutcome, GameError> {
        self.require("commit a selection", IN_PLAY)?;
        if self.selection.is_empty() {
            return Ok(CommitOutcome::Empty);
        }
        let len = self.selection.len();
        let min_chain = self.options.min_chain;
        if len < min_chain {
            log::debug!("rejected chain of {len}, need {min_chain}");
            return Ok(CommitOutcome::TooShort { len, min_chain });
        }

        let cells = self.selection.take();
        let active = self.active_mut("commit a selection")?;
        active.board.sweep_marked();
        for &pos in &cells {
            active.board.mark(pos);
        }
        let level_complete = active.board.is_cleared();

        let mut points = self.options.clear_points(cells.len());
        if level_complete {
            points = points.saturating_add(self.options.level_bonus(self.level));
        }
        self.score = self.score.saturating_add(points);
        if level_complete {
            log::info!("level {} complete, score {}", self.level, self.score);
            self.level = self.level.saturating_add(1);
            self.state = SessionState::LevelComplete;
        } else {
            self.state = SessionState::Committed;
        }

        self.sink.record(ScoreEvent::Cleared {
            score_delta: points,
            level_complete,
        });
        Ok(CommitOutcome::Cleared {
            cells: cells.len(),
            points,
            level_complete,
        })
    }

    /// Removes cells tagged by the last commit from the board.
    ///
    /// Call once the clearing animation has finished. Tapping again settles
    /// implicitly. Returns the number of removed cells.
    pub fn settle(&mut self) -> usize {
        if self.state.is_committed() {
            self.state = SessionState::LevelLoaded;
        }
        self.active
            .as_mut()
            .map_or(0, |active| active.board.sweep_marked())
    }

    /// Returns `true` if blocks remain but no committable chain exists.
    #[must_use]
    pub fn is_stuck(&self) -> bool {
        self.active.as_ref().is_some_and(|active| {
            !active.board.is_cleared() && !active.board.has_available_move(self.options.min_chain)
        })
    }

    /// Advances the countdown of a timed level by `elapsed`.
    ///
    /// Fails the level once the countdown reaches zero. Untimed levels ignore
    /// ticks.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] if no level is in play, and
    /// [`GameError::Lives`] if the failure could not be recorded.
    pub fn tick(&mut self, elapsed: Duration) -> Result<Option<FailOutcome>, GameError> {
        self.require("advance the countdown", IN_PLAY)?;
        let active = self.active_mut("advance the countdown")?;
        let Some(time_left) = active.time_left.as_mut() else {
            return Ok(None);
        };
        *time_left = time_left.saturating_sub(elapsed);
        if !time_left.is_zero() {
            return Ok(None);
        }
        log::info!("time is up on level {}", self.level);
        self.fail_level().map(Some)
    }

    /// Fails the level in play, spending one life.
    ///
    /// With lives left the level restarts from its initial board. Spending the
    /// last life, or having none to spend, ends the session and reports the
    /// final score.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] if no level is in play, and
    /// [`GameError::Lives`] if the lives service fails. On error the session
    /// is unchanged.
    pub fn fail_level(&mut self) -> Result<FailOutcome, GameError> {
        self.require("fail a level", IN_PLAY)?;
        let update = self.lives.use_lives(&self.account, 1)?;
        match update.outcome {
            UseOutcome::Used { remaining } if remaining > 0 => {
                log::info!("retrying level {}, {remaining} lives left", self.level);
                self.selection.clear();
                if let Some(active) = self.active.as_mut() {
                    active.restart();
                }
                self.state = SessionState::LevelLoaded;
                Ok(FailOutcome::Retry {
                    lives_left: remaining,
                })
            }
            UseOutcome::Used { .. } | UseOutcome::Declined { .. } => Ok(self.game_over()),
        }
    }

    fn game_over(&mut self) -> FailOutcome {
        log::info!(
            "game over on level {} with score {}",
            self.level,
            self.score
        );
        self.state = SessionState::GameOver;
        self.active = None;
        self.selection.clear();
        self.sink.record(ScoreEvent::GameOver {
            score: self.score,
            level: self.level,
        });
        FailOutcome::GameOver { score: self.score }
    }

    /// Leaves the current level without spending or refunding lives.
    ///
    /// The session becomes idle and keeps its level and score. Has no effect
    /// once the game is over.
    pub fn abandon(&mut self) {
        if self.state.is_game_over() {
            return;
        }
        log::debug!("abandoned level {} in state {}", self.level, self.state);
        self.state = SessionState::Idle;
        self.active = None;
        self.selection.clear();
    }

    /// Starts over at level 0 with no score.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.level = 0;
        self.score = 0;
        self.active = None;
        self.selection.clear();
    }

    fn require(&self, action: &'static str, allowed: &[SessionState]) -> Result<(), GameError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(GameError::InvalidState {
                action,
                state: self.state,
            })
        }
    }

    fn require_lives(&self) -> Result<(), GameError> {
        let snapshot = self.lives.status(&self.account)?;
        if snapshot.count == 0 {
            log::warn!("{:?} has no lives left to start a level", self.account);
            return Err(GameError::NoLivesLeft { snapshot });
        }
        Ok(())
    }

    fn active_mut(&mut self, action: &'static str) -> Result<&mut ActiveLevel, GameError> {
        let state = self.state;
        self.active
            .as_mut()
            .ok_or(GameError::InvalidState { action, state })
    }
}
