//! Errors of the session controller.

use droplink_core::Position;
use droplink_lives::{LivesError, LivesSnapshot};

use crate::SessionState;

/// Errors returned by [`BlockSession`](crate::BlockSession) operations.
///
/// Declined moves (a chain that is too short, an empty selection) are not
/// errors; they are reported through [`CommitOutcome`](crate::CommitOutcome).
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum GameError {
    /// The lives service failed; the session state was left unchanged.
    #[display("lives service failed: {_0}")]
    Lives(LivesError),
    /// A level cannot start because the account has no lives left.
    #[display("no lives left")]
    #[from(ignore)]
    NoLivesLeft {
        /// The account's lives, including when the next one arrives.
        snapshot: LivesSnapshot,
    },
    /// The operation is not allowed in the current session state.
    #[display("cannot {action} while {state}")]
    #[from(ignore)]
    InvalidState {
        /// The attempted operation.
        action: &'static str,
        /// The state the session was in.
        state: SessionState,
    },
    /// A tap landed outside the board.
    #[display("position {pos} is outside the board")]
    #[from(ignore)]
    OutOfBounds {
        /// The tapped position.
        pos: Position,
    },
    /// The game does not produce block boards.
    #[display("game {game_id:?} does not use block boards")]
    #[from(ignore)]
    NotBlockGame {
        /// The rejected game id.
        game_id: String,
    },
}
