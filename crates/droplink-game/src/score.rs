//! Score reporting to the leaderboard collaborator.

use serde::{Deserialize, Serialize};

/// A scoring event produced by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ScoreEvent {
    /// A chain was cleared.
    Cleared {
        /// Points gained, including the level bonus on a full clear.
        score_delta: u64,
        /// Whether the clear emptied the board.
        level_complete: bool,
    },
    /// The session ran out of lives.
    GameOver {
        /// Accumulated score of the session.
        score: u64,
        /// Level the session ended on.
        level: u64,
    },
}

/// Receives scoring events, e.g. a rewards or leaderboard service.
pub trait ScoreSink {
    /// Handles one event.
    fn record(&mut self, event: ScoreEvent);
}

impl ScoreSink for Vec<ScoreEvent> {
    fn record(&mut self, event: ScoreEvent) {
        self.push(event);
    }
}

impl<K> ScoreSink for &mut K
where
    K: ScoreSink + ?Sized,
{
    fn record(&mut self, event: ScoreEvent) {
        (**self).record(event);
    }
}

/// A sink that only logs events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ScoreSink for LogSink {
    fn record(&mut self, event: ScoreEvent) {
        log::info!("score event: {event:?}");
    }
}
