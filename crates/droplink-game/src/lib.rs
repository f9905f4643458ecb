//! Block-matching game sessions.
//!
//! A [`BlockSession`] drives one account through consecutive block-matching
//! levels. Boards come from [`droplink_generator::LevelGenerator`], failed
//! levels spend lives through [`droplink_lives::LivesService`], and scores are
//! reported to a [`ScoreSink`].
//!
//! Players build a [`Selection`] by tapping same-colored blocks, each
//! 8-directionally adjacent to the previous one, and commit it once it reaches
//! [`SessionOptions::min_chain`] blocks.

pub use self::{error::*, options::*, score::*, selection::*, session::*};

mod error;
mod options;
mod score;
mod selection;
mod session;
