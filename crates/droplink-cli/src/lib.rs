//! Command-line front end for the Droplink engine.
//!
//! The `droplink` binary inspects level configurations, prints generated
//! boards and drives a lives state file. This library holds the pieces the
//! binary is built from: a JSON-file [`LivesStore`](droplink_lives::LivesStore)
//! and plain-text renderers for generated content.

pub use self::{file_store::*, render::*};

mod file_store;
mod render;
