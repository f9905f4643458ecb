//! Time-regenerating lives for Droplink accounts.
//!
//! An account holds between zero and [`LivesConfig::max_lives`] lives. Spending
//! lives starts a regeneration timer; every full
//! [`regeneration period`](LivesConfig::regen_period) adds one life back until
//! the maximum is reached. Rewards (watched ads, payments) add lives
//! immediately and are credited at most once per idempotency key.
//!
//! # Overview
//!
//! - [`LivesState`]: The per-account state machine (`use`, `regenerate`, `reward`, catch-up).
//! - [`LivesStore`]: Durable storage with compare-and-swap writes.
//! - [`LivesService`]: Atomic operations combining the two, retried on conflicts.
//! - [`Clock`]: The wall-clock time source.
//!
//! Running out of lives is an ordinary outcome ([`UseOutcome::Declined`]), not
//! an error. Errors ([`LivesError`]) only report store failures and writes that
//! kept losing races against other sessions.
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeDelta, Utc};
//! use droplink_lives::{
//!     LivesConfig, LivesService, ManualClock, MemoryLivesStore, RewardEvent, RewardKind,
//! };
//!
//! let clock = ManualClock::new(Utc::now());
//! let service = LivesService::with_clock(MemoryLivesStore::new(), LivesConfig::default(), clock);
//!
//! service.use_lives("player", 5).unwrap();
//! assert!(service.use_lives("player", 1).unwrap().outcome.is_declined());
//!
//! service.clock().advance(TimeDelta::minutes(65));
//! assert_eq!(service.status("player").unwrap().count, 2);
//!
//! let ad = RewardEvent::new(RewardKind::AdWatch, 1, "impression-1");
//! assert!(service.reward("player", &ad).unwrap().outcome.is_credited());
//! assert!(service.reward("player", &ad).unwrap().outcome.is_duplicate());
//! assert_eq!(service.status("player").unwrap().count, 3);
//! ```

pub use self::{clock::*, config::*, reward::*, service::*, state::*, store::*};

mod clock;
mod config;
mod reward;
mod service;
mod state;
mod store;
