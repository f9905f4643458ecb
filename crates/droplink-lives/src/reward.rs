//! External reward events.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Source of a reward.
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
pub enum RewardKind {
    /// The player finished watching an ad.
    #[display("ad-watch")]
    AdWatch,
    /// A purchase was confirmed.
    #[display("payment")]
    Payment,
}

impl RewardKind {
    /// All reward kinds.
    pub const ALL: [Self; 2] = [Self::AdWatch, Self::Payment];
}

/// Error returned when parsing an unknown reward kind.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown reward kind {name:?}, expected ad-watch or payment")]
pub struct ParseRewardKindError {
    name: String,
}

impl FromStr for RewardKind {
    type Err = ParseRewardKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseRewardKindError { name: s.to_owned() })
    }
}

/// A confirmed reward to credit to an account.
///
/// `key` identifies the event at its source (an ad impression or a payment
/// transaction id). Crediting the same key twice has no further effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RewardEvent {
    /// Where the reward came from.
    pub kind: RewardKind,
    /// Lives granted.
    pub amount: u32,
    /// Idempotency key of the event.
    pub key: String,
}

impl RewardEvent {
    /// Creates a reward event.
    #[must_use]
    pub fn new(kind: RewardKind, amount: u32, key: impl Into<String>) -> Self {
        Self {
            kind,
            amount,
            key: key.into(),
        }
    }
}
