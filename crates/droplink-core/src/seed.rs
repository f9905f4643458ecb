//! Reproducible random seeds for content generation.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use rand::{RngExt as _, SeedableRng as _};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

/// A 256-bit seed from which generated content can be reproduced.
///
/// Seeds are displayed and parsed as 64 lowercase hexadecimal digits.
/// A seed produces a [`Pcg64`] generator through [`PuzzleSeed::rng`], so the
/// same seed always yields the same board.
///
/// # Examples
///
/// ```
/// use droplink_core::PuzzleSeed;
/// use rand::RngExt as _;
///
/// let seed = PuzzleSeed::random();
/// let parsed: PuzzleSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
///
/// let a: u64 = seed.rng().random();
/// let b: u64 = parsed.rng().random();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PuzzleSeed([u8; 32]);

impl PuzzleSeed {
    /// Creates a seed from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw seed bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Creates a fresh seed from the thread-local entropy source.
    #[must_use]
    pub fn random() -> Self {
        let mut bytes = [0; 32];
        rand::rng().fill(&mut bytes);
        Self(bytes)
    }

    /// Derives a child seed for a labelled, numbered piece of content.
    ///
    /// The child is `SHA-256(seed || label || index)`, so every `(label, index)`
    /// pair maps to an independent, stable stream. This is how a level's
    /// board is regenerated from a session seed and the level number.
    ///
    /// # Examples
    ///
    /// ```
    /// use droplink_core::PuzzleSeed;
    ///
    /// let base = PuzzleSeed::from_bytes([7; 32]);
    /// assert_eq!(base.derive("sudoku", 3), base.derive("sudoku", 3));
    /// assert_ne!(base.derive("sudoku", 3), base.derive("sudoku", 4));
    /// assert_ne!(base.derive("sudoku", 3), base.derive("crossword", 3));
    /// ```
    #[must_use]
    pub fn derive(&self, label: &str, index: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(self.0);
        hasher.update(label.as_bytes());
        hasher.update(index.to_le_bytes());
        Self(hasher.finalize().into())
    }

    /// Returns a random number generator seeded from this seed.
    #[must_use]
    pub fn rng(&self) -> Pcg64 {
        Pcg64::from_seed(self.0)
    }
}

impl Display for PuzzleSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Error returned when parsing a [`PuzzleSeed`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SeedParseError {
    /// The string does not contain exactly 64 characters.
    #[display("seed must be 64 hex digits, got {len} characters")]
    InvalidLength {
        /// Number of characters found.
        len: usize,
    },
    /// The string contains a non-hexadecimal character.
    #[display("invalid hex digit {ch:?} in seed")]
    InvalidDigit {
        /// The offending character.
        ch: char,
    },
}

impl FromStr for PuzzleSeed {
    type Err = SeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let len = s.chars().count();
        if len != 64 {
            return Err(SeedParseError::InvalidLength { len });
        }

        if let Some(ch) = s.chars().find(|ch| !ch.is_ascii_hexdigit()) {
            return Err(SeedParseError::InvalidDigit { ch });
        }

        let mut bytes = [0; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).expect("validated hex digits");
        }
        Ok(Self(bytes))
    }
}

impl From<PuzzleSeed> for String {
    fn from(seed: PuzzleSeed) -> Self {
        seed.to_string()
    }
}

impl TryFrom<String> for PuzzleSeed {
    type Error = SeedParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::RngExt as _;

    use super::*;

    const SEED: &str = "c1d44bd6afaf8af64f126546884e19298acbdc33c3924a28136715de946ef3f1";

    #[test]
    fn test_parse_and_display() {
        let seed: PuzzleSeed = SEED.parse().unwrap();
        assert_eq!(seed.as_bytes()[0], 0xc1);
        assert_eq!(seed.as_bytes()[31], 0xf1);
        assert_eq!(seed.to_string(), SEED);

        let upper: PuzzleSeed = SEED.to_uppercase().parse().unwrap();
        assert_eq!(upper, seed);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "abc".parse::<PuzzleSeed>(),
            Err(SeedParseError::InvalidLength { len: 3 })
        );
        let bad = format!("{}g", &SEED[..63]);
        assert_eq!(
            bad.parse::<PuzzleSeed>(),
            Err(SeedParseError::InvalidDigit { ch: 'g' })
        );
    }

    #[test]
    fn test_same_seed_same_stream() {
        let seed: PuzzleSeed = SEED.parse().unwrap();
        let mut a = seed.rng();
        let mut b = seed.rng();
        for _ in 0..8 {
            assert_eq!(a.random::<u32>(), b.random::<u32>());
        }
        assert_ne!(
            seed.derive("level", 0).rng().random::<u64>(),
            seed.rng().random::<u64>()
        );
    }

    proptest! {
        #[test]
        fn test_display_parse_roundtrip(bytes in any::<[u8; 32]>()) {
            let seed = PuzzleSeed::from_bytes(bytes);
            prop_assert_eq!(seed.to_string().parse::<PuzzleSeed>(), Ok(seed));
        }
    }
}
