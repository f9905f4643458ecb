//! Tiered word bank for crossword generation.

/// A group of words that becomes available at a minimum complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordTier {
    /// Lowest complexity at which the tier is used.
    pub min_complexity: u8,
    /// Upper-case answers in the tier.
    pub words: &'static [&'static str],
}

/// All tiers, from the always-available basic words upwards.
pub const WORD_BANK: &[WordTier] = &[
    WordTier {
        min_complexity: 0,
        words: &[
            "CAT", "DOG", "SUN", "HAT", "PEN", "CUP", "BOX", "MAP", "KEY", "BUS",
        ],
    },
    WordTier {
        min_complexity: 3,
        words: &[
            "APPLE", "HOUSE", "WATER", "MUSIC", "PLANT", "RIVER", "LIGHT", "BREAD",
        ],
    },
    WordTier {
        min_complexity: 6,
        words: &[
            "HARMONY", "JOURNEY", "BALANCE", "FREEDOM", "WISDOM", "COURAGE", "MYSTERY", "HORIZON",
        ],
    },
];

/// Returns the words unlocked at `complexity` that fit in a line of `max_len` cells.
///
/// # Examples
///
/// ```
/// use droplink_generator::available_words;
///
/// assert_eq!(available_words(1, 15).count(), 10);
/// assert_eq!(available_words(6, 15).count(), 26);
/// assert!(available_words(6, 4).all(|word| word.len() == 3));
/// ```
pub fn available_words(complexity: u8, max_len: usize) -> impl Iterator<Item = &'static str> {
    WORD_BANK
        .iter()
        .filter(move |tier| tier.min_complexity <= complexity)
        .flat_map(|tier| tier.words.iter().copied())
        .filter(move |word| word.len() <= max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_are_uppercase_ascii() {
        for tier in WORD_BANK {
            for word in tier.words {
                assert!(word.bytes().all(|b| b.is_ascii_uppercase()), "{word}");
            }
        }
    }

    #[test]
    fn test_tiers_unlock_by_complexity() {
        assert_eq!(available_words(2, 15).count(), 10);
        assert_eq!(available_words(3, 15).count(), 18);
        assert_eq!(available_words(5, 15).count(), 18);
        assert_eq!(available_words(10, 15).count(), 26);
    }

    #[test]
    fn test_words_respect_max_len() {
        assert_eq!(available_words(10, 5).count(), 18);
        assert_eq!(available_words(10, 2).count(), 0);
    }
}
