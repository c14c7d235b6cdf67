//! Hit/Blow judging
//!
//! A hit is a guessed digit at the correct position; a blow is a guessed
//! digit present in the secret at a different position.

use crate::core::{DigitSequence, Player};
use serde::{Deserialize, Serialize};

/// Outcome of comparing a guess against a secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessResult {
    pub hit: u8,
    pub blow: u8,
}

impl GuessResult {
    /// A full match deduces the secret and ends the round.
    pub fn is_full_match(&self, digit_count: u8) -> bool {
        self.hit == digit_count
    }
}

/// Compare `guess` against `secret`, counting hits and blows.
///
/// Pure and deterministic. Callers must validate both sequences first;
/// the judge assumes equal lengths and unique digits.
pub fn judge(secret: &DigitSequence, guess: &DigitSequence) -> GuessResult {
    debug_assert_eq!(secret.len(), guess.len());
    let s = secret.as_str().as_bytes();
    let mut hit = 0;
    let mut blow = 0;
    for (i, g) in guess.as_str().bytes().enumerate() {
        if s[i] == g {
            hit += 1;
        } else if s.contains(&g) {
            blow += 1;
        }
    }
    GuessResult { hit, blow }
}

/// One line of a player's guess history for the current round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRecord {
    pub player: Player,
    pub digits: DigitSequence,
    pub hit: u8,
    pub blow: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(s: &str) -> DigitSequence {
        DigitSequence::parse(s, s.len() as u8).unwrap()
    }

    #[test]
    fn test_all_hits() {
        assert_eq!(judge(&seq("123"), &seq("123")), GuessResult { hit: 3, blow: 0 });
    }

    #[test]
    fn test_all_blows() {
        assert_eq!(judge(&seq("123"), &seq("312")), GuessResult { hit: 0, blow: 3 });
    }

    #[test]
    fn test_mixed() {
        assert_eq!(judge(&seq("123"), &seq("132")), GuessResult { hit: 1, blow: 2 });
    }

    #[test]
    fn test_no_overlap() {
        assert_eq!(judge(&seq("123"), &seq("456")), GuessResult { hit: 0, blow: 0 });
    }

    #[test]
    fn test_four_digits() {
        assert_eq!(judge(&seq("0714"), &seq("0471")), GuessResult { hit: 1, blow: 3 });
    }

    #[test]
    fn test_self_judge_property() {
        for s in ["048", "951", "2468", "1379"] {
            let secret = seq(s);
            let result = judge(&secret, &secret);
            assert_eq!(result.hit as usize, secret.len());
            assert_eq!(result.blow, 0);
        }
    }

    #[test]
    fn test_hit_plus_blow_bounded_by_shared_digits() {
        let secret = seq("123");
        for g in ["145", "245", "345", "123", "321", "456"] {
            let guess = seq(g);
            let shared = guess
                .as_str()
                .chars()
                .filter(|&c| secret.as_str().contains(c))
                .count();
            let result = judge(&secret, &guess);
            assert!((result.hit + result.blow) as usize <= shared);
        }
    }
}
