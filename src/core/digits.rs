//! Secret digit sequences
//!
//! A `DigitSequence` is a string of 3 or 4 unique decimal digits. Secrets and
//! guesses are both represented this way; validation happens at the engine
//! boundary so the judge can stay total over well-formed inputs.

use crate::{GameError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest supported sequence length.
pub const MIN_DIGIT_COUNT: u8 = 3;
/// Largest supported sequence length.
pub const MAX_DIGIT_COUNT: u8 = 4;

/// A sequence of unique decimal digits, immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DigitSequence(String);

impl DigitSequence {
    /// Validate raw input against the match's configured digit count.
    pub fn parse(input: &str, digit_count: u8) -> Result<Self> {
        if input.len() != digit_count as usize {
            return Err(GameError::InvalidGuessLength {
                expected: digit_count as usize,
                actual: input.len(),
            });
        }
        for c in input.chars() {
            if !c.is_ascii_digit() {
                return Err(GameError::NonDigitCharacter(c));
            }
        }
        for (i, c) in input.chars().enumerate() {
            if input[..i].contains(c) {
                return Err(GameError::DuplicateDigits(input.to_string()));
            }
        }
        Ok(DigitSequence(input.to_string()))
    }

    /// Generate a random sequence: shuffle 0..=9 and take the first N digits.
    pub fn random<R: Rng + ?Sized>(digit_count: u8, rng: &mut R) -> Self {
        let mut digits: Vec<u8> = (0..10).collect();
        digits.shuffle(rng);
        let s = digits[..digit_count as usize]
            .iter()
            .map(|d| char::from(b'0' + d))
            .collect();
        DigitSequence(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of the digits; the base attack damage of a full match.
    pub fn digit_sum(&self) -> i32 {
        self.0.bytes().map(|b| (b - b'0') as i32).sum()
    }

    /// Formula text for battle narration, e.g. `"2+3+4=9"`.
    pub fn sum_formula(&self) -> String {
        let parts: Vec<String> = self.0.chars().map(|c| c.to_string()).collect();
        format!("{}={}", parts.join("+"), self.digit_sum())
    }
}

impl fmt::Display for DigitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn test_parse_valid() {
        let seq = DigitSequence::parse("123", 3).unwrap();
        assert_eq!(seq.as_str(), "123");
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            DigitSequence::parse("12", 3),
            Err(GameError::InvalidGuessLength {
                expected: 3,
                actual: 2
            })
        );
        assert!(DigitSequence::parse("1234", 3).is_err());
    }

    #[test]
    fn test_parse_duplicate_digits() {
        assert_eq!(
            DigitSequence::parse("121", 3),
            Err(GameError::DuplicateDigits("121".to_string()))
        );
    }

    #[test]
    fn test_parse_non_digit() {
        assert_eq!(
            DigitSequence::parse("12a", 3),
            Err(GameError::NonDigitCharacter('a'))
        );
    }

    #[test]
    fn test_random_is_well_formed() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        for count in [3u8, 4u8] {
            for _ in 0..20 {
                let seq = DigitSequence::random(count, &mut rng);
                // Must re-validate against its own rules
                assert!(DigitSequence::parse(seq.as_str(), count).is_ok());
            }
        }
    }

    #[test]
    fn test_digit_sum_and_formula() {
        let seq = DigitSequence::parse("159", 3).unwrap();
        assert_eq!(seq.digit_sum(), 15);
        assert_eq!(seq.sum_formula(), "1+5+9=15");
    }
}
