//! Error types for the battle engine

use crate::core::Card;
use crate::game::GamePhase;
use thiserror::Error;

/// Recoverable rejections of engine operations.
///
/// Every variant leaves the match state untouched; losing a guess or missing
/// a bonus is a normal transition, never an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("digit count must be 3 or 4, got {0}")]
    InvalidDigitCount(u8),

    #[error("guess must be {expected} digits, got {actual}")]
    InvalidGuessLength { expected: usize, actual: usize },

    #[error("guess contains non-digit character '{0}'")]
    NonDigitCharacter(char),

    #[error("guess contains repeated digits: {0}")]
    DuplicateDigits(String),

    #[error("operation '{op}' is not valid in phase {phase:?}")]
    WrongPhase { op: &'static str, phase: GamePhase },

    #[error("unknown card: {0}")]
    UnknownCard(String),

    #[error("card not in hand: {0}")]
    CardNotInHand(Card),
}

pub type Result<T> = std::result::Result<T, GameError>;
