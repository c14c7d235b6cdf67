//! Match phases
//!
//! The phase is the authoritative gate for every operation: anything
//! submitted in the wrong phase is rejected without touching state.
//! Non-card matches only ever visit Setting, Playing, and Finished.

use crate::core::Player;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// P1 chooses a secret sequence.
    SettingP1,
    /// P2 chooses a secret sequence.
    SettingP2,
    /// P1 picks one of three offered buff cards.
    CardSelectP1,
    CardSelectP2,
    /// P1 reviews the freshly dealt support hand.
    HandConfirmP1,
    HandConfirmP2,
    /// Waiting for the turn's first guess.
    Playing,
    /// P1 may spend one support card or skip.
    CardUseP1,
    /// Waiting for P2's guess of the turn.
    WaitingP2Input,
    CardUseP2,
    /// Turn resolved; events await playback confirmation.
    Replaying,
    Finished,
}

impl GamePhase {
    pub fn setting(player: Player) -> GamePhase {
        match player {
            Player::P1 => GamePhase::SettingP1,
            Player::P2 => GamePhase::SettingP2,
        }
    }

    pub fn card_select(player: Player) -> GamePhase {
        match player {
            Player::P1 => GamePhase::CardSelectP1,
            Player::P2 => GamePhase::CardSelectP2,
        }
    }

    pub fn hand_confirm(player: Player) -> GamePhase {
        match player {
            Player::P1 => GamePhase::HandConfirmP1,
            Player::P2 => GamePhase::HandConfirmP2,
        }
    }

    pub fn card_use(player: Player) -> GamePhase {
        match player {
            Player::P1 => GamePhase::CardUseP1,
            Player::P2 => GamePhase::CardUseP2,
        }
    }

    /// The player a side-specific phase waits on, if any.
    pub fn awaiting(&self) -> Option<Player> {
        match self {
            GamePhase::SettingP1
            | GamePhase::CardSelectP1
            | GamePhase::HandConfirmP1
            | GamePhase::CardUseP1 => Some(Player::P1),
            GamePhase::SettingP2
            | GamePhase::CardSelectP2
            | GamePhase::HandConfirmP2
            | GamePhase::WaitingP2Input
            | GamePhase::CardUseP2 => Some(Player::P2),
            GamePhase::Playing | GamePhase::Replaying | GamePhase::Finished => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(GamePhase::setting(Player::P1), GamePhase::SettingP1);
        assert_eq!(GamePhase::card_select(Player::P2), GamePhase::CardSelectP2);
        assert_eq!(GamePhase::hand_confirm(Player::P1), GamePhase::HandConfirmP1);
        assert_eq!(GamePhase::card_use(Player::P2), GamePhase::CardUseP2);
    }

    #[test]
    fn test_awaiting() {
        assert_eq!(GamePhase::SettingP1.awaiting(), Some(Player::P1));
        assert_eq!(GamePhase::WaitingP2Input.awaiting(), Some(Player::P2));
        assert_eq!(GamePhase::Playing.awaiting(), None);
        assert_eq!(GamePhase::Finished.awaiting(), None);
    }

    #[test]
    fn test_terminal() {
        assert!(GamePhase::Finished.is_terminal());
        assert!(!GamePhase::Replaying.is_terminal());
    }
}
