//! The fixed card catalog
//!
//! Fourteen cards: nine round-start buffs and five in-turn support cards.
//! The catalog is static; matches never add or remove definitions.

use crate::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// When a card may be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    /// Chosen once per round at round start, applied immediately.
    Buff,
    /// Held in a 3-card hand, spent at most one per turn.
    Support,
}

/// What a card does when applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CardEffect {
    AttackBonus(i32),
    AttackMultiplier(f64),
    DefenseReduction(i32),
    DefenseMultiplier(f64),
    Invincible,
    Heal(i32),
    Counter,
    HitBonus(i32),
    BlowBonus(i32),
    StealHp(i32),
}

/// A card in the fixed catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Card {
    AttackSmall,
    AttackMedium,
    AttackLarge,
    DefenseSmall,
    DefenseMedium,
    DefenseLarge,
    HealSmall,
    HealMedium,
    HealLarge,
    Counter,
    Invincible,
    HitBonus,
    BlowBonus,
    StealHp,
}

impl Card {
    /// Every card, buffs first.
    pub const ALL: [Card; 14] = [
        Card::AttackSmall,
        Card::AttackMedium,
        Card::AttackLarge,
        Card::DefenseSmall,
        Card::DefenseMedium,
        Card::DefenseLarge,
        Card::HealSmall,
        Card::HealMedium,
        Card::HealLarge,
        Card::Counter,
        Card::Invincible,
        Card::HitBonus,
        Card::BlowBonus,
        Card::StealHp,
    ];

    /// The nine round-start buff cards.
    pub const BUFFS: [Card; 9] = [
        Card::AttackSmall,
        Card::AttackMedium,
        Card::AttackLarge,
        Card::DefenseSmall,
        Card::DefenseMedium,
        Card::DefenseLarge,
        Card::HealSmall,
        Card::HealMedium,
        Card::HealLarge,
    ];

    /// The five support cards drawn into hands.
    pub const SUPPORTS: [Card; 5] = [
        Card::Counter,
        Card::Invincible,
        Card::HitBonus,
        Card::BlowBonus,
        Card::StealHp,
    ];

    /// Stable identifier used in serialized output and the CLI.
    pub fn id(&self) -> &'static str {
        match self {
            Card::AttackSmall => "attack_small",
            Card::AttackMedium => "attack_medium",
            Card::AttackLarge => "attack_large",
            Card::DefenseSmall => "defense_small",
            Card::DefenseMedium => "defense_medium",
            Card::DefenseLarge => "defense_large",
            Card::HealSmall => "heal_small",
            Card::HealMedium => "heal_medium",
            Card::HealLarge => "heal_large",
            Card::Counter => "counter",
            Card::Invincible => "invincible",
            Card::HitBonus => "hit_bonus",
            Card::BlowBonus => "blow_bonus",
            Card::StealHp => "steal_hp",
        }
    }

    /// Display title for card lists and battle narration.
    pub fn title(&self) -> &'static str {
        match self {
            Card::AttackSmall => "Attack S",
            Card::AttackMedium => "Attack M",
            Card::AttackLarge => "Attack L",
            Card::DefenseSmall => "Defense S",
            Card::DefenseMedium => "Defense M",
            Card::DefenseLarge => "Defense L",
            Card::HealSmall => "Heal S",
            Card::HealMedium => "Heal M",
            Card::HealLarge => "Heal L",
            Card::Counter => "Counter",
            Card::Invincible => "Invincible",
            Card::HitBonus => "Hit Bonus",
            Card::BlowBonus => "Blow Bonus",
            Card::StealHp => "HP Drain",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Card::AttackSmall => "+5 damage on your next attack",
            Card::AttackMedium => "+10 damage on your next attack",
            Card::AttackLarge => "your next attack deals double damage",
            Card::DefenseSmall => "-5 on your next self damage",
            Card::DefenseMedium => "your next self damage is halved",
            Card::DefenseLarge => "fully nullify the next damage",
            Card::HealSmall => "restore 10 HP",
            Card::HealMedium => "restore 20 HP",
            Card::HealLarge => "restore 30 HP",
            Card::Counter => "reflect the opponent's next attack",
            Card::Invincible => "fully nullify the next damage",
            Card::HitBonus => "deal hits x5 extra damage this turn",
            Card::BlowBonus => "deal blows x3 extra damage this turn",
            Card::StealHp => "steal 10 HP from the opponent",
        }
    }

    pub fn category(&self) -> CardCategory {
        match self {
            Card::AttackSmall
            | Card::AttackMedium
            | Card::AttackLarge
            | Card::DefenseSmall
            | Card::DefenseMedium
            | Card::DefenseLarge
            | Card::HealSmall
            | Card::HealMedium
            | Card::HealLarge => CardCategory::Buff,
            Card::Counter | Card::Invincible | Card::HitBonus | Card::BlowBonus | Card::StealHp => {
                CardCategory::Support
            }
        }
    }

    pub fn effect(&self) -> CardEffect {
        match self {
            Card::AttackSmall => CardEffect::AttackBonus(5),
            Card::AttackMedium => CardEffect::AttackBonus(10),
            Card::AttackLarge => CardEffect::AttackMultiplier(2.0),
            Card::DefenseSmall => CardEffect::DefenseReduction(5),
            Card::DefenseMedium => CardEffect::DefenseMultiplier(0.5),
            Card::DefenseLarge => CardEffect::Invincible,
            Card::HealSmall => CardEffect::Heal(10),
            Card::HealMedium => CardEffect::Heal(20),
            Card::HealLarge => CardEffect::Heal(30),
            Card::Counter => CardEffect::Counter,
            Card::Invincible => CardEffect::Invincible,
            Card::HitBonus => CardEffect::HitBonus(5),
            Card::BlowBonus => CardEffect::BlowBonus(3),
            Card::StealHp => CardEffect::StealHp(10),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Card {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Card::ALL
            .iter()
            .find(|card| card.id() == s)
            .copied()
            .ok_or_else(|| GameError::UnknownCard(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_size() {
        assert_eq!(Card::ALL.len(), 14);
        assert_eq!(Card::BUFFS.len(), 9);
        assert_eq!(Card::SUPPORTS.len(), 5);
        assert!(Card::BUFFS.iter().all(|c| c.category() == CardCategory::Buff));
        assert!(Card::SUPPORTS
            .iter()
            .all(|c| c.category() == CardCategory::Support));
    }

    #[test]
    fn test_effects() {
        assert_eq!(Card::AttackSmall.effect(), CardEffect::AttackBonus(5));
        assert_eq!(Card::AttackLarge.effect(), CardEffect::AttackMultiplier(2.0));
        assert_eq!(Card::DefenseMedium.effect(), CardEffect::DefenseMultiplier(0.5));
        assert_eq!(Card::HealLarge.effect(), CardEffect::Heal(30));
        assert_eq!(Card::HitBonus.effect(), CardEffect::HitBonus(5));
        assert_eq!(Card::BlowBonus.effect(), CardEffect::BlowBonus(3));
        assert_eq!(Card::StealHp.effect(), CardEffect::StealHp(10));
    }

    #[test]
    fn test_id_round_trip() {
        for card in Card::ALL {
            assert_eq!(card.id().parse::<Card>().unwrap(), card);
        }
    }

    #[test]
    fn test_unknown_card() {
        assert_eq!(
            "fireball".parse::<Card>(),
            Err(GameError::UnknownCard("fireball".to_string()))
        );
    }
}
