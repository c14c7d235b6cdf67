//! Per-player combat modifiers
//!
//! Every field is single-use: it is consumed the first time it affects a
//! damage computation, and anything left over is force-cleared at the end of
//! the turn it was granted. Nothing here survives across turns.

use crate::core::{CardEffect, GuessResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierState {
    pub attack_bonus: i32,
    pub attack_multiplier: f64,
    pub defense_reduction: i32,
    pub defense_multiplier: f64,
    pub invincible: bool,
    pub counter: bool,
    pub hit_bonus: i32,
    pub blow_bonus: i32,
}

impl Default for ModifierState {
    fn default() -> Self {
        ModifierState {
            attack_bonus: 0,
            attack_multiplier: 1.0,
            defense_reduction: 0,
            defense_multiplier: 1.0,
            invincible: false,
            counter: false,
            hit_bonus: 0,
            blow_bonus: 0,
        }
    }
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a modifier-granting card effect.
    ///
    /// `Heal` and `StealHp` mutate HP directly and are handled by the match
    /// state, not stored here.
    pub fn apply(&mut self, effect: CardEffect) {
        match effect {
            CardEffect::AttackBonus(n) => self.attack_bonus = n,
            CardEffect::AttackMultiplier(x) => self.attack_multiplier = x,
            CardEffect::DefenseReduction(n) => self.defense_reduction = n,
            CardEffect::DefenseMultiplier(x) => self.defense_multiplier = x,
            CardEffect::Invincible => self.invincible = true,
            CardEffect::Counter => self.counter = true,
            CardEffect::HitBonus(n) => self.hit_bonus = n,
            CardEffect::BlowBonus(n) => self.blow_bonus = n,
            CardEffect::Heal(_) | CardEffect::StealHp(_) => {}
        }
    }

    /// Consume the attack modifiers, resetting them to defaults.
    pub fn take_attack(&mut self) -> (i32, f64) {
        let taken = (self.attack_bonus, self.attack_multiplier);
        self.attack_bonus = 0;
        self.attack_multiplier = 1.0;
        taken
    }

    /// Consume the counter stance if armed.
    pub fn take_counter(&mut self) -> bool {
        std::mem::take(&mut self.counter)
    }

    /// Consume invincibility if armed.
    pub fn take_invincible(&mut self) -> bool {
        std::mem::take(&mut self.invincible)
    }

    /// Bonus damage for a judged result, consuming whichever of the hit/blow
    /// bonuses actually applied.
    pub fn take_result_bonus(&mut self, result: GuessResult) -> i32 {
        let mut bonus = 0;
        if self.hit_bonus > 0 && result.hit > 0 {
            bonus += result.hit as i32 * self.hit_bonus;
            self.hit_bonus = 0;
        }
        if self.blow_bonus > 0 && result.blow > 0 {
            bonus += result.blow as i32 * self.blow_bonus;
            self.blow_bonus = 0;
        }
        bonus
    }

    /// Force-reset every field at end of turn. Unused grants are lost, not
    /// banked.
    pub fn clear(&mut self) {
        *self = ModifierState::default();
    }

    pub fn is_clear(&self) -> bool {
        *self == ModifierState::default()
    }

    /// Short human-readable list of active modifiers for status display.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.attack_bonus > 0 {
            parts.push(format!("ATK+{}", self.attack_bonus));
        }
        if self.attack_multiplier > 1.0 {
            parts.push(format!("ATKx{}", self.attack_multiplier));
        }
        if self.defense_reduction > 0 {
            parts.push(format!("DEF+{}", self.defense_reduction));
        }
        if self.defense_multiplier < 1.0 {
            parts.push(format!("DEFx{}", self.defense_multiplier));
        }
        if self.invincible {
            parts.push("Invincible".to_string());
        }
        if self.counter {
            parts.push("Counter".to_string());
        }
        if self.hit_bonus > 0 {
            parts.push(format!("Hitx{}", self.hit_bonus));
        }
        if self.blow_bonus > 0 {
            parts.push(format!("Blowx{}", self.blow_bonus));
        }
        parts.join(" | ")
    }
}
