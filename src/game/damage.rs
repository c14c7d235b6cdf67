//! Damage resolution for a single judged guess
//!
//! Pure over its inputs apart from consuming the one-shot modifiers it uses.
//! HP mutation and event emission stay in the match state; this module only
//! decides who takes how much.

use crate::core::GuessResult;
use crate::game::ModifierState;

/// Where the damage of one player's action lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Nothing happened this action.
    None,
    /// Mutual full match: the actor takes their own digit sum, buffs ignored.
    SelfInflicted { amount: i32 },
    /// The defender's counter stance reflects the attack back at the actor.
    Countered { amount: i32 },
    /// The defender's invincibility swallowed the incoming damage.
    Nullified,
    /// Damage dealt to the defender (attack and/or hit/blow bonus).
    Dealt { amount: i32 },
}

/// Resolve one player's judged guess into a damage outcome.
///
/// `secret_sum` is the digit sum of the *actor's own* secret: a deduced
/// secret punishes its owner with exactly that much damage. Consumed
/// modifiers are reset in place; whatever survives is cleared at end of turn
/// by the match state.
pub fn resolve(
    result: GuessResult,
    digit_count: u8,
    secret_sum: i32,
    mutual_correct: bool,
    attacker: &mut ModifierState,
    defender: &mut ModifierState,
) -> DamageOutcome {
    // Bonus is computed once, up front, and added to whichever branch applies.
    let bonus = attacker.take_result_bonus(result);

    if result.hit == 0 && result.blow == 0 {
        // Self-damage on a whiff existed in an early rule set and is disabled.
        return DamageOutcome::None;
    }

    if result.is_full_match(digit_count) {
        if mutual_correct {
            return DamageOutcome::SelfInflicted { amount: secret_sum };
        }
        let (attack_bonus, multiplier) = attacker.take_attack();
        let attack = ((secret_sum + attack_bonus) as f64 * multiplier) as i32;
        if defender.take_counter() {
            // Counter wins over the attacker's own invincibility; the bonus
            // is consumed but not reflected.
            return DamageOutcome::Countered { amount: attack };
        }
        if defender.take_invincible() {
            return DamageOutcome::Nullified;
        }
        return DamageOutcome::Dealt { amount: attack + bonus };
    }

    // Partial information: no base damage, but armed hit/blow bonuses land.
    if bonus > 0 {
        if defender.take_invincible() {
            return DamageOutcome::Nullified;
        }
        return DamageOutcome::Dealt { amount: bonus };
    }
    DamageOutcome::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardEffect;

    fn result(hit: u8, blow: u8) -> GuessResult {
        GuessResult { hit, blow }
    }

    #[test]
    fn test_whiff_is_harmless() {
        let mut atk = ModifierState::new();
        let mut def = ModifierState::new();
        atk.apply(CardEffect::HitBonus(5));
        let outcome = resolve(result(0, 0), 3, 15, false, &mut atk, &mut def);
        assert_eq!(outcome, DamageOutcome::None);
        // The bonus stays armed; nothing consumed it.
        assert_eq!(atk.hit_bonus, 5);
    }

    #[test]
    fn test_plain_full_match() {
        let mut atk = ModifierState::new();
        let mut def = ModifierState::new();
        let outcome = resolve(result(3, 0), 3, 9, false, &mut atk, &mut def);
        assert_eq!(outcome, DamageOutcome::Dealt { amount: 9 });
    }

    #[test]
    fn test_buffed_full_match() {
        let mut atk = ModifierState::new();
        let mut def = ModifierState::new();
        atk.apply(CardEffect::AttackBonus(5));
        atk.apply(CardEffect::AttackMultiplier(2.0));
        let outcome = resolve(result(3, 0), 3, 6, false, &mut atk, &mut def);
        // (6 + 5) * 2 = 22, truncated
        assert_eq!(outcome, DamageOutcome::Dealt { amount: 22 });
        assert_eq!(atk.take_attack(), (0, 1.0));
    }

    #[test]
    fn test_full_match_with_hit_bonus_stacks() {
        let mut atk = ModifierState::new();
        let mut def = ModifierState::new();
        atk.apply(CardEffect::HitBonus(5));
        let outcome = resolve(result(3, 0), 3, 9, false, &mut atk, &mut def);
        // 9 base + 3 hits * 5
        assert_eq!(outcome, DamageOutcome::Dealt { amount: 24 });
    }

    #[test]
    fn test_mutual_correct_ignores_buffs() {
        let mut atk = ModifierState::new();
        let mut def = ModifierState::new();
        atk.apply(CardEffect::AttackBonus(10));
        let outcome = resolve(result(3, 0), 3, 15, true, &mut atk, &mut def);
        assert_eq!(outcome, DamageOutcome::SelfInflicted { amount: 15 });
    }

    #[test]
    fn test_counter_reflects_attack() {
        let mut atk = ModifierState::new();
        let mut def = ModifierState::new();
        def.apply(CardEffect::Counter);
        let outcome = resolve(result(3, 0), 3, 9, false, &mut atk, &mut def);
        assert_eq!(outcome, DamageOutcome::Countered { amount: 9 });
        // Counter stance is spent
        assert!(!def.counter);
    }

    #[test]
    fn test_counter_beats_attacker_invincibility() {
        let mut atk = ModifierState::new();
        let mut def = ModifierState::new();
        atk.apply(CardEffect::Invincible);
        def.apply(CardEffect::Counter);
        let outcome = resolve(result(3, 0), 3, 9, false, &mut atk, &mut def);
        assert_eq!(outcome, DamageOutcome::Countered { amount: 9 });
        // The attacker's invincibility was not consulted for the reflection
        assert!(atk.invincible);
    }

    #[test]
    fn test_invincible_defender_blocks() {
        let mut atk = ModifierState::new();
        let mut def = ModifierState::new();
        def.apply(CardEffect::Invincible);
        let outcome = resolve(result(3, 0), 3, 9, false, &mut atk, &mut def);
        assert_eq!(outcome, DamageOutcome::Nullified);
        assert!(!def.invincible);
    }

    #[test]
    fn test_partial_bonus_only() {
        let mut atk = ModifierState::new();
        let mut def = ModifierState::new();
        atk.apply(CardEffect::HitBonus(5));
        atk.apply(CardEffect::BlowBonus(3));
        let outcome = resolve(result(1, 2), 3, 9, false, &mut atk, &mut def);
        // 1*5 + 2*3, no base damage without a full match
        assert_eq!(outcome, DamageOutcome::Dealt { amount: 11 });
    }

    #[test]
    fn test_partial_without_bonus() {
        let mut atk = ModifierState::new();
        let mut def = ModifierState::new();
        let outcome = resolve(result(1, 2), 3, 9, false, &mut atk, &mut def);
        assert_eq!(outcome, DamageOutcome::None);
    }
}
