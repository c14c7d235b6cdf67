//! Match state and the engine's public operations
//!
//! `MatchState` is the aggregate root: it owns both secrets, pending
//! guesses, hands, HP, modifiers, and the phase machine, and is mutated only
//! through the operations below. External layers read snapshots via the
//! accessors and never write fields.

/// Macro for battle narration that avoids allocation when the feature is
/// disabled.
///
/// When verbose-logging is off this becomes a no-op at compile time,
/// eliminating the format! allocations on the hot simulation path.
macro_rules! narrate {
    ($self:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $self.logger.normal(&format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$self; // Suppress unused variable warning
        }
    };
}

use crate::core::digits::{MAX_DIGIT_COUNT, MIN_DIGIT_COUNT};
use crate::core::{
    judge, Card, CardCategory, CardEffect, DigitSequence, GuessRecord, GuessResult, PerPlayer,
    Player,
};
use crate::game::damage::{self, DamageOutcome};
use crate::game::{BattleLogger, GamePhase, ModifierState, ReplayEvent};
use crate::{GameError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cell::RefCell;

/// Both players start each match at full HP.
pub const STARTING_HP: i32 = 100;
/// HP is clamped to [0, HP_MAX] after every mutation.
pub const HP_MAX: i32 = 100;

/// How a finished match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Winner(Player),
    /// Both players dropped to 0 HP in the same resolution (or deduced each
    /// other's secret in a plain match).
    Draw,
}

/// Offered or held cards: never more than three at a time.
pub type CardHand = SmallVec<[Card; 3]>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    digit_count: u8,
    card_mode: bool,
    phase: GamePhase,
    current_player: Player,
    /// Player who opens the secret-setting cycle of the current round.
    round_opener: Player,
    secrets: PerPlayer<Option<DigitSequence>>,
    pending_guess: PerPlayer<Option<DigitSequence>>,
    logs: PerPlayer<Vec<GuessRecord>>,
    hands: PerPlayer<CardHand>,
    hp: PerPlayer<i32>,
    modifiers: PerPlayer<ModifierState>,
    /// Buff chosen at round start; revealed on the round's first replay.
    round_buff: PerPlayer<Option<Card>>,
    offered_cards: CardHand,
    /// Card-reveal events staged during the turn's card-use phases.
    staged_card_events: Vec<ReplayEvent>,
    current_round: u32,
    current_turn: u32,
    total_turns: u32,
    round_over: bool,
    /// The player who deduced the opponent's secret; None on a mutual
    /// full match. The deducer opens the next round.
    round_winner: Option<Player>,
    outcome: Option<MatchOutcome>,
    replay: Vec<ReplayEvent>,
    /// Serializable RNG for card shuffles and random sequences; seeding it
    /// makes whole matches reproducible.
    rng: RefCell<ChaCha12Rng>,
    logger: BattleLogger,
}

impl MatchState {
    /// Create a new match. `digit_count` must be 3 or 4.
    pub fn new(digit_count: u8, card_mode: bool) -> Result<Self> {
        if !(MIN_DIGIT_COUNT..=MAX_DIGIT_COUNT).contains(&digit_count) {
            return Err(GameError::InvalidDigitCount(digit_count));
        }
        let state = MatchState {
            digit_count,
            card_mode,
            phase: GamePhase::SettingP1,
            current_player: Player::P1,
            round_opener: Player::P1,
            secrets: PerPlayer::default(),
            pending_guess: PerPlayer::default(),
            logs: PerPlayer::default(),
            hands: PerPlayer::default(),
            hp: PerPlayer::new(STARTING_HP, STARTING_HP),
            modifiers: PerPlayer::default(),
            round_buff: PerPlayer::default(),
            offered_cards: CardHand::new(),
            staged_card_events: Vec::new(),
            current_round: 1,
            current_turn: 1,
            total_turns: 0,
            round_over: false,
            round_winner: None,
            outcome: None,
            replay: Vec::new(),
            rng: RefCell::new(ChaCha12Rng::seed_from_u64(0)),
            logger: BattleLogger::new(),
        };
        narrate!(state, "=== Round 1 ===");
        Ok(state)
    }

    /// Reseed the RNG for deterministic card offers, hands, and sequences.
    pub fn seed_rng(&mut self, seed: u64) {
        *self.rng.borrow_mut() = ChaCha12Rng::seed_from_u64(seed);
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    pub fn digit_count(&self) -> u8 {
        self.digit_count
    }

    pub fn card_mode(&self) -> bool {
        self.card_mode
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// The player whose input the engine is currently waiting on.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn hp(&self, player: Player) -> i32 {
        self.hp[player]
    }

    /// Guess history for the current round, oldest first.
    pub fn logs(&self, player: Player) -> &[GuessRecord] {
        &self.logs[player]
    }

    /// Support cards still held this round.
    pub fn hand(&self, player: Player) -> &[Card] {
        &self.hands[player]
    }

    /// Buff cards offered during a CardSelect phase.
    pub fn offered_cards(&self) -> &[Card] {
        &self.offered_cards
    }

    /// Human-readable list of the player's active modifiers.
    pub fn status_summary(&self, player: Player) -> String {
        self.modifiers[player].summary()
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    /// Exchange number within the current round, starting at 1.
    pub fn current_turn(&self) -> u32 {
        self.current_turn
    }

    /// Individual guess resolutions across the whole match.
    pub fn total_turns(&self) -> u32 {
        self.total_turns
    }

    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            Some(MatchOutcome::Winner(player)) => Some(player),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    /// Events produced by the most recent turn resolution, in playback order.
    pub fn replay_events(&self) -> &[ReplayEvent] {
        &self.replay
    }

    pub fn logger(&self) -> &BattleLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut BattleLogger {
        &mut self.logger
    }

    /// Generate a random well-formed sequence with the match's digit count.
    pub fn generate_sequence(&self) -> DigitSequence {
        DigitSequence::random(self.digit_count, &mut *self.rng.borrow_mut())
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Submit a secret (during a Setting phase) or a guess (during play).
    pub fn submit_guess(&mut self, player: Player, digits: &str) -> Result<()> {
        let sequence = DigitSequence::parse(digits, self.digit_count)?;
        match (self.phase, player) {
            (GamePhase::SettingP1, Player::P1) | (GamePhase::SettingP2, Player::P2) => {
                self.accept_secret(player, sequence);
                Ok(())
            }
            (GamePhase::Playing, p) if p == self.current_player => {
                self.accept_guess(p, sequence);
                Ok(())
            }
            (GamePhase::WaitingP2Input, Player::P2) => {
                self.accept_guess(Player::P2, sequence);
                Ok(())
            }
            _ => Err(GameError::WrongPhase {
                op: "submit_guess",
                phase: self.phase,
            }),
        }
    }

    /// Pick one of the three offered buff cards at round start.
    pub fn select_card(&mut self, player: Player, card: Card) -> Result<()> {
        match (self.phase, player) {
            (GamePhase::CardSelectP1, Player::P1) | (GamePhase::CardSelectP2, Player::P2) => {}
            _ => {
                return Err(GameError::WrongPhase {
                    op: "select_card",
                    phase: self.phase,
                })
            }
        }
        if !self.offered_cards.contains(&card) {
            return Err(GameError::CardNotInHand(card));
        }
        debug_assert_eq!(card.category(), CardCategory::Buff);

        self.apply_buff(player, card);
        self.round_buff[player] = Some(card);
        self.offered_cards.clear();
        self.deal_support_hand(player);
        self.phase = GamePhase::hand_confirm(player);
        Ok(())
    }

    /// Spend one support card from the hand during a CardUse phase.
    pub fn use_card(&mut self, player: Player, card: Card) -> Result<()> {
        self.expect_card_use_phase(player, "use_card")?;
        let hand = &mut self.hands[player];
        let Some(pos) = hand.iter().position(|&c| c == card) else {
            return Err(GameError::CardNotInHand(card));
        };
        hand.remove(pos);
        debug_assert_eq!(card.category(), CardCategory::Support);
        narrate!(self, "{player} plays [{}]", card.title());

        match card.effect() {
            CardEffect::StealHp(amount) => self.steal_hp(player, amount),
            effect => {
                self.modifiers[player].apply(effect);
                Self::push_card_events(&mut self.staged_card_events, player, card);
            }
        }
        self.advance_after_card_phase(player)
    }

    /// Decline to play a support card this turn.
    pub fn skip_card(&mut self, player: Player) -> Result<()> {
        self.expect_card_use_phase(player, "skip_card")?;
        narrate!(self, "{player} skips card use");
        self.advance_after_card_phase(player)
    }

    /// Acknowledge the freshly dealt support hand.
    pub fn confirm_hand(&mut self, player: Player) -> Result<()> {
        match (self.phase, player) {
            (GamePhase::HandConfirmP1, Player::P1) | (GamePhase::HandConfirmP2, Player::P2) => {}
            _ => {
                return Err(GameError::WrongPhase {
                    op: "confirm_hand",
                    phase: self.phase,
                })
            }
        }
        if player == self.round_opener {
            let next = player.opponent();
            self.phase = GamePhase::setting(next);
            self.current_player = next;
        } else {
            self.begin_playing();
        }
        Ok(())
    }

    /// Signal that replay playback finished; commits end-of-turn cleanup and
    /// the next phase transition.
    pub fn confirm_replay(&mut self) -> Result<()> {
        if self.phase != GamePhase::Replaying {
            return Err(GameError::WrongPhase {
                op: "confirm_replay",
                phase: self.phase,
            });
        }
        self.finish_turn();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn accept_secret(&mut self, player: Player, sequence: DigitSequence) {
        self.secrets[player] = Some(sequence);
        narrate!(self, "{player} set a secret sequence");
        if self.card_mode {
            self.phase = GamePhase::card_select(player);
            self.offer_buff_cards();
        } else if player == self.round_opener {
            let next = player.opponent();
            self.phase = GamePhase::setting(next);
            self.current_player = next;
        } else {
            self.begin_playing();
        }
    }

    fn accept_guess(&mut self, player: Player, sequence: DigitSequence) {
        narrate!(self, "{player} guesses {sequence}");
        self.pending_guess[player] = Some(sequence);
        if self.card_mode {
            self.phase = GamePhase::card_use(player);
        } else if player == Player::P1 {
            self.current_player = Player::P2;
        } else {
            self.resolve_plain_turn();
        }
    }

    fn begin_playing(&mut self) {
        self.phase = GamePhase::Playing;
        self.current_player = Player::P1;
    }

    fn expect_card_use_phase(&self, player: Player, op: &'static str) -> Result<()> {
        match (self.phase, player) {
            (GamePhase::CardUseP1, Player::P1) | (GamePhase::CardUseP2, Player::P2) => Ok(()),
            _ => Err(GameError::WrongPhase {
                op,
                phase: self.phase,
            }),
        }
    }

    fn advance_after_card_phase(&mut self, player: Player) -> Result<()> {
        match player {
            Player::P1 => {
                self.phase = GamePhase::WaitingP2Input;
                self.current_player = Player::P2;
                Ok(())
            }
            Player::P2 => self.resolve_turn(),
        }
    }

    /// Offer three random buff cards for the CardSelect phase.
    fn offer_buff_cards(&mut self) {
        let mut pool: Vec<Card> = Card::BUFFS.to_vec();
        pool.shuffle(&mut *self.rng.borrow_mut());
        self.offered_cards = pool[..3].iter().copied().collect();
    }

    /// Deal a fresh 3-card support hand, once per round per player.
    fn deal_support_hand(&mut self, player: Player) {
        let mut pool: Vec<Card> = Card::SUPPORTS.to_vec();
        pool.shuffle(&mut *self.rng.borrow_mut());
        self.hands[player] = pool[..3].iter().copied().collect();
        narrate!(self, "{player} draws 3 support cards");
    }

    fn apply_buff(&mut self, player: Player, card: Card) {
        narrate!(self, "{player} picks [{}]", card.title());
        match card.effect() {
            CardEffect::Heal(amount) => {
                self.adjust_hp(player, amount);
                narrate!(self, "{player} heals {amount} HP (now {})", self.hp[player]);
            }
            effect => self.modifiers[player].apply(effect),
        }
    }

    /// Transfer `min(amount, target HP)` from the opponent to `player`.
    ///
    /// The transfer happens at card-use time; match-ending HP evaluation
    /// waits for turn resolution.
    fn steal_hp(&mut self, player: Player, amount: i32) {
        let target = player.opponent();
        let stolen = amount.min(self.hp[target]);
        self.adjust_hp(target, -stolen);
        self.adjust_hp(player, stolen);
        narrate!(
            self,
            "{player} drains {stolen} HP from {target} ({player}: {}, {target}: {})",
            self.hp[player],
            self.hp[target]
        );
        self.staged_card_events.push(ReplayEvent::CardEffect {
            player,
            card: Card::StealHp,
        });
        self.staged_card_events.push(ReplayEvent::StealHp {
            from: target,
            to: player,
            amount: stolen,
        });
    }

    fn adjust_hp(&mut self, player: Player, delta: i32) {
        self.hp[player] = (self.hp[player] + delta).clamp(0, HP_MAX);
    }

    /// Reveal events for a card activation (buff at round start, support
    /// in-turn). StealHp is handled separately so the event carries the
    /// actual transferred amount.
    fn push_card_events(events: &mut Vec<ReplayEvent>, player: Player, card: Card) {
        events.push(ReplayEvent::CardEffect { player, card });
        match card.effect() {
            CardEffect::DefenseReduction(_) | CardEffect::DefenseMultiplier(_) => {
                events.push(ReplayEvent::Defense { player });
            }
            CardEffect::Heal(amount) => events.push(ReplayEvent::Heal { player, amount }),
            CardEffect::Invincible => events.push(ReplayEvent::Barrier { player }),
            CardEffect::Counter => events.push(ReplayEvent::Counter { player }),
            _ => {}
        }
    }

    fn take_pending(&mut self) -> (DigitSequence, DigitSequence) {
        let p1 = self
            .pending_guess
            .p1
            .take()
            .expect("P1 guess pending at turn resolution");
        let p2 = self
            .pending_guess
            .p2
            .take()
            .expect("P2 guess pending at turn resolution");
        (p1, p2)
    }

    fn secrets_cloned(&self) -> (DigitSequence, DigitSequence) {
        let p1 = self.secrets.p1.clone().expect("P1 secret set before play");
        let p2 = self.secrets.p2.clone().expect("P2 secret set before play");
        (p1, p2)
    }

    /// Resolve a card-mode turn: judge both guesses, materialize the replay
    /// event list, and commit HP/log/winner updates atomically. The state
    /// stays in Replaying until `confirm_replay`.
    fn resolve_turn(&mut self) -> Result<()> {
        self.phase = GamePhase::Replaying;
        let (p1_guess, p2_guess) = self.take_pending();
        let (p1_secret, p2_secret) = self.secrets_cloned();
        let p1_result = judge(&p2_secret, &p1_guess);
        let p2_result = judge(&p1_secret, &p2_guess);
        let digit_count = self.digit_count;
        let mutual = p1_result.is_full_match(digit_count) && p2_result.is_full_match(digit_count);

        let mut events: Vec<ReplayEvent> = Vec::new();
        if self.current_turn == 1 {
            for player in Player::BOTH {
                if let Some(card) = self.round_buff[player] {
                    Self::push_card_events(&mut events, player, card);
                }
            }
        }
        events.append(&mut self.staged_card_events);
        events.push(ReplayEvent::ResultReveal {
            player: Player::P1,
            hit: p1_result.hit,
            blow: p1_result.blow,
        });
        events.push(ReplayEvent::ResultReveal {
            player: Player::P2,
            hit: p2_result.hit,
            blow: p2_result.blow,
        });

        let actions = [
            (Player::P1, &p1_guess, p1_result, &p1_secret),
            (Player::P2, &p2_guess, p2_result, &p2_secret),
        ];
        for (player, guess, result, secret) in actions {
            self.record_guess(player, guess, result);
            self.apply_action(player, result, secret, mutual, &mut events);
            if result.is_full_match(digit_count) {
                self.round_over = true;
                if !mutual {
                    self.round_winner = Some(player);
                }
                narrate!(
                    self,
                    "{player} deduced the secret! Round {} ends",
                    self.current_round
                );
            }
        }

        self.evaluate_outcome();
        self.replay = events;
        Ok(())
    }

    fn record_guess(&mut self, player: Player, guess: &DigitSequence, result: GuessResult) {
        narrate!(
            self,
            "{player} -> {guess}: {}H / {}B",
            result.hit,
            result.blow
        );
        self.logs[player].push(GuessRecord {
            player,
            digits: guess.clone(),
            hit: result.hit,
            blow: result.blow,
        });
        self.total_turns += 1;
    }

    /// Apply one player's damage exchange and append its events.
    ///
    /// `secret` is the actor's own secret: a full match deals its digit sum,
    /// and the narration spells the formula out the way the battle log shows
    /// it on screen.
    fn apply_action(
        &mut self,
        player: Player,
        result: GuessResult,
        secret: &DigitSequence,
        mutual: bool,
        events: &mut Vec<ReplayEvent>,
    ) {
        let opponent = player.opponent();
        let own_sum = secret.digit_sum();
        let (attacker, defender) = self.modifiers.both_mut(player);
        let outcome = damage::resolve(result, self.digit_count, own_sum, mutual, attacker, defender);
        match outcome {
            DamageOutcome::None => {
                narrate!(self, "{player} deals no damage");
            }
            DamageOutcome::SelfInflicted { amount } => {
                self.adjust_hp(player, -amount);
                narrate!(
                    self,
                    "Both correct! {player} takes {amount} self damage ({}; HP {})",
                    secret.sum_formula(),
                    self.hp[player]
                );
                events.push(ReplayEvent::Attack {
                    from: player,
                    to: player,
                    amount,
                });
            }
            DamageOutcome::Countered { amount } => {
                self.adjust_hp(player, -amount);
                narrate!(
                    self,
                    "{opponent} counters! {player} takes {amount} damage (base {}; HP {})",
                    secret.sum_formula(),
                    self.hp[player]
                );
                events.push(ReplayEvent::Counter { player: opponent });
                events.push(ReplayEvent::Attack {
                    from: opponent,
                    to: player,
                    amount,
                });
            }
            DamageOutcome::Nullified => {
                narrate!(self, "{opponent}'s barrier nullifies the damage");
                events.push(ReplayEvent::Barrier { player: opponent });
            }
            DamageOutcome::Dealt { amount } => {
                self.adjust_hp(opponent, -amount);
                if result.is_full_match(self.digit_count) {
                    narrate!(
                        self,
                        "{player} hits {opponent} for {amount} (base {}; HP {})",
                        secret.sum_formula(),
                        self.hp[opponent]
                    );
                } else {
                    narrate!(
                        self,
                        "{player} deals {amount} bonus damage to {opponent} (HP {})",
                        self.hp[opponent]
                    );
                }
                events.push(ReplayEvent::Attack {
                    from: player,
                    to: opponent,
                    amount,
                });
            }
        }
    }

    /// Evaluate both HP totals once, after the whole simultaneous turn.
    /// A double KO is an explicit draw rather than an order-dependent win.
    fn evaluate_outcome(&mut self) {
        let p1_dead = self.hp.p1 <= 0;
        let p2_dead = self.hp.p2 <= 0;
        self.outcome = match (p1_dead, p2_dead) {
            (true, true) => Some(MatchOutcome::Draw),
            (true, false) => Some(MatchOutcome::Winner(Player::P2)),
            (false, true) => Some(MatchOutcome::Winner(Player::P1)),
            (false, false) => None,
        };
    }

    /// End-of-turn commit after replay playback: one-shot modifiers die
    /// here, then the match moves on (or ends).
    fn finish_turn(&mut self) {
        self.modifiers.p1.clear();
        self.modifiers.p2.clear();
        self.staged_card_events.clear();

        if let Some(outcome) = self.outcome {
            self.finish_match(outcome);
        } else if self.round_over {
            self.advance_round();
        } else {
            self.current_turn += 1;
            self.begin_playing();
        }
    }

    fn finish_match(&mut self, outcome: MatchOutcome) {
        self.phase = GamePhase::Finished;
        match outcome {
            MatchOutcome::Winner(player) => {
                self.logger.minimal(&format!("{player} wins the match"));
            }
            MatchOutcome::Draw => self.logger.minimal("match ends in a draw"),
        }
    }

    /// Start the next round: logs, hands, secrets, and buffs reset; HP and
    /// the round counter carry over. The player whose secret was not deduced
    /// opens the new setting cycle.
    fn advance_round(&mut self) {
        self.current_round += 1;
        self.current_turn = 1;
        self.round_opener = self.round_winner.unwrap_or(Player::P1);
        self.round_over = false;
        self.round_winner = None;
        self.secrets = PerPlayer::default();
        self.pending_guess = PerPlayer::default();
        self.logs = PerPlayer::default();
        self.hands = PerPlayer::default();
        self.round_buff = PerPlayer::default();
        self.offered_cards.clear();
        narrate!(self, "=== Round {} ===", self.current_round);
        self.phase = GamePhase::setting(self.round_opener);
        self.current_player = self.round_opener;
    }

    /// Plain-mode resolution: no HP, first full match wins outright.
    fn resolve_plain_turn(&mut self) {
        let (p1_guess, p2_guess) = self.take_pending();
        let (p1_secret, p2_secret) = self.secrets_cloned();
        let p1_result = judge(&p2_secret, &p1_guess);
        let p2_result = judge(&p1_secret, &p2_guess);

        self.record_guess(Player::P1, &p1_guess, p1_result);
        self.record_guess(Player::P2, &p2_guess, p2_result);
        self.replay = vec![
            ReplayEvent::ResultReveal {
                player: Player::P1,
                hit: p1_result.hit,
                blow: p1_result.blow,
            },
            ReplayEvent::ResultReveal {
                player: Player::P2,
                hit: p2_result.hit,
                blow: p2_result.blow,
            },
        ];

        let p1_full = p1_result.is_full_match(self.digit_count);
        let p2_full = p2_result.is_full_match(self.digit_count);
        match (p1_full, p2_full) {
            (true, true) => {
                self.outcome = Some(MatchOutcome::Draw);
                self.finish_match(MatchOutcome::Draw);
            }
            (true, false) => {
                self.outcome = Some(MatchOutcome::Winner(Player::P1));
                self.finish_match(MatchOutcome::Winner(Player::P1));
            }
            (false, true) => {
                self.outcome = Some(MatchOutcome::Winner(Player::P2));
                self.finish_match(MatchOutcome::Winner(Player::P2));
            }
            (false, false) => {
                self.current_turn += 1;
                self.current_player = Player::P1;
            }
        }
    }
}
