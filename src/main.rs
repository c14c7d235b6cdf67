//! Self-playing simulation driver for the Hit-and-Blow battle engine
//!
//! Runs seeded matches between two random-but-consistent guessers and prints
//! the battle log or a JSON summary. This is a test/balance harness, not a
//! user interface; presentation layers consume the library directly.

use anyhow::Context;
use clap::{Parser, Subcommand};
use hit_and_blow::core::digits::{MAX_DIGIT_COUNT, MIN_DIGIT_COUNT};
use hit_and_blow::core::{judge, DigitSequence, Player};
use hit_and_blow::game::{
    GamePhase, MatchOutcome, MatchState, OutputMode, VerbosityLevel,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use serde::Serialize;

/// Verbosity level for battle output (accepts names or numbers).
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser)]
#[command(name = "hitblow")]
#[command(about = "Hit-and-Blow battle engine simulation driver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a self-playing match between two random guessers
    Sim {
        /// Number of digits in each secret (3 or 4)
        #[arg(long, default_value = "3")]
        digits: u8,

        /// Enable the card-augmented combat mode
        #[arg(long)]
        cards: bool,

        /// Random seed for deterministic runs
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Verbosity level for battle output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// Emit a machine-readable JSON summary instead of the battle log
        #[arg(long)]
        json: bool,
    },
    /// Judge a single guess against a secret
    Judge {
        /// The secret sequence
        secret: String,
        /// The guess to judge
        guess: String,
    },
}

/// End-of-match summary for --json output.
#[derive(Serialize)]
struct MatchSummary {
    outcome: MatchOutcome,
    rounds: u32,
    total_turns: u32,
    p1_hp: i32,
    p2_hp: i32,
}

/// Random guesser that only guesses sequences consistent with the player's
/// own result history. Keeps simulated matches short without a full solver.
struct ConsistentGuesser {
    candidates: Vec<DigitSequence>,
}

impl ConsistentGuesser {
    fn new(digit_count: u8) -> Self {
        let mut candidates = Vec::new();
        let digits: Vec<char> = "0123456789".chars().collect();
        // All permutations of unique digits, generated by index walking
        for a in 0..10 {
            for b in 0..10 {
                if b == a {
                    continue;
                }
                for c in 0..10 {
                    if c == a || c == b {
                        continue;
                    }
                    if digit_count == 3 {
                        let s: String = [digits[a], digits[b], digits[c]].iter().collect();
                        candidates.push(DigitSequence::parse(&s, 3).unwrap());
                        continue;
                    }
                    for d in 0..10 {
                        if d == a || d == b || d == c {
                            continue;
                        }
                        let s: String =
                            [digits[a], digits[b], digits[c], digits[d]].iter().collect();
                        candidates.push(DigitSequence::parse(&s, 4).unwrap());
                    }
                }
            }
        }
        ConsistentGuesser { candidates }
    }

    /// Prune candidates against the latest result and pick one at random.
    fn next_guess(&mut self, state: &MatchState, player: Player, rng: &mut ChaCha12Rng) -> String {
        self.candidates.retain(|candidate| {
            state.logs(player).iter().all(|record| {
                let result = judge(candidate, &record.digits);
                result.hit == record.hit && result.blow == record.blow
            })
        });
        self.candidates
            .choose(rng)
            .map(|seq| seq.as_str().to_string())
            .unwrap_or_else(|| state.generate_sequence().as_str().to_string())
    }
}

fn run_sim(
    digits: u8,
    cards: bool,
    seed: u64,
    verbosity: VerbosityLevel,
    json: bool,
) -> anyhow::Result<()> {
    let mut state = MatchState::new(digits, cards).context("failed to create match")?;
    state.seed_rng(seed);
    state.logger_mut().set_verbosity(verbosity);
    if !json {
        state.logger_mut().set_output_mode(OutputMode::Stdout);
    }

    // Separate RNG for driver decisions so they never perturb the engine's
    // card shuffles
    let mut driver_rng = ChaCha12Rng::seed_from_u64(seed ^ 0x9e37_79b9);
    let mut guessers = [ConsistentGuesser::new(digits), ConsistentGuesser::new(digits)];
    let mut last_round = state.current_round();

    loop {
        match state.phase() {
            GamePhase::SettingP1 => {
                let secret = state.generate_sequence();
                state.submit_guess(Player::P1, secret.as_str())?;
            }
            GamePhase::SettingP2 => {
                let secret = state.generate_sequence();
                state.submit_guess(Player::P2, secret.as_str())?;
            }
            GamePhase::CardSelectP1 | GamePhase::CardSelectP2 => {
                let player = state.current_player();
                let card = *state
                    .offered_cards()
                    .choose(&mut driver_rng)
                    .context("no cards offered during card select")?;
                state.select_card(player, card)?;
            }
            GamePhase::HandConfirmP1 | GamePhase::HandConfirmP2 => {
                state.confirm_hand(state.current_player())?;
            }
            GamePhase::Playing | GamePhase::WaitingP2Input => {
                let player = state.current_player();
                if state.current_round() != last_round {
                    // New round: both histories are stale
                    last_round = state.current_round();
                    guessers = [ConsistentGuesser::new(digits), ConsistentGuesser::new(digits)];
                }
                let index = match player {
                    Player::P1 => 0,
                    Player::P2 => 1,
                };
                let guess = guessers[index].next_guess(&state, player, &mut driver_rng);
                state.submit_guess(player, &guess)?;
            }
            GamePhase::CardUseP1 | GamePhase::CardUseP2 => {
                let player = state.current_player();
                let hand = state.hand(player).to_vec();
                match hand.choose(&mut driver_rng) {
                    Some(&card) if driver_rng.gen_bool(0.5) => state.use_card(player, card)?,
                    _ => state.skip_card(player)?,
                }
            }
            GamePhase::Replaying => {
                state.confirm_replay()?;
            }
            GamePhase::Finished => break,
        }
    }

    let outcome = state
        .outcome()
        .context("match finished without an outcome")?;
    if json {
        let summary = MatchSummary {
            outcome,
            rounds: state.current_round(),
            total_turns: state.total_turns(),
            p1_hp: state.hp(Player::P1),
            p2_hp: state.hp(Player::P2),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        match outcome {
            MatchOutcome::Winner(player) => println!("Result: {player} wins"),
            MatchOutcome::Draw => println!("Result: draw"),
        }
        println!(
            "Rounds: {}  Turns: {}  HP: P1={} P2={}",
            state.current_round(),
            state.total_turns(),
            state.hp(Player::P1),
            state.hp(Player::P2),
        );
    }
    Ok(())
}

fn run_judge(secret: &str, guess: &str) -> anyhow::Result<()> {
    let digit_count = secret.len() as u8;
    // Same length gate as MatchState::new
    if !(MIN_DIGIT_COUNT..=MAX_DIGIT_COUNT).contains(&digit_count) {
        anyhow::bail!(
            "secret must be {MIN_DIGIT_COUNT} to {MAX_DIGIT_COUNT} digits, got {}",
            secret.len()
        );
    }
    let secret = DigitSequence::parse(secret, digit_count).context("invalid secret")?;
    let guess = DigitSequence::parse(guess, digit_count).context("invalid guess")?;
    let result = judge(&secret, &guess);
    println!("{}H / {}B", result.hit, result.blow);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Sim {
            digits,
            cards,
            seed,
            verbosity,
            json,
        } => run_sim(digits, cards, seed, verbosity.into(), json),
        Commands::Judge { secret, guess } => run_judge(&secret, &guess),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_judge_accepts_supported_lengths() {
        assert!(run_judge("123", "321").is_ok());
        assert!(run_judge("0123", "3210").is_ok());
    }

    #[test]
    fn test_judge_rejects_unsupported_lengths() {
        assert!(run_judge("12", "21").is_err());
        assert!(run_judge("01234", "43210").is_err());
    }

    #[test]
    fn test_judge_rejects_malformed_input() {
        assert!(run_judge("122", "123").is_err());
        assert!(run_judge("123", "12a").is_err());
    }
}
