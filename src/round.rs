use crate::catalog::{Catalog, Character};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

pub const MAX_ATTEMPTS: u32 = 6;
pub const INITIAL_SCORE: u32 = 2000;
pub const QUESTION_COST: u32 = 100;
pub const INITIAL_PROGRESS: u32 = 100;

/// Progress lost on attempts 1..=5. The sixth attempt ends the round instead.
const PROGRESS_PENALTIES: [u32; 5] = [10, 10, 15, 20, 25];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("cannot start a round: the catalog has no characters")]
    EmptyCatalog,

    #[error("the round is over ({0})")]
    RoundOver(RoundPhase),

    #[error("a final guess is only taken once every attempt is spent (round is {0})")]
    FinalGuessNotDue(RoundPhase),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum RoundPhase {
    Active,
    Exhausted,
    Won,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AskOutcome {
    pub matches: bool,
    pub attempts_used: u32,
    pub remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessResult {
    Empty,
    Correct,
    Incorrect,
}

/// One play-through against a secret character.
#[derive(Debug, Clone)]
pub struct Round {
    secret: Character,
    attempts: u32,
    score: u32,
    progress: u32,
    phase: RoundPhase,
}

impl Round {
    pub fn start(catalog: &Catalog) -> Result<Self, RoundError> {
        Self::start_with_rng(catalog, &mut rand::thread_rng())
    }

    pub fn start_with_rng<R: Rng + ?Sized>(
        catalog: &Catalog,
        rng: &mut R,
    ) -> Result<Self, RoundError> {
        let secret = catalog
            .characters
            .choose(rng)
            .ok_or(RoundError::EmptyCatalog)?;
        info!("round started with catalog {}", catalog.name);
        debug!("secret character: {}", secret.name());
        Ok(Self::with_secret(secret.clone()))
    }

    pub fn with_secret(secret: Character) -> Self {
        Self {
            secret,
            attempts: 0,
            score: INITIAL_SCORE,
            progress: INITIAL_PROGRESS,
            phase: RoundPhase::Active,
        }
    }

    pub fn secret(&self) -> &Character {
        &self.secret
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn remaining(&self) -> u32 {
        MAX_ATTEMPTS - self.attempts
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase != RoundPhase::Active
    }

    /// Spends one attempt on a yes/no question about `tag`.
    ///
    /// Repeat questions are not rejected here; one-shot controls belong to the host.
    pub fn ask_attribute(&mut self, tag: &str) -> Result<AskOutcome, RoundError> {
        if self.is_terminal() {
            return Err(RoundError::RoundOver(self.phase));
        }

        self.attempts += 1;
        self.score = self.score.saturating_sub(QUESTION_COST);
        if let Some(penalty) = PROGRESS_PENALTIES.get(self.attempts as usize - 1) {
            self.progress = self.progress.saturating_sub(*penalty);
        }
        if self.attempts >= MAX_ATTEMPTS {
            self.phase = RoundPhase::Exhausted;
        }

        let matches = self.secret.has_tag(tag);
        debug!(
            "asked {tag}: matches={matches} attempts={} score={} progress={}",
            self.attempts, self.score, self.progress
        );

        Ok(AskOutcome {
            matches,
            attempts_used: self.attempts,
            remaining: self.remaining(),
        })
    }

    /// Guess while the round is still active. A correct guess wins the round.
    pub fn submit_guess(&mut self, text: &str) -> Result<GuessResult, RoundError> {
        if self.is_terminal() {
            return Err(RoundError::RoundOver(self.phase));
        }

        let result = self.judge(text);
        if result == GuessResult::Correct {
            self.phase = RoundPhase::Won;
            info!("round won after {} attempts, score {}", self.attempts, self.score);
        }
        Ok(result)
    }

    /// The mandatory guess once every attempt has been spent. Any non-empty
    /// guess ends the round, right or wrong.
    pub fn forced_final_guess(&mut self, text: &str) -> Result<GuessResult, RoundError> {
        if self.phase != RoundPhase::Exhausted {
            return Err(RoundError::FinalGuessNotDue(self.phase));
        }

        let result = self.judge(text);
        if result != GuessResult::Empty {
            self.phase = RoundPhase::Ended;
            info!("round ended on final guess ({result:?}), score {}", self.score);
        }
        Ok(result)
    }

    fn judge(&self, text: &str) -> GuessResult {
        let guess = text.trim();
        if guess.is_empty() {
            GuessResult::Empty
        } else if guess.to_lowercase() == self.secret.name().to_lowercase() {
            GuessResult::Correct
        } else {
            GuessResult::Incorrect
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn kratos() -> Round {
        Round::with_secret(Character::new("kratos", ["barba", "heroe", "tatuaje"]))
    }

    #[test]
    fn start_initialises_counters() {
        let catalog = Catalog::builtin().unwrap();
        let round = Round::start(&catalog).unwrap();

        assert_eq!(round.score(), 2000);
        assert_eq!(round.progress(), 100);
        assert_eq!(round.attempts(), 0);
        assert_eq!(round.remaining(), 6);
        assert_eq!(round.phase(), RoundPhase::Active);
        assert!(catalog.characters.contains(round.secret()));
    }

    #[test]
    fn start_rejects_empty_catalog() {
        let catalog = Catalog::new("empty", vec![], vec![]);
        assert_matches!(Round::start(&catalog), Err(RoundError::EmptyCatalog));
    }

    #[test]
    fn start_eventually_picks_every_character() {
        let catalog = Catalog::builtin().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let picked: HashSet<String> = (0..500)
            .map(|_| {
                Round::start_with_rng(&catalog, &mut rng)
                    .unwrap()
                    .secret()
                    .name()
                    .to_string()
            })
            .collect();
        assert_eq!(picked.len(), catalog.len());
    }

    #[test]
    fn progress_follows_penalty_schedule() {
        let mut round = kratos();
        let mut seen = vec![];
        for _ in 0..5 {
            round.ask_attribute("volar").unwrap();
            seen.push(round.progress());
        }
        assert_eq!(seen, vec![90, 80, 65, 45, 20]);

        round.ask_attribute("volar").unwrap();
        assert_eq!(round.progress(), 20);
    }

    #[test]
    fn each_question_costs_score() {
        let mut round = kratos();
        let outcome = round.ask_attribute("barba").unwrap();

        assert_eq!(
            outcome,
            AskOutcome {
                matches: true,
                attempts_used: 1,
                remaining: 5
            }
        );
        assert_eq!(round.score(), 1900);
    }

    #[test]
    fn tag_match_is_exact() {
        let mut round = kratos();
        assert!(round.ask_attribute("heroe").unwrap().matches);
        assert!(!round.ask_attribute("Heroe").unwrap().matches);
        assert!(!round.ask_attribute("villano").unwrap().matches);
    }

    #[test]
    fn repeated_question_still_costs_an_attempt() {
        let mut round = kratos();
        round.ask_attribute("barba").unwrap();
        round.ask_attribute("barba").unwrap();
        assert_eq!(round.attempts(), 2);
        assert_eq!(round.score(), 1800);
    }

    #[test]
    fn sixth_question_exhausts_round() {
        let mut round = kratos();
        for i in 1..=6 {
            let outcome = round.ask_attribute("barba").unwrap();
            assert_eq!(outcome.attempts_used, i);
            assert_eq!(outcome.remaining, 6 - i);
        }
        assert_eq!(round.phase(), RoundPhase::Exhausted);
        assert!(round.is_terminal());
        assert_eq!(round.score(), 1400);

        let before = (round.attempts(), round.score(), round.progress());
        assert_matches!(
            round.ask_attribute("barba"),
            Err(RoundError::RoundOver(RoundPhase::Exhausted))
        );
        assert_eq!(before, (round.attempts(), round.score(), round.progress()));
    }

    #[test]
    fn counters_stay_in_bounds() {
        let mut round = kratos();
        while !round.is_terminal() {
            round.ask_attribute("x").unwrap();
            assert!(round.score() <= INITIAL_SCORE);
            assert!(round.attempts() <= MAX_ATTEMPTS);
        }
        assert_eq!(round.attempts(), MAX_ATTEMPTS);
    }

    #[test]
    fn blank_guess_changes_nothing() {
        let mut round = kratos();
        round.ask_attribute("barba").unwrap();

        assert_eq!(round.submit_guess("").unwrap(), GuessResult::Empty);
        assert_eq!(round.submit_guess("   \t").unwrap(), GuessResult::Empty);
        assert_eq!(round.phase(), RoundPhase::Active);
        assert_eq!(round.attempts(), 1);
        assert_eq!(round.score(), 1900);
    }

    #[test]
    fn guess_ignores_case_and_padding() {
        let mut round = kratos();
        assert_eq!(round.submit_guess(" Kratos ").unwrap(), GuessResult::Correct);
        assert_eq!(round.phase(), RoundPhase::Won);
        assert_matches!(round.submit_guess("kratos"), Err(RoundError::RoundOver(RoundPhase::Won)));
        assert_matches!(round.ask_attribute("barba"), Err(RoundError::RoundOver(RoundPhase::Won)));
    }

    #[test]
    fn wrong_guess_keeps_round_open() {
        let mut round = kratos();
        assert_eq!(round.submit_guess("bob").unwrap(), GuessResult::Incorrect);
        assert_eq!(round.phase(), RoundPhase::Active);
        assert_eq!(round.score(), 2000);
    }

    #[test]
    fn final_guess_only_when_exhausted() {
        let mut round = kratos();
        assert_matches!(
            round.forced_final_guess("kratos"),
            Err(RoundError::FinalGuessNotDue(RoundPhase::Active))
        );

        for _ in 0..MAX_ATTEMPTS {
            round.ask_attribute("barba").unwrap();
        }
        assert_matches!(round.submit_guess("kratos"), Err(RoundError::RoundOver(_)));

        assert_eq!(round.forced_final_guess(" ").unwrap(), GuessResult::Empty);
        assert_eq!(round.phase(), RoundPhase::Exhausted);

        assert_eq!(round.forced_final_guess("KRATOS").unwrap(), GuessResult::Correct);
        assert_eq!(round.phase(), RoundPhase::Ended);
        assert!(round.is_terminal());
        assert_matches!(
            round.forced_final_guess("kratos"),
            Err(RoundError::FinalGuessNotDue(RoundPhase::Ended))
        );
    }

    #[test]
    fn wrong_final_guess_ends_round() {
        let mut round = kratos();
        for _ in 0..MAX_ATTEMPTS {
            round.ask_attribute("heroe").unwrap();
        }
        assert_eq!(round.forced_final_guess("dracula").unwrap(), GuessResult::Incorrect);
        assert_eq!(round.phase(), RoundPhase::Ended);
        assert_eq!(round.score(), 1400);
    }
}
