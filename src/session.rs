//! The quiz session state machine.
//!
//! A session is created already running and moves only forward: the question
//! index, the mistake counter and the countdown all head toward completion.
//! Once completed it ignores every further event. There are no ambient
//! timers; the owner calls [`QuizSession::tick`] once per second and cancels
//! the countdown by dropping or replacing the session.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::QuestionBank;
use crate::models::{Category, PlayerProfile, Question};

pub const DEFAULT_ROUND_SIZE: usize = 10;
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 35;
pub const DEFAULT_MAX_MISTAKES: u32 = 3;

/// Tunables for a round. Zero values are raised to one wherever a session
/// is built, see [`SessionConfig::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub round_size: usize,
    pub time_limit_secs: u32,
    pub max_mistakes: u32,
}

impl SessionConfig {
    pub fn new(round_size: usize, time_limit_secs: u32, max_mistakes: u32) -> Self {
        Self {
            round_size,
            time_limit_secs,
            max_mistakes,
        }
        .normalized()
    }

    /// Every round holds at least one question, lasts at least one second
    /// and ends on at least one mistake.
    pub fn normalized(self) -> Self {
        Self {
            round_size: self.round_size.max(1),
            time_limit_secs: self.time_limit_secs.max(1),
            max_mistakes: self.max_mistakes.max(1),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            round_size: DEFAULT_ROUND_SIZE,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            max_mistakes: DEFAULT_MAX_MISTAKES,
        }
    }
}

/// Coin-costed help for the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HintKind {
    /// Move on without answering and without scoring.
    Skip,
    /// Disable two incorrect options.
    FiftyFifty,
    /// Reveal the correct option.
    Highlight,
}

impl HintKind {
    pub const ALL: [HintKind; 3] = [HintKind::FiftyFifty, HintKind::Skip, HintKind::Highlight];

    pub fn cost(self) -> u32 {
        match self {
            HintKind::Skip => 30,
            HintKind::FiftyFifty => 20,
            HintKind::Highlight => 40,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HintKind::Skip => "Skip",
            HintKind::FiftyFifty => "50/50",
            HintKind::Highlight => "Highlight",
        }
    }
}

/// Which path ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    /// Every question was answered or skipped.
    Exhausted,
    /// The mistake limit was reached.
    MistakeLimit,
    /// The countdown reached zero.
    Timeout,
}

/// Final figures of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    pub category: Category,
    pub score: u32,
    pub mistakes: u32,
    pub remaining_secs: u32,
    /// Questions answered or skipped.
    pub answered: usize,
    pub round_size: usize,
    pub reason: CompletionReason,
}

/// Why an event left the session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("session is already completed")]
    Completed,
    #[error("option {0} is disabled")]
    OptionDisabled(usize),
    #[error("option {index} does not exist, question has {count} options")]
    OptionOutOfRange { index: usize, count: usize },
    #[error("{kind:?} costs {cost} coins but only {balance} are available")]
    InsufficientFunds {
        kind: HintKind,
        cost: u32,
        balance: u32,
    },
}

/// Result of feeding an event to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed.
    Ignored(Rejection),
    /// State changed and the session is still running.
    Advanced,
    /// This event completed the session.
    Completed(SessionOutcome),
}

impl Transition {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Transition::Ignored(_))
    }

    pub fn outcome(&self) -> Option<&SessionOutcome> {
        match self {
            Transition::Completed(outcome) => Some(outcome),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    category: Category,
    questions: Vec<Question>,
    current_index: usize,
    score: u32,
    mistakes: u32,
    max_mistakes: u32,
    remaining_secs: u32,
    disabled_options: BTreeSet<usize>,
    reveal_correct: bool,
    completion: Option<CompletionReason>,
}

impl QuizSession {
    /// Draws a round from `bank` and starts the countdown.
    pub fn start<R: Rng + ?Sized>(
        category: Category,
        bank: &QuestionBank,
        config: SessionConfig,
        rng: &mut R,
    ) -> Self {
        let round = bank.draw_round(category, config.round_size, rng);
        Self::with_questions(category, round.questions, config)
    }

    /// Starts a session over an already selected round, in the given order.
    ///
    /// An empty round is completed on construction.
    pub fn with_questions(
        category: Category,
        questions: Vec<Question>,
        config: SessionConfig,
    ) -> Self {
        let config = config.normalized();
        let completion = questions.is_empty().then_some(CompletionReason::Exhausted);

        tracing::debug!(
            "session started: category={category}, questions={}, time={}s",
            questions.len(),
            config.time_limit_secs
        );

        Self {
            category,
            questions,
            current_index: 0,
            score: 0,
            mistakes: 0,
            max_mistakes: config.max_mistakes,
            remaining_secs: config.time_limit_secs,
            disabled_options: BTreeSet::new(),
            reveal_correct: false,
            completion,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question awaiting an answer, if the session is still running.
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_completed() {
            return None;
        }
        self.questions.get(self.current_index)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn max_mistakes(&self) -> u32 {
        self.max_mistakes
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn disabled_options(&self) -> &BTreeSet<usize> {
        &self.disabled_options
    }

    pub fn is_option_disabled(&self, index: usize) -> bool {
        self.disabled_options.contains(&index)
    }

    /// Whether the highlight hint is active for the current question.
    pub fn reveals_correct(&self) -> bool {
        self.reveal_correct
    }

    pub fn is_completed(&self) -> bool {
        self.completion.is_some()
    }

    pub fn completion_reason(&self) -> Option<CompletionReason> {
        self.completion
    }

    /// The final figures, once completed.
    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.completion.map(|reason| self.outcome_for(reason))
    }

    fn outcome_for(&self, reason: CompletionReason) -> SessionOutcome {
        SessionOutcome {
            category: self.category,
            score: self.score,
            mistakes: self.mistakes,
            remaining_secs: self.remaining_secs,
            answered: self.answered(reason),
            round_size: self.questions.len(),
            reason,
        }
    }

    fn answered(&self, reason: CompletionReason) -> usize {
        match reason {
            // The exhausted path never moves the index past the last question.
            CompletionReason::Exhausted => self.questions.len(),
            // A wrong answer that hits the limit is still an answered question.
            CompletionReason::MistakeLimit => self.current_index + 1,
            CompletionReason::Timeout => self.current_index,
        }
    }

    /// One second of the countdown.
    pub fn tick(&mut self) -> Transition {
        if self.is_completed() {
            return Transition::Ignored(Rejection::Completed);
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            tracing::debug!("session timed out at question {}", self.current_index + 1);
            return self.complete(CompletionReason::Timeout);
        }

        Transition::Advanced
    }

    pub fn answer(&mut self, option_index: usize) -> Transition {
        let Some(question) = self.current_question() else {
            return Transition::Ignored(Rejection::Completed);
        };

        let count = question.options.len();
        let correct = question.is_correct(option_index);
        let reward = question.difficulty.reward();

        if option_index >= count {
            return Transition::Ignored(Rejection::OptionOutOfRange {
                index: option_index,
                count,
            });
        }
        if self.is_option_disabled(option_index) {
            return Transition::Ignored(Rejection::OptionDisabled(option_index));
        }

        if correct {
            self.score += reward;
        } else {
            self.mistakes += 1;
            if self.mistakes >= self.max_mistakes {
                tracing::debug!("mistake limit reached at question {}", self.current_index + 1);
                return self.complete(CompletionReason::MistakeLimit);
            }
        }

        self.advance()
    }

    /// Buys and applies a hint, paying from `wallet`.
    ///
    /// The cost is debited before the effect is applied; when the wallet
    /// cannot cover it nothing happens.
    pub fn use_hint<R: Rng + ?Sized>(
        &mut self,
        kind: HintKind,
        wallet: &mut PlayerProfile,
        rng: &mut R,
    ) -> Transition {
        if self.current_question().is_none() {
            return Transition::Ignored(Rejection::Completed);
        }

        let cost = kind.cost();
        if !wallet.debit(cost) {
            return Transition::Ignored(Rejection::InsufficientFunds {
                kind,
                cost,
                balance: wallet.coins(),
            });
        }

        match kind {
            HintKind::Skip => self.advance(),
            HintKind::FiftyFifty => {
                self.disable_incorrect_options(rng);
                Transition::Advanced
            }
            HintKind::Highlight => {
                self.reveal_correct = true;
                Transition::Advanced
            }
        }
    }

    fn disable_incorrect_options<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let Some(question) = self.questions.get(self.current_index) else {
            return;
        };

        let mut incorrect: Vec<usize> = (0..question.options.len())
            .filter(|index| !question.is_correct(*index))
            .collect();
        incorrect.shuffle(rng);
        incorrect.truncate(2);

        self.disabled_options = incorrect.into_iter().collect();
    }

    fn advance(&mut self) -> Transition {
        if self.current_index + 1 >= self.questions.len() {
            return self.complete(CompletionReason::Exhausted);
        }

        self.current_index += 1;
        self.disabled_options.clear();
        self.reveal_correct = false;
        Transition::Advanced
    }

    fn complete(&mut self, reason: CompletionReason) -> Transition {
        self.completion = Some(reason);
        Transition::Completed(self.outcome_for(reason))
    }
}
