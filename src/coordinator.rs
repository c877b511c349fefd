//! Ties sessions to the player profile.
//!
//! The coordinator is the only owner of the profile. It holds at most one
//! session, routes events to it, settles the economy when the session
//! completes and persists after every mutation.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::{ProfileStore, QuestionBank};
use crate::models::{AchievementId, Category, NicknameError, PlayerProfile};
use crate::rules;
use crate::session::{HintKind, QuizSession, Rejection, SessionConfig, SessionOutcome, Transition};

/// Coins credited on every completion, on top of the score.
pub const COMPLETION_BONUS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RoundError {
    #[error("no questions available for {0}")]
    NoQuestions(Category),
}

/// What a started round looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundInfo {
    pub category: Category,
    pub questions: usize,
    pub requested: usize,
}

/// Everything credited when a session completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReport {
    pub outcome: SessionOutcome,
    /// Score plus the completion bonus.
    pub round_coins: u32,
    /// Newly unlocked achievements with the reward paid for each.
    pub unlocked: Vec<(AchievementId, u32)>,
}

impl CompletionReport {
    pub fn total_coins(&self) -> u32 {
        self.round_coins
            .saturating_add(self.unlocked.iter().map(|(_, reward)| *reward).sum())
    }
}

pub struct SessionCoordinator<S> {
    bank: QuestionBank,
    store: S,
    config: SessionConfig,
    profile: PlayerProfile,
    session: Option<QuizSession>,
    last_report: Option<CompletionReport>,
    rng: StdRng,
}

impl<S: ProfileStore> SessionCoordinator<S> {
    /// Loads the profile from `store`.
    pub fn new(bank: QuestionBank, store: S, config: SessionConfig) -> Self {
        Self::with_rng(bank, store, config, StdRng::from_os_rng())
    }

    pub fn with_rng(bank: QuestionBank, store: S, config: SessionConfig, rng: StdRng) -> Self {
        let profile = store.load();
        Self {
            bank,
            store,
            config: config.normalized(),
            profile,
            session: None,
            last_report: None,
            rng,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    /// The current or most recently completed session.
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn has_active_session(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.is_completed())
    }

    pub fn last_report(&self) -> Option<&CompletionReport> {
        self.last_report.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Replaces any session with a fresh round of `category`.
    pub fn start_round(&mut self, category: Category) -> Result<RoundInfo, RoundError> {
        if self.bank.count_for(category) == 0 {
            tracing::warn!("cannot start a {category} round: no questions");
            return Err(RoundError::NoQuestions(category));
        }

        self.abandon_active("a new round started");

        let session = QuizSession::start(category, &self.bank, self.config, &mut self.rng);
        let info = RoundInfo {
            category,
            questions: session.question_count(),
            requested: self.config.round_size,
        };
        tracing::info!(
            "round started: {category}, {} of {} questions",
            info.questions,
            info.requested
        );

        self.session = Some(session);
        self.last_report = None;
        Ok(info)
    }

    /// Drops the running round without settling it. Pending ticks for it
    /// become no-ops.
    pub fn abandon_round(&mut self) {
        if self.has_active_session() {
            self.abandon_active("player left the round");
            self.session = None;
        }
    }

    pub fn answer(&mut self, option_index: usize) -> Transition {
        let transition = match self.session.as_mut() {
            Some(session) => session.answer(option_index),
            None => return Self::no_session("answer"),
        };
        self.settle(transition, "answer")
    }

    pub fn tick(&mut self) -> Transition {
        let transition = match self.session.as_mut() {
            Some(session) => session.tick(),
            None => return Self::no_session("tick"),
        };
        self.settle(transition, "tick")
    }

    pub fn use_hint(&mut self, kind: HintKind) -> Transition {
        let Some(session) = self.session.as_mut() else {
            return Self::no_session("hint");
        };

        let transition = session.use_hint(kind, &mut self.profile, &mut self.rng);
        if !transition.is_ignored() {
            tracing::info!("{} hint bought for {} coins", kind.label(), kind.cost());
            if transition.outcome().is_none() {
                self.store.save(&self.profile);
            }
        }
        // A completing skip persists the debit together with the rewards.
        self.settle(transition, "hint")
    }

    /// Replaces the profile with a fresh default and persists it.
    ///
    /// Any running session is abandoned.
    pub fn reset_progress(&mut self) {
        self.abandon_active("progress reset");
        self.session = None;
        self.last_report = None;
        self.profile = PlayerProfile::default();
        self.store.save(&self.profile);
        tracing::info!("player progress reset");
    }

    pub fn rename(&mut self, nickname: &str) -> Result<(), NicknameError> {
        self.profile.set_nickname(nickname)?;
        self.store.save(&self.profile);
        tracing::info!("nickname changed to {}", self.profile.nickname);
        Ok(())
    }

    fn settle(&mut self, transition: Transition, event: &str) -> Transition {
        match &transition {
            Transition::Ignored(reason) => tracing::warn!("{event} ignored: {reason}"),
            Transition::Advanced => {}
            Transition::Completed(outcome) => {
                let report = self.complete(*outcome);
                self.last_report = Some(report);
            }
        }
        transition
    }

    fn complete(&mut self, outcome: SessionOutcome) -> CompletionReport {
        let round_coins = outcome.score.saturating_add(COMPLETION_BONUS);
        self.profile.credit(round_coins);
        self.profile.increment_completed();
        self.profile.increment_category(outcome.category);

        let mut unlocked = Vec::new();
        for id in rules::evaluate(&self.profile, &outcome) {
            if self.profile.unlock(id) {
                let reward = id.reward();
                self.profile.credit(reward);
                tracing::info!("achievement unlocked: {} (+{reward} coins)", id.title());
                unlocked.push((id, reward));
            }
        }

        self.store.save(&self.profile);

        tracing::info!(
            "round finished ({:?}): score={}, mistakes={}, remaining={}s, coins now {}",
            outcome.reason,
            outcome.score,
            outcome.mistakes,
            outcome.remaining_secs,
            self.profile.coins()
        );

        CompletionReport {
            outcome,
            round_coins,
            unlocked,
        }
    }

    fn abandon_active(&self, why: &str) {
        if let Some(session) = self.session.as_ref().filter(|s| !s.is_completed()) {
            tracing::info!(
                "abandoning {} round at question {}: {why}",
                session.category(),
                session.current_index() + 1
            );
        }
    }

    fn no_session(event: &str) -> Transition {
        tracing::warn!("{event} ignored: no round in progress");
        Transition::Ignored(Rejection::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemoryStore;
    use crate::models::{Difficulty, Question};
    use crate::session::CompletionReason;

    fn question(id: u32, category: Category, difficulty: Difficulty) -> Question {
        Question {
            id,
            text: format!("Question {id}"),
            options: vec!["Right".into(), "Wrong 1".into(), "Wrong 2".into(), "Wrong 3".into()],
            correct_option_index: 0,
            category,
            difficulty,
        }
    }

    /// Ten animal questions (easy x5, medium x3, hard x2) and three plant ones.
    fn bank() -> QuestionBank {
        let mut questions = Vec::new();
        for id in 1..=10 {
            let difficulty = match id {
                1..=5 => Difficulty::Easy,
                6..=8 => Difficulty::Medium,
                _ => Difficulty::Hard,
            };
            questions.push(question(id, Category::Animals, difficulty));
        }
        for id in 11..=13 {
            questions.push(question(id, Category::Plants, Difficulty::Easy));
        }
        QuestionBank::new(questions).unwrap()
    }

    fn coordinator_with(profile: PlayerProfile) -> SessionCoordinator<MemoryStore> {
        SessionCoordinator::with_rng(
            bank(),
            MemoryStore::with_profile(profile),
            SessionConfig::default(),
            StdRng::seed_from_u64(42),
        )
    }

    fn coordinator() -> SessionCoordinator<MemoryStore> {
        coordinator_with(PlayerProfile::default())
    }

    fn answer_all_correct(coordinator: &mut SessionCoordinator<MemoryStore>) -> Transition {
        loop {
            let transition = coordinator.answer(0);
            if !matches!(transition, Transition::Advanced) {
                return transition;
            }
        }
    }

    #[test]
    fn test_perfect_first_round_settles_economy() {
        let mut coordinator = coordinator();
        let info = coordinator.start_round(Category::Animals).unwrap();
        assert_eq!(info.questions, 10);

        // Spend 21 seconds so the speed achievement stays locked.
        for _ in 0..21 {
            coordinator.tick();
        }
        let transition = answer_all_correct(&mut coordinator);
        let outcome = transition.outcome().unwrap();
        assert_eq!(outcome.score, 135);
        assert_eq!(outcome.remaining_secs, 14);

        let report = coordinator.last_report().unwrap().clone();
        assert_eq!(report.round_coins, 185);
        assert!(report.unlocked.contains(&(AchievementId::FirstQuiz, 100)));
        assert_eq!(
            report.unlocked,
            vec![
                (AchievementId::FirstQuiz, 100),
                (AchievementId::AnimalLover, 200),
                (AchievementId::PerfectScore, 500),
            ]
        );

        let profile = coordinator.profile();
        assert_eq!(profile.coins(), 185 + 100 + 200 + 500);
        assert_eq!(profile.coins(), report.total_coins());
        assert_eq!(profile.completed_quiz_count(), 1);
        assert_eq!(profile.category_count(Category::Animals), 1);
        assert_eq!(coordinator.store().save_count(), 1);
        assert_eq!(coordinator.store().saved().unwrap(), *profile);
    }

    #[test]
    fn test_achievements_are_not_granted_twice() {
        let mut coordinator = coordinator();
        coordinator.start_round(Category::Plants).unwrap();
        answer_all_correct(&mut coordinator);
        let after_first = coordinator.profile().coins();

        coordinator.start_round(Category::Plants).unwrap();
        answer_all_correct(&mut coordinator);

        // Speed and accuracy hold again, but both are already unlocked.
        let report = coordinator.last_report().unwrap();
        assert!(report.unlocked.is_empty());
        assert_eq!(coordinator.profile().coins(), after_first + 30 + COMPLETION_BONUS);
    }

    #[test]
    fn test_mistake_limit_on_fourth_answer() {
        let mut coordinator = coordinator();
        coordinator.start_round(Category::Animals).unwrap();

        assert_eq!(coordinator.answer(0), Transition::Advanced);
        assert_eq!(coordinator.answer(1), Transition::Advanced);
        assert_eq!(coordinator.answer(1), Transition::Advanced);
        let outcome = *coordinator.answer(1).outcome().unwrap();

        assert_eq!(outcome.reason, CompletionReason::MistakeLimit);
        assert_eq!(outcome.answered, 4);
        let session = coordinator.session().unwrap();
        assert!(session.is_completed());
        assert_eq!(session.current_index(), 3);
        assert!(coordinator.answer(0).is_ignored());
        assert_eq!(coordinator.profile().completed_quiz_count(), 1);
    }

    #[test]
    fn test_hint_scenario_with_25_coins() {
        let mut profile = PlayerProfile::default();
        profile.credit(25);
        let mut coordinator = coordinator_with(profile);
        coordinator.start_round(Category::Animals).unwrap();

        assert_eq!(coordinator.use_hint(HintKind::FiftyFifty), Transition::Advanced);
        assert_eq!(coordinator.profile().coins(), 5);
        assert_eq!(coordinator.session().unwrap().disabled_options().len(), 2);
        assert_eq!(coordinator.store().saved().unwrap().coins(), 5);

        let transition = coordinator.use_hint(HintKind::Highlight);
        assert!(matches!(
            transition,
            Transition::Ignored(Rejection::InsufficientFunds { cost: 40, balance: 5, .. })
        ));
        assert_eq!(coordinator.profile().coins(), 5);
        assert!(!coordinator.session().unwrap().reveals_correct());
        assert_eq!(coordinator.store().save_count(), 1);
    }

    #[test]
    fn test_timeout_completes_through_ticks() {
        let mut coordinator = coordinator();
        coordinator.start_round(Category::Animals).unwrap();

        let mut last = Transition::Advanced;
        for _ in 0..35 {
            last = coordinator.tick();
        }
        let outcome = last.outcome().unwrap();
        assert_eq!(outcome.reason, CompletionReason::Timeout);
        assert_eq!(outcome.score, 0);

        // Zero mistakes counts as perfect even when nothing was answered.
        let report = coordinator.last_report().unwrap();
        assert!(report.unlocked.contains(&(AchievementId::PerfectScore, 500)));
        assert!(!report.unlocked.iter().any(|(id, _)| *id == AchievementId::Speedster));
        assert!(coordinator.tick().is_ignored());
    }

    #[test]
    fn test_events_without_round_are_ignored() {
        let mut coordinator = coordinator();
        assert!(coordinator.answer(0).is_ignored());
        assert!(coordinator.tick().is_ignored());
        assert!(coordinator.use_hint(HintKind::Skip).is_ignored());
        assert_eq!(coordinator.store().save_count(), 0);
    }

    #[test]
    fn test_empty_category_cannot_start() {
        let mut coordinator = coordinator();
        assert_eq!(
            coordinator.start_round(Category::Birds),
            Err(RoundError::NoQuestions(Category::Birds))
        );
        assert!(coordinator.session().is_none());
    }

    #[test]
    fn test_short_category_reports_actual_size() {
        let mut coordinator = coordinator();
        let info = coordinator.start_round(Category::Plants).unwrap();
        assert_eq!(info.questions, 3);
        assert_eq!(info.requested, 10);
    }

    #[test]
    fn test_new_round_replaces_running_one_without_reward() {
        let mut coordinator = coordinator();
        coordinator.start_round(Category::Animals).unwrap();
        coordinator.answer(0);

        coordinator.start_round(Category::Plants).unwrap();
        let session = coordinator.session().unwrap();
        assert_eq!(session.category(), Category::Plants);
        assert_eq!(session.current_index(), 0);
        assert_eq!(coordinator.profile().completed_quiz_count(), 0);
        assert_eq!(coordinator.profile().coins(), 0);
    }

    #[test]
    fn test_abandon_round_cancels_ticks() {
        let mut coordinator = coordinator();
        coordinator.start_round(Category::Animals).unwrap();
        coordinator.abandon_round();

        assert!(coordinator.session().is_none());
        assert!(coordinator.tick().is_ignored());
        assert_eq!(coordinator.store().save_count(), 0);
    }

    #[test]
    fn test_reset_progress_persists_default() {
        let mut coordinator = coordinator();
        coordinator.start_round(Category::Plants).unwrap();
        answer_all_correct(&mut coordinator);
        assert!(coordinator.profile().coins() > 0);

        coordinator.start_round(Category::Animals).unwrap();
        coordinator.reset_progress();

        assert_eq!(*coordinator.profile(), PlayerProfile::default());
        assert_eq!(coordinator.store().saved().unwrap(), PlayerProfile::default());
        assert!(coordinator.session().is_none());
        assert!(coordinator.last_report().is_none());
    }

    #[test]
    fn test_rename_validates_and_persists() {
        let mut coordinator = coordinator();
        assert_eq!(coordinator.rename("ab"), Err(NicknameError::TooShort));
        assert_eq!(coordinator.store().save_count(), 0);

        coordinator.rename(" Otter ").unwrap();
        assert_eq!(coordinator.store().saved().unwrap().nickname, "Otter");
    }

    fn coordinator_with_config(config: SessionConfig) -> SessionCoordinator<MemoryStore> {
        SessionCoordinator::with_rng(
            bank(),
            MemoryStore::new(),
            config,
            StdRng::seed_from_u64(42),
        )
    }

    #[test]
    fn test_zero_round_size_still_plays_one_question() {
        let mut coordinator = coordinator_with_config(SessionConfig {
            round_size: 0,
            ..SessionConfig::default()
        });
        let info = coordinator.start_round(Category::Animals).unwrap();
        assert_eq!(info.questions, 1);
        assert_eq!(info.requested, 1);
        assert!(coordinator.has_active_session());

        let outcome = *coordinator.answer(0).outcome().unwrap();
        assert_eq!(outcome.reason, CompletionReason::Exhausted);
        assert!(coordinator.last_report().is_some());
        assert_eq!(coordinator.profile().completed_quiz_count(), 1);
        assert_eq!(coordinator.store().save_count(), 1);
    }

    #[test]
    fn test_zero_max_mistakes_ends_on_first_mistake() {
        let mut coordinator = coordinator_with_config(SessionConfig {
            max_mistakes: 0,
            ..SessionConfig::default()
        });
        assert_eq!(coordinator.config().max_mistakes, 1);
        coordinator.start_round(Category::Animals).unwrap();

        let outcome = *coordinator.answer(1).outcome().unwrap();
        assert_eq!(outcome.reason, CompletionReason::MistakeLimit);
        assert_eq!(outcome.mistakes, 1);
        let session = coordinator.session().unwrap();
        assert!(session.mistakes() <= session.max_mistakes());
    }

    #[test]
    fn test_loads_existing_profile() {
        let mut profile = PlayerProfile::default();
        profile.credit(70);
        let coordinator = coordinator_with(profile);
        assert_eq!(coordinator.profile().coins(), 70);
    }
}
