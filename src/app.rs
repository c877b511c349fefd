use crate::coordinator::{RoundError, SessionCoordinator};
use crate::data::ProfileStore;
use crate::models::{Category, CATALOG};
use crate::session::{HintKind, Rejection, Transition};

/// Which screen the terminal front end shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Quiz,
    Result,
    Achievements,
}

/// Presentation state around a [`SessionCoordinator`].
///
/// Holds only what the screens need (cursor positions, a status line) and
/// forwards every game action to the coordinator.
pub struct App<S> {
    pub screen: Screen,
    coordinator: SessionCoordinator<S>,
    selected_category: usize,
    selected_option: usize,
    achievements_scroll: usize,
    reset_armed: bool,
    notice: Option<String>,
    timer_restart: bool,
}

impl<S: ProfileStore> App<S> {
    pub fn new(coordinator: SessionCoordinator<S>) -> Self {
        Self {
            screen: Screen::Menu,
            coordinator,
            selected_category: 0,
            selected_option: 0,
            achievements_scroll: 0,
            reset_armed: false,
            notice: None,
            timer_restart: false,
        }
    }

    pub fn coordinator(&self) -> &SessionCoordinator<S> {
        &self.coordinator
    }

    pub fn into_coordinator(self) -> SessionCoordinator<S> {
        self.coordinator
    }

    pub fn selected_category(&self) -> Category {
        Category::ALL[self.selected_category]
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn achievements_scroll(&self) -> usize {
        self.achievements_scroll
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_reset_armed(&self) -> bool {
        self.reset_armed
    }

    /// True once after a round starts; the event loop restarts its ticker.
    pub fn take_timer_restart(&mut self) -> bool {
        std::mem::take(&mut self.timer_restart)
    }

    pub fn select_next_category(&mut self) {
        self.selected_category = (self.selected_category + 1) % Category::COUNT;
        self.reset_armed = false;
    }

    pub fn select_previous_category(&mut self) {
        self.selected_category = (self.selected_category + Category::COUNT - 1) % Category::COUNT;
        self.reset_armed = false;
    }

    pub fn start_selected_round(&mut self) {
        self.start_round(self.selected_category());
    }

    /// Starts another round of the category just played.
    pub fn replay(&mut self) {
        let category = self
            .coordinator
            .session()
            .map(|session| session.category())
            .unwrap_or_else(|| self.selected_category());
        self.start_round(category);
    }

    fn start_round(&mut self, category: Category) {
        self.reset_armed = false;
        match self.coordinator.start_round(category) {
            Ok(info) => {
                self.notice = (info.questions < info.requested).then(|| {
                    format!(
                        "Only {} {} questions available",
                        info.questions,
                        category.display_name().to_lowercase()
                    )
                });
                self.selected_option = 0;
                self.timer_restart = true;
                self.screen = Screen::Quiz;
            }
            Err(RoundError::NoQuestions(category)) => {
                self.notice = Some(format!("No questions for {category} yet"));
            }
        }
    }

    fn option_count(&self) -> usize {
        self.coordinator
            .session()
            .and_then(|session| session.current_question())
            .map_or(0, |question| question.options.len())
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + count - 1) % count;
        }
    }

    fn current_index(&self) -> Option<usize> {
        self.coordinator.session().map(|session| session.current_index())
    }

    pub fn submit_answer(&mut self) {
        let before = self.current_index();
        let transition = self.coordinator.answer(self.selected_option);
        self.follow(transition, before);
    }

    pub fn use_hint(&mut self, kind: HintKind) {
        let before = self.current_index();
        let transition = self.coordinator.use_hint(kind);
        if let Transition::Ignored(Rejection::InsufficientFunds { cost, balance, .. }) = transition
        {
            self.notice = Some(format!(
                "{} costs {cost} coins, you have {balance}",
                kind.label()
            ));
        }
        self.follow(transition, before);
    }

    pub fn on_tick(&mut self) {
        if self.screen != Screen::Quiz || !self.coordinator.has_active_session() {
            return;
        }
        let before = self.current_index();
        let transition = self.coordinator.tick();
        self.follow(transition, before);
    }

    fn follow(&mut self, transition: Transition, index_before: Option<usize>) {
        match transition {
            Transition::Ignored(_) => {}
            Transition::Advanced => {
                if self.current_index() != index_before {
                    self.selected_option = 0;
                    self.notice = None;
                }
            }
            Transition::Completed(_) => {
                self.selected_option = 0;
                self.screen = Screen::Result;
            }
        }
    }

    /// Leaves a running round; it is dropped without reward.
    pub fn leave_round(&mut self) {
        self.coordinator.abandon_round();
        self.back_to_menu();
    }

    pub fn back_to_menu(&mut self) {
        self.screen = Screen::Menu;
        self.notice = None;
        self.reset_armed = false;
    }

    pub fn show_achievements(&mut self) {
        self.achievements_scroll = 0;
        self.reset_armed = false;
        self.screen = Screen::Achievements;
    }

    /// Stops with the last catalog entry at the top.
    pub fn scroll_achievements_down(&mut self) {
        let last = CATALOG.len().saturating_sub(1);
        self.achievements_scroll = (self.achievements_scroll + 1).min(last);
    }

    pub fn scroll_achievements_up(&mut self) {
        self.achievements_scroll = self.achievements_scroll.saturating_sub(1);
    }

    /// First call asks for confirmation, the second one wipes progress.
    pub fn request_reset(&mut self) {
        if self.reset_armed {
            self.coordinator.reset_progress();
            self.reset_armed = false;
            self.notice = Some("Progress reset".to_string());
        } else {
            self.reset_armed = true;
            self.notice = Some(
                "Press R again to erase all coins and achievements. This cannot be undone."
                    .to_string(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::data::{MemoryStore, QuestionBank};
    use crate::models::{Difficulty, PlayerProfile, Question};
    use crate::session::SessionConfig;

    fn app_with_coins(coins: u32) -> App<MemoryStore> {
        let questions = (1..=3)
            .map(|id| Question {
                id,
                text: format!("Question {id}"),
                options: vec!["Right".into(), "Wrong".into(), "Also wrong".into()],
                correct_option_index: 0,
                category: Category::Animals,
                difficulty: Difficulty::Easy,
            })
            .collect();
        let mut profile = PlayerProfile::default();
        profile.credit(coins);
        let coordinator = SessionCoordinator::with_rng(
            QuestionBank::new(questions).unwrap(),
            MemoryStore::with_profile(profile),
            SessionConfig::default(),
            StdRng::seed_from_u64(1),
        );
        App::new(coordinator)
    }

    #[test]
    fn test_round_flow_reaches_result_screen() {
        let mut app = app_with_coins(0);
        app.start_selected_round();
        assert_eq!(app.screen, Screen::Quiz);
        assert!(app.take_timer_restart());
        assert!(!app.take_timer_restart());
        assert!(app.notice().unwrap().contains("Only 3"));

        app.select_next_option();
        app.select_next_option();
        app.select_next_option();
        assert_eq!(app.selected_option(), 0);

        for _ in 0..3 {
            app.submit_answer();
        }
        assert_eq!(app.screen, Screen::Result);
        assert_eq!(app.coordinator().profile().completed_quiz_count(), 1);
    }

    #[test]
    fn test_empty_category_stays_on_menu() {
        let mut app = app_with_coins(0);
        app.select_previous_category();
        assert_eq!(app.selected_category(), Category::Birds);

        app.start_selected_round();
        assert_eq!(app.screen, Screen::Menu);
        assert!(app.notice().unwrap().contains("Birds"));
    }

    #[test]
    fn test_ticks_only_reach_running_quiz() {
        let mut app = app_with_coins(0);
        app.on_tick();
        assert!(app.coordinator().session().is_none());

        app.start_selected_round();
        for _ in 0..35 {
            app.on_tick();
        }
        assert_eq!(app.screen, Screen::Result);
        assert_eq!(app.coordinator().session().unwrap().remaining_secs(), 0);
    }

    #[test]
    fn test_unaffordable_hint_sets_notice() {
        let mut app = app_with_coins(10);
        app.start_selected_round();
        app.use_hint(HintKind::Skip);

        assert_eq!(app.coordinator().session().unwrap().current_index(), 0);
        assert_eq!(app.notice(), Some("Skip costs 30 coins, you have 10"));
    }

    #[test]
    fn test_achievement_scroll_stays_within_catalog() {
        let mut app = app_with_coins(0);
        app.show_achievements();
        app.scroll_achievements_up();
        assert_eq!(app.achievements_scroll(), 0);

        for _ in 0..100 {
            app.scroll_achievements_down();
        }
        assert_eq!(app.achievements_scroll(), CATALOG.len() - 1);
    }

    #[test]
    fn test_reset_needs_confirmation() {
        let mut app = app_with_coins(300);
        app.request_reset();
        assert!(app.is_reset_armed());
        assert_eq!(app.coordinator().profile().coins(), 300);

        app.request_reset();
        assert!(!app.is_reset_armed());
        assert_eq!(app.coordinator().profile().coins(), 0);
    }
}
