//! # nature-quiz
//!
//! A timed nature quiz with a coin and achievement economy.
//!
//! The game logic lives in plain, synchronous types:
//!
//! * [`QuestionBank`] holds the validated question catalog and draws rounds.
//! * [`QuizSession`] is the round state machine (answers, hints, countdown,
//!   mistake limit).
//! * [`rules::evaluate`] decides which achievements a finished round earns.
//! * [`SessionCoordinator`] owns the [`PlayerProfile`], settles coins and
//!   achievements when a round completes, and persists through a
//!   [`ProfileStore`].
//!
//! [`run`] drives all of that from the terminal.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nature_quiz::{
//!     App, Category, JsonFileStore, QuestionBank, SessionConfig, SessionCoordinator,
//! };
//!
//! # async fn demo() -> Result<(), nature_quiz::QuizError> {
//! let bank = QuestionBank::from_path("questions.json")?;
//! let store = JsonFileStore::new(JsonFileStore::default_path());
//! let mut coordinator = SessionCoordinator::new(bank, store, SessionConfig::default());
//!
//! coordinator.start_round(Category::Birds).expect("birds in the bank");
//! coordinator.answer(0);
//!
//! let mut app = App::new(coordinator);
//! nature_quiz::run(&mut app).await?;
//! # Ok(())
//! # }
//! ```

mod app;
pub mod coordinator;
mod data;
mod models;
pub mod rules;
pub mod session;
pub mod terminal;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures_util::StreamExt;
use tokio::time::{interval, MissedTickBehavior};

pub use app::{App, Screen};
pub use coordinator::{
    CompletionReport, RoundError, RoundInfo, SessionCoordinator, COMPLETION_BONUS,
};
pub use data::{
    parse_questions, read_questions, BackgroundStore, JsonFileStore, LoadError, MemoryStore,
    ProfileStore, QuestionBank, Round, StoreError, DEFAULT_QUESTIONS_PATH,
};
pub use models::{
    validate_nickname, Achievement, AchievementId, AchievementState, Category, CategoryCounts,
    Difficulty, NicknameError, PlayerProfile, Question, CATALOG,
};
pub use session::{
    CompletionReason, HintKind, QuizSession, Rejection, SessionConfig, SessionOutcome, Transition,
};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Error type for the terminal front end.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    /// Error loading questions from file.
    #[error("Failed to load questions: {0}")]
    Load(#[from] LoadError),
    /// IO error while driving the terminal.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Runs the quiz in the terminal until the player quits.
///
/// Takes over the terminal for the duration and restores it afterwards, even
/// when the event loop fails.
pub async fn run<S: ProfileStore>(app: &mut App<S>) -> Result<(), QuizError> {
    let mut term = terminal::init()?;
    let result = run_event_loop(&mut term, app).await;
    terminal::restore()?;
    result
}

async fn run_event_loop<S: ProfileStore>(
    terminal: &mut terminal::AppTerminal,
    app: &mut App<S>,
) -> Result<(), QuizError> {
    let mut events = EventStream::new();
    let mut ticker = interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        tokio::select! {
            _ = ticker.tick() => app.on_tick(),
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if handle_input(app, key.code) {
                        break;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => break,
            },
        }

        // A new round gets a full first second.
        if app.take_timer_restart() {
            ticker.reset();
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input<S: ProfileStore>(app: &mut App<S>, key: KeyCode) -> bool {
    match app.screen {
        Screen::Menu => handle_menu_input(app, key),
        Screen::Quiz => handle_quiz_input(app, key),
        Screen::Result => handle_result_input(app, key),
        Screen::Achievements => handle_achievements_input(app, key),
    }
}

fn handle_menu_input<S: ProfileStore>(app: &mut App<S>, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_category(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_category(),
        KeyCode::Enter => app.start_selected_round(),
        KeyCode::Char('a') => app.show_achievements(),
        KeyCode::Char('R') => app.request_reset(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}

fn handle_quiz_input<S: ProfileStore>(app: &mut App<S>, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.submit_answer(),
        KeyCode::Char('f') => app.use_hint(HintKind::FiftyFifty),
        KeyCode::Char('s') => app.use_hint(HintKind::Skip),
        KeyCode::Char('h') => app.use_hint(HintKind::Highlight),
        KeyCode::Esc => app.leave_round(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}

fn handle_result_input<S: ProfileStore>(app: &mut App<S>, key: KeyCode) -> bool {
    match key {
        KeyCode::Enter | KeyCode::Esc => app.back_to_menu(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.replay(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}

fn handle_achievements_input<S: ProfileStore>(app: &mut App<S>, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_achievements_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_achievements_up(),
        KeyCode::Esc | KeyCode::Enter => app.back_to_menu(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}
