use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use nature_quiz::{
    App, BackgroundStore, JsonFileStore, MemoryStore, ProfileStore, QuestionBank, SessionConfig,
    SessionCoordinator, DEFAULT_QUESTIONS_PATH,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file to load the questions from
    #[arg(short, long, default_value = DEFAULT_QUESTIONS_PATH)]
    questions: PathBuf,

    /// Where the player profile is stored (defaults to the user data directory)
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Keep progress in memory only
    #[arg(long, conflicts_with = "profile")]
    ephemeral: bool,

    /// Rename the player before starting
    #[arg(long)]
    nickname: Option<String>,

    /// Questions per round
    #[arg(long, default_value_t = SessionConfig::default().round_size)]
    round_size: usize,

    /// Seconds available for a whole round
    #[arg(long, default_value_t = SessionConfig::default().time_limit_secs)]
    time_limit: u32,

    /// Wrong answers that end a round
    #[arg(long, default_value_t = SessionConfig::default().max_mistakes)]
    max_mistakes: u32,

    /// Log file (the terminal belongs to the quiz)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.round_size, self.time_limit, self.max_mistakes)
    }

    fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            JsonFileStore::default_path().with_file_name("nature-quiz.log")
        })
    }
}

fn init_logging(args: &Args) -> Result<()> {
    let path = args.log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

/// Runs the quiz and hands the store back so pending saves can be flushed,
/// whether or not the run succeeded.
async fn play<S: ProfileStore>(args: &Args, bank: QuestionBank, store: S) -> (S, Result<()>) {
    let mut coordinator = SessionCoordinator::new(bank, store, args.session_config());

    if let Some(nickname) = &args.nickname {
        if let Err(err) = coordinator.rename(nickname) {
            let err = anyhow::Error::new(err).context(format!("Invalid nickname {nickname:?}"));
            return (coordinator.into_store(), Err(err));
        }
    }

    let mut app = App::new(coordinator);
    let result = nature_quiz::run(&mut app)
        .await
        .context("Error running quiz");

    (app.into_coordinator().into_store(), result)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let bank = QuestionBank::load_or_empty(&args.questions);
    if bank.is_empty() {
        eprintln!(
            "No questions could be loaded from {}, see the log for details.",
            args.questions.display()
        );
    }

    if args.ephemeral {
        let (_, result) = play(&args, bank, MemoryStore::new()).await;
        return result;
    }

    let profile_path = args.profile.clone().unwrap_or_else(JsonFileStore::default_path);
    tracing::info!("using profile {}", profile_path.display());

    let store = BackgroundStore::spawn(JsonFileStore::new(profile_path));
    let (store, result) = play(&args, bank, store).await;
    store.close().await;

    result
}
