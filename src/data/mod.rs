mod bank;
mod loader;
mod store;

pub use bank::{QuestionBank, Round};
pub use loader::{parse_questions, read_questions, LoadError, DEFAULT_QUESTIONS_PATH};
pub use store::{BackgroundStore, JsonFileStore, MemoryStore, ProfileStore, StoreError};
