mod achievement;
mod profile;
mod question;

pub use achievement::{Achievement, AchievementId, CATALOG};
pub use profile::{
    validate_nickname, AchievementState, CategoryCounts, NicknameError, PlayerProfile,
    DEFAULT_NICKNAME, NICKNAME_MAX_LENGTH, NICKNAME_MIN_LENGTH,
};
pub use question::{Category, Difficulty, Question};
