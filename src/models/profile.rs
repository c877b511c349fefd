//! Persisted player state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::achievement::AchievementId;
use super::question::Category;

/// Nickname validation constants.
pub const NICKNAME_MIN_LENGTH: usize = 3;
pub const NICKNAME_MAX_LENGTH: usize = 16;

pub const DEFAULT_NICKNAME: &str = "Player";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NicknameError {
    #[error("Nickname must be at least 3 characters")]
    TooShort,
    #[error("Nickname must be at most 16 characters")]
    TooLong,
}

/// Validates a nickname after trimming surrounding whitespace.
pub fn validate_nickname(nickname: &str) -> Result<&str, NicknameError> {
    let trimmed = nickname.trim();
    let length = trimmed.chars().count();

    if length < NICKNAME_MIN_LENGTH {
        return Err(NicknameError::TooShort);
    }

    if length > NICKNAME_MAX_LENGTH {
        return Err(NicknameError::TooLong);
    }

    Ok(trimmed)
}

/// Completed-quiz counters keyed by category.
///
/// Persisted as a `category -> count` map; categories missing from the stored
/// map read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Category, u32>", into = "BTreeMap<Category, u32>")]
pub struct CategoryCounts([u32; Category::COUNT]);

impl CategoryCounts {
    pub fn get(&self, category: Category) -> u32 {
        self.0[category.index()]
    }

    fn increment(&mut self, category: Category) -> u32 {
        let slot = &mut self.0[category.index()];
        *slot = slot.saturating_add(1);
        *slot
    }
}

impl From<BTreeMap<Category, u32>> for CategoryCounts {
    fn from(map: BTreeMap<Category, u32>) -> Self {
        let mut counts = Self::default();
        for (category, count) in map {
            counts.0[category.index()] = count;
        }
        counts
    }
}

impl From<CategoryCounts> for BTreeMap<Category, u32> {
    fn from(counts: CategoryCounts) -> Self {
        Category::ALL
            .iter()
            .map(|category| (*category, counts.get(*category)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementState {
    pub id: AchievementId,
    pub is_unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub nickname: String,
    coins: u32,
    completed_quiz_count: u32,
    category_counts: CategoryCounts,
    achievements: Vec<AchievementState>,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            nickname: DEFAULT_NICKNAME.to_string(),
            coins: 0,
            completed_quiz_count: 0,
            category_counts: CategoryCounts::default(),
            achievements: Vec::new(),
        }
    }
}

impl PlayerProfile {
    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn completed_quiz_count(&self) -> u32 {
        self.completed_quiz_count
    }

    pub fn category_count(&self, category: Category) -> u32 {
        self.category_counts.get(category)
    }

    pub fn achievements(&self) -> &[AchievementState] {
        &self.achievements
    }

    pub fn credit(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Removes `amount` coins. Returns false, leaving the balance untouched,
    /// when the balance does not cover it.
    pub fn debit(&mut self, amount: u32) -> bool {
        if amount > self.coins {
            return false;
        }
        self.coins -= amount;
        true
    }

    pub fn increment_completed(&mut self) -> u32 {
        self.completed_quiz_count = self.completed_quiz_count.saturating_add(1);
        self.completed_quiz_count
    }

    pub fn increment_category(&mut self, category: Category) -> u32 {
        self.category_counts.increment(category)
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.achievements
            .iter()
            .any(|state| state.id == id && state.is_unlocked)
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|s| s.is_unlocked).count()
    }

    /// Marks `id` unlocked.
    ///
    /// Returns true only for the call that performed the transition; the
    /// caller credits the reward exactly when this returns true.
    pub fn unlock(&mut self, id: AchievementId) -> bool {
        match self.achievements.iter_mut().find(|state| state.id == id) {
            Some(state) if state.is_unlocked => false,
            Some(state) => {
                state.is_unlocked = true;
                true
            }
            None => {
                self.achievements.push(AchievementState {
                    id,
                    is_unlocked: true,
                });
                true
            }
        }
    }

    pub fn set_nickname(&mut self, nickname: &str) -> Result<(), NicknameError> {
        self.nickname = validate_nickname(nickname)?.to_string();
        Ok(())
    }

    /// Collapses duplicate achievement entries that hand-edited or migrated
    /// save data may contain, keeping the unlocked flag if any copy had it.
    pub(crate) fn normalize(&mut self) {
        let mut merged: Vec<AchievementState> = Vec::with_capacity(self.achievements.len());
        for state in self.achievements.drain(..) {
            match merged.iter_mut().find(|m| m.id == state.id) {
                Some(existing) => existing.is_unlocked |= state.is_unlocked,
                None => merged.push(state),
            }
        }
        self.achievements = merged;
    }
}
