//! Achievement unlock rules.
//!
//! Rules are predicates over the profile *after* the finished session has
//! been counted. Count thresholds use exact equality so a rule fires on the
//! completion that reaches it and not on later ones; only the speed rule is a
//! lower bound. Firing a rule twice is harmless because callers grant rewards
//! only for ids that [`PlayerProfile::unlock`] reports as newly unlocked.

use crate::models::{AchievementId, PlayerProfile};
use crate::session::SessionOutcome;

pub const FIRST_QUIZ_COUNT: u32 = 1;
pub const NATURE_EXPERT_COUNT: u32 = 5;
pub const CATEGORY_LOVER_COUNT: u32 = 1;
pub const CATEGORY_MASTER_COUNT: u32 = 3;
/// Seconds that must remain on the clock for the speed achievement.
pub const SPEEDSTER_MIN_REMAINING_SECS: u32 = 15;

/// Achievements whose conditions hold for this completion, in catalog order.
pub fn evaluate(profile: &PlayerProfile, outcome: &SessionOutcome) -> Vec<AchievementId> {
    let completed = profile.completed_quiz_count();
    let in_category = profile.category_count(outcome.category);

    let rules = [
        (completed == FIRST_QUIZ_COUNT, AchievementId::FirstQuiz),
        (completed == NATURE_EXPERT_COUNT, AchievementId::NatureExpert),
        (
            in_category == CATEGORY_LOVER_COUNT,
            AchievementId::lover(outcome.category),
        ),
        (
            in_category == CATEGORY_MASTER_COUNT,
            AchievementId::master(outcome.category),
        ),
        (
            outcome.remaining_secs >= SPEEDSTER_MIN_REMAINING_SECS,
            AchievementId::Speedster,
        ),
        (outcome.mistakes == 0, AchievementId::PerfectScore),
    ];

    rules
        .into_iter()
        .filter_map(|(holds, id)| holds.then_some(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::session::CompletionReason;

    fn outcome(category: Category, mistakes: u32, remaining_secs: u32) -> SessionOutcome {
        SessionOutcome {
            category,
            score: 0,
            mistakes,
            remaining_secs,
            answered: 10,
            round_size: 10,
            reason: CompletionReason::Exhausted,
        }
    }

    fn profile_after(completions: &[Category]) -> PlayerProfile {
        let mut profile = PlayerProfile::default();
        for category in completions {
            profile.increment_completed();
            profile.increment_category(*category);
        }
        profile
    }

    #[test]
    fn test_first_completion() {
        let profile = profile_after(&[Category::Birds]);
        let ids = evaluate(&profile, &outcome(Category::Birds, 0, 20));

        assert_eq!(
            ids,
            vec![
                AchievementId::FirstQuiz,
                AchievementId::BirdsLover,
                AchievementId::Speedster,
                AchievementId::PerfectScore,
            ]
        );
    }

    #[test]
    fn test_thresholds_use_exact_counts() {
        let profile = profile_after(&[Category::Fungi, Category::Fungi]);
        assert!(evaluate(&profile, &outcome(Category::Fungi, 1, 0)).is_empty());

        let profile = profile_after(&[Category::Fungi; 3]);
        assert_eq!(
            evaluate(&profile, &outcome(Category::Fungi, 1, 0)),
            vec![AchievementId::FungiMaster]
        );

        let profile = profile_after(&[Category::Fungi; 4]);
        assert!(evaluate(&profile, &outcome(Category::Fungi, 1, 0)).is_empty());
    }

    #[test]
    fn test_fifth_completion_grants_nature_expert() {
        let profile = profile_after(&[
            Category::Animals,
            Category::Plants,
            Category::Water,
            Category::Water,
            Category::Ecology,
        ]);
        assert_eq!(
            evaluate(&profile, &outcome(Category::Ecology, 2, 3)),
            vec![AchievementId::NatureExpert, AchievementId::EcoLover]
        );
    }

    #[test]
    fn test_speed_boundary() {
        let profile = profile_after(&[Category::Plants; 2]);
        assert_eq!(
            evaluate(&profile, &outcome(Category::Plants, 1, 15)),
            vec![AchievementId::Speedster]
        );
        assert!(evaluate(&profile, &outcome(Category::Plants, 1, 14)).is_empty());
    }

    #[test]
    fn test_counts_only_the_outcome_category() {
        let profile = profile_after(&[Category::Animals, Category::Water]);
        let ids = evaluate(&profile, &outcome(Category::Water, 1, 0));
        assert_eq!(ids, vec![AchievementId::WaterLover]);
    }
}
