//! Achievement catalog.
//!
//! The catalog is closed: every id is a variant of [`AchievementId`] and its
//! title, description and reward live in a static table.

use serde::{Deserialize, Serialize};

use super::question::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AchievementId {
    #[serde(rename = "first_quiz")]
    FirstQuiz,
    #[serde(rename = "nature_expert")]
    NatureExpert,
    #[serde(rename = "animal_lover")]
    AnimalLover,
    #[serde(rename = "animal_master")]
    AnimalMaster,
    #[serde(rename = "plant_lover")]
    PlantLover,
    #[serde(rename = "plant_master")]
    PlantMaster,
    #[serde(rename = "eco_lover")]
    EcoLover,
    #[serde(rename = "eco_master")]
    EcoMaster,
    #[serde(rename = "water_lover")]
    WaterLover,
    #[serde(rename = "water_master")]
    WaterMaster,
    #[serde(rename = "fungi_lover")]
    FungiLover,
    #[serde(rename = "fungi_master")]
    FungiMaster,
    #[serde(rename = "birds_lover")]
    BirdsLover,
    #[serde(rename = "birds_master")]
    BirdsMaster,
    #[serde(rename = "speedster")]
    Speedster,
    #[serde(rename = "perfect_score")]
    PerfectScore,
}

/// Catalog metadata for a single achievement.
#[derive(Debug)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: &'static str,
    pub description: &'static str,
    pub reward: u32,
}

const fn entry(
    id: AchievementId,
    title: &'static str,
    description: &'static str,
    reward: u32,
) -> Achievement {
    Achievement {
        id,
        title,
        description,
        reward,
    }
}

/// Every achievement, in display order.
pub static CATALOG: [Achievement; 16] = [
    entry(AchievementId::FirstQuiz, "First Step", "Complete your first quiz", 100),
    entry(AchievementId::NatureExpert, "Nature Expert", "Complete 5 quizzes", 500),
    entry(AchievementId::AnimalLover, "Animal Lover", "Complete an animal quiz", 200),
    entry(AchievementId::AnimalMaster, "Animal Master", "Complete 3 animal quizzes", 400),
    entry(AchievementId::PlantLover, "Plant Lover", "Complete a plant quiz", 200),
    entry(AchievementId::PlantMaster, "Plant Master", "Complete 3 plant quizzes", 400),
    entry(AchievementId::EcoLover, "Nature Defender", "Complete an ecology quiz", 200),
    entry(AchievementId::EcoMaster, "Ecology Master", "Complete 3 ecology quizzes", 400),
    entry(AchievementId::WaterLover, "Water Lover", "Complete a water quiz", 200),
    entry(AchievementId::WaterMaster, "Water Master", "Complete 3 water quizzes", 400),
    entry(AchievementId::FungiLover, "Fungi Lover", "Complete a fungi quiz", 200),
    entry(AchievementId::FungiMaster, "Fungi Master", "Complete 3 fungi quizzes", 400),
    entry(AchievementId::BirdsLover, "Bird Lover", "Complete a bird quiz", 200),
    entry(AchievementId::BirdsMaster, "Bird Master", "Complete 3 bird quizzes", 400),
    entry(
        AchievementId::Speedster,
        "Speedster",
        "Complete a quiz in less than 20 seconds",
        300,
    ),
    entry(
        AchievementId::PerfectScore,
        "Perfect Score",
        "Complete a quiz without mistakes",
        500,
    ),
];

impl AchievementId {
    pub const ALL: [AchievementId; 16] = [
        AchievementId::FirstQuiz,
        AchievementId::NatureExpert,
        AchievementId::AnimalLover,
        AchievementId::AnimalMaster,
        AchievementId::PlantLover,
        AchievementId::PlantMaster,
        AchievementId::EcoLover,
        AchievementId::EcoMaster,
        AchievementId::WaterLover,
        AchievementId::WaterMaster,
        AchievementId::FungiLover,
        AchievementId::FungiMaster,
        AchievementId::BirdsLover,
        AchievementId::BirdsMaster,
        AchievementId::Speedster,
        AchievementId::PerfectScore,
    ];

    /// The "complete one quiz in this category" achievement.
    pub fn lover(category: Category) -> Self {
        match category {
            Category::Animals => Self::AnimalLover,
            Category::Plants => Self::PlantLover,
            Category::Ecology => Self::EcoLover,
            Category::Water => Self::WaterLover,
            Category::Fungi => Self::FungiLover,
            Category::Birds => Self::BirdsLover,
        }
    }

    /// The "complete three quizzes in this category" achievement.
    pub fn master(category: Category) -> Self {
        match category {
            Category::Animals => Self::AnimalMaster,
            Category::Plants => Self::PlantMaster,
            Category::Ecology => Self::EcoMaster,
            Category::Water => Self::WaterMaster,
            Category::Fungi => Self::FungiMaster,
            Category::Birds => Self::BirdsMaster,
        }
    }

    pub fn info(self) -> &'static Achievement {
        // CATALOG is laid out in the same order as ALL.
        &CATALOG[self as usize]
    }

    pub fn reward(self) -> u32 {
        self.info().reward
    }

    pub fn title(self) -> &'static str {
        self.info().title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_matches_ids() {
        for id in AchievementId::ALL {
            assert_eq!(id.info().id, id);
        }
    }

    #[test]
    fn test_category_pairs_are_distinct() {
        for category in Category::ALL {
            let lover = AchievementId::lover(category);
            let master = AchievementId::master(category);
            assert_ne!(lover, master);
            assert_eq!(lover.reward(), 200);
            assert_eq!(master.reward(), 400);
        }
    }

    #[test]
    fn test_persisted_ids() {
        let json = serde_json::to_string(&AchievementId::EcoLover).unwrap();
        assert_eq!(json, "\"eco_lover\"");
        let id: AchievementId = serde_json::from_str("\"perfect_score\"").unwrap();
        assert_eq!(id, AchievementId::PerfectScore);
    }
}
