use serde::{Deserialize, Serialize};

/// Topical tag on a question, also used as an achievement-progress dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Animals,
    Plants,
    Ecology,
    Water,
    Fungi,
    Birds,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Animals,
        Category::Plants,
        Category::Ecology,
        Category::Water,
        Category::Fungi,
        Category::Birds,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position of this category in [`Category::ALL`].
    pub fn index(self) -> usize {
        match self {
            Category::Animals => 0,
            Category::Plants => 1,
            Category::Ecology => 2,
            Category::Water => 3,
            Category::Fungi => 4,
            Category::Birds => 5,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Animals => "Animals",
            Category::Plants => "Plants",
            Category::Ecology => "Ecology",
            Category::Water => "Water",
            Category::Fungi => "Fungi",
            Category::Birds => "Birds",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Points credited to the round score for a correct answer.
    pub fn reward(self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 15,
            Difficulty::Hard => 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub options: Vec<String>,
    #[serde(alias = "correctAnswerIndex")]
    pub correct_option_index: usize,
    pub category: Category,
    pub difficulty: Difficulty,
}

impl Question {
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_option_index]
    }

    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_option_index
    }
}
