//! The question catalog.

use std::collections::HashSet;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

use super::loader::{parse_questions, read_questions, LoadError};
use crate::models::{Category, Question};

/// A validated, immutable set of questions.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

/// Questions drawn for one round.
#[derive(Debug, Clone)]
pub struct Round {
    pub category: Category,
    pub questions: Vec<Question>,
    /// Size the caller asked for; larger than `questions.len()` when the
    /// category did not hold enough questions.
    pub requested: usize,
}

impl Round {
    pub fn is_short(&self) -> bool {
        self.questions.len() < self.requested
    }
}

impl QuestionBank {
    /// Builds a bank, rejecting the whole set if any question is malformed.
    pub fn new(questions: Vec<Question>) -> Result<Self, LoadError> {
        let mut seen = HashSet::with_capacity(questions.len());

        for question in &questions {
            let count = question.options.len();
            if count < 2 {
                return Err(LoadError::TooFewOptions {
                    id: question.id,
                    count,
                });
            }
            if question.correct_option_index >= count {
                return Err(LoadError::CorrectIndexOutOfRange {
                    id: question.id,
                    index: question.correct_option_index,
                    count,
                });
            }
            if !seen.insert(question.id) {
                return Err(LoadError::DuplicateId(question.id));
            }
        }

        Ok(Self { questions })
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Self::new(parse_questions(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let bank = Self::new(read_questions(&path)?)?;
        tracing::info!(
            "loaded {} questions from {}",
            bank.len(),
            path.as_ref().display()
        );
        Ok(bank)
    }

    /// Loads the bank, falling back to an empty one if the file is unusable.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        Self::from_path(&path).unwrap_or_else(|err| {
            tracing::error!(
                "question bank {} unusable, continuing with no questions: {err}",
                path.as_ref().display()
            );
            Self::default()
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn questions_for(&self, category: Category) -> impl Iterator<Item = &Question> {
        self.questions
            .iter()
            .filter(move |question| question.category == category)
    }

    pub fn count_for(&self, category: Category) -> usize {
        self.questions_for(category).count()
    }

    /// Draws up to `count` distinct questions of `category` in random order.
    ///
    /// A category with fewer than `count` questions yields all of them; the
    /// returned [`Round`] keeps the requested size so callers can tell.
    pub fn draw_round<R: Rng + ?Sized>(
        &self,
        category: Category,
        count: usize,
        rng: &mut R,
    ) -> Round {
        let mut questions: Vec<Question> = self.questions_for(category).cloned().collect();
        questions.shuffle(rng);
        questions.truncate(count);

        let round = Round {
            category,
            questions,
            requested: count,
        };

        if round.is_short() {
            tracing::warn!(
                "category {category} holds {} questions, round of {count} will be short",
                round.questions.len()
            );
        }

        round
    }
}
