use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::models::Question;

pub const DEFAULT_QUESTIONS_PATH: &str = "questions.json";

/// Error loading the question catalog.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed question document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("question {id} has {count} options, at least 2 are required")]
    TooFewOptions { id: u32, count: usize },

    #[error("question {id} marks option {index} correct but has only {count} options")]
    CorrectIndexOutOfRange { id: u32, index: usize, count: usize },

    #[error("question id {0} appears more than once")]
    DuplicateId(u32),
}

/// Accepted layouts of a question document.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionDocument {
    Container { questions: Vec<Question> },
    List(Vec<Question>),
}

pub fn parse_questions(json: &str) -> Result<Vec<Question>, LoadError> {
    let document: QuestionDocument = serde_json::from_str(json)?;
    Ok(match document {
        QuestionDocument::Container { questions } | QuestionDocument::List(questions) => questions,
    })
}

pub fn read_questions<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_questions(&json_content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUESTION: &str = r#"{
        "id": 1,
        "text": "Which of these is a mushroom?",
        "options": ["Chanterelle", "Fern"],
        "correct_option_index": 0,
        "category": "fungi",
        "difficulty": "medium"
    }"#;

    #[test]
    fn test_parse_container_and_list() {
        let container = format!("{{\"questions\": [{QUESTION}]}}");
        let list = format!("[{QUESTION}]");

        assert_eq!(parse_questions(&container).unwrap().len(), 1);
        assert_eq!(parse_questions(&list).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_rejects_unknown_category() {
        let bad = QUESTION.replace("fungi", "minerals");
        let err = parse_questions(&format!("[{bad}]")).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_questions("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
        assert!(err.to_string().contains("here.json"));
    }
}
