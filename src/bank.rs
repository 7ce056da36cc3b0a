use crate::error::BankError;
use crate::models::{Question, QuestionKind};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const BUILTIN_BANK: &str = include_str!("../data/questions.json");

/// Number of questions in the bundled bank.
pub const BUILTIN_QUESTION_COUNT: usize = 47;

/// Ordered, read-only question list. Lookups are by 0-based position;
/// ids are display-only and equal the 1-based position.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn builtin() -> Result<Self, BankError> {
        Self::from_json(BUILTIN_BANK)
    }

    pub fn load(path: &Path) -> Result<Self, BankError> {
        let content = fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        let mut seen = HashSet::new();
        for (position, question) in questions.iter().enumerate() {
            if !seen.insert(question.id) {
                return Err(BankError::DuplicateId { id: question.id });
            }
            if question.id as usize != position + 1 {
                return Err(BankError::IdMismatch {
                    position: position + 1,
                    id: question.id,
                });
            }
            if let QuestionKind::MultipleChoice { options, correct } = &question.kind
                && let Some(index) = correct.indices().into_iter().find(|i| *i >= options.len())
            {
                return Err(BankError::CorrectOutOfRange {
                    id: question.id,
                    index,
                    options: options.len(),
                });
            }
        }

        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}
