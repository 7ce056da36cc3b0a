use std::path::PathBuf;

use thiserror::Error;

use crate::models::AnswerShape;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("failed to read question bank {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid question bank JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("question bank is empty")]
    Empty,

    #[error("question id {id} appears more than once")]
    DuplicateId { id: u32 },

    #[error("question at position {position} has id {id}")]
    IdMismatch { position: usize, id: u32 },

    #[error("question {id} marks option {index} correct but has {options} options")]
    CorrectOutOfRange { id: u32, index: usize, options: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("the exam has been submitted")]
    Submitted,

    #[error("question {question} expects a {expected} answer, got a {found}")]
    ShapeMismatch {
        question: u32,
        expected: AnswerShape,
        found: AnswerShape,
    },

    #[error("question {question} cannot store an answer")]
    Unanswerable { question: u32 },

    #[error("option {index} is out of range for question {question} ({options} options)")]
    OptionOutOfRange {
        question: u32,
        index: usize,
        options: usize,
    },
}
