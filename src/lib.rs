pub mod bank;
pub mod cli;
pub mod error;
pub mod exam;
pub mod form;
pub mod logger;
pub mod models;
pub mod review;
pub mod session;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod ui_tests;

// Re-exports for convenience
pub use bank::{QuestionBank, BUILTIN_QUESTION_COUNT};
pub use error::{AnswerError, BankError};
pub use exam::{ExamSession, Phase};
pub use models::{Answer, AnswerShape, AppState, Entity, Question, QuestionKind};
pub use session::{handle_key, ExamApp};
pub use ui::{draw_exam, draw_quit_confirmation, draw_review, draw_submit_confirmation};
