//! Post-submit review: each question next to the stored answer and the
//! question's expected content. Nothing here compares or grades.

use crate::exam::{positional_answers, ExamSession};
use crate::models::{Answer, Entity, ExpectedAnswer, Question, QuestionKind};

pub const NO_ANSWER: &str = "(no answer)";
pub const BLANK: &str = "(blank)";

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewEntry {
    pub number: usize,
    pub category: String,
    pub type_label: String,
    pub prompt: String,
    pub body: ReviewBody,
    pub explanation: Option<String>,
    /// Titled bullet lists shown after the answer, e.g. expected key findings.
    pub expectations: Vec<(String, Vec<String>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReviewBody {
    Choice(Vec<ReviewOption>),
    Positional(Vec<PositionalItem>),
    Entities {
        entered: Vec<Entity>,
        expected: Vec<Entity>,
    },
    FreeText(Option<String>),
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOption {
    pub text: String,
    pub correct: bool,
    pub picked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalItem {
    pub prompt: String,
    /// Stored entry, `None` when blank.
    pub answer: Option<String>,
    pub expected: Option<String>,
    pub key_points: Vec<String>,
}

pub fn build(session: &ExamSession) -> Vec<ReviewEntry> {
    session
        .bank()
        .iter()
        .zip(session.answers())
        .enumerate()
        .map(|(index, (question, answer))| review_question(index, question, answer.as_ref()))
        .collect()
}

pub fn review_question(index: usize, question: &Question, answer: Option<&Answer>) -> ReviewEntry {
    ReviewEntry {
        number: index + 1,
        category: question.category.clone(),
        type_label: question.kind.label(),
        prompt: question.prompt.clone(),
        body: review_body(&question.kind, answer),
        explanation: question.explanation.clone(),
        expectations: expectations(&question.kind),
    }
}

fn review_body(kind: &QuestionKind, answer: Option<&Answer>) -> ReviewBody {
    match kind {
        QuestionKind::MultipleChoice { options, correct } => {
            let picked = match answer {
                Some(Answer::Choice(i)) => Some(*i),
                _ => None,
            };
            ReviewBody::Choice(
                options
                    .iter()
                    .enumerate()
                    .map(|(i, text)| ReviewOption {
                        text: text.clone(),
                        correct: correct.contains(i),
                        picked: picked == Some(i),
                    })
                    .collect(),
            )
        }
        QuestionKind::InstructionFollowing { subtasks, .. } => {
            let stored = positional_answers(answer, subtasks.len());
            ReviewBody::Positional(
                subtasks
                    .iter()
                    .zip(stored)
                    .map(|(subtask, entry)| PositionalItem {
                        prompt: format!("{}. {}", subtask.id, subtask.instruction),
                        answer: non_blank(entry),
                        expected: subtask.expected.as_ref().map(|e| {
                            if e.is_empty() {
                                BLANK.to_string()
                            } else {
                                e.clone()
                            }
                        }),
                        key_points: Vec::new(),
                    })
                    .collect(),
            )
        }
        QuestionKind::ReadingComprehension { questions, .. } => {
            let stored = positional_answers(answer, questions.len());
            ReviewBody::Positional(
                questions
                    .iter()
                    .zip(stored)
                    .map(|(sub, entry)| PositionalItem {
                        prompt: sub.prompt.clone(),
                        answer: non_blank(entry),
                        expected: None,
                        key_points: sub.expected_key_points.clone().unwrap_or_default(),
                    })
                    .collect(),
            )
        }
        QuestionKind::NerTagging {
            expected_entities, ..
        } => ReviewBody::Entities {
            entered: match answer {
                Some(Answer::Entities(entities)) => entities.clone(),
                _ => Vec::new(),
            },
            expected: expected_entities.clone(),
        },
        QuestionKind::Evaluation { .. }
        | QuestionKind::Writing { .. }
        | QuestionKind::Coding { .. }
        | QuestionKind::ShortAnswer { .. } => ReviewBody::FreeText(match answer {
            Some(Answer::Text(text)) => non_blank(text.clone()),
            _ => None,
        }),
        QuestionKind::Unknown => ReviewBody::Unknown,
    }
}

fn non_blank(entry: String) -> Option<String> {
    if entry.is_empty() { None } else { Some(entry) }
}

fn expectations(kind: &QuestionKind) -> Vec<(String, Vec<String>)> {
    let mut sections = Vec::new();
    match kind {
        QuestionKind::Evaluation {
            expected_key_findings,
            better_answer_hints,
            ..
        } => {
            sections.push((
                "Expected key findings".to_string(),
                expected_key_findings.clone(),
            ));
            if let Some(hints) = better_answer_hints {
                sections.push(("A better answer would".to_string(), hints.clone()));
            }
        }
        QuestionKind::Writing {
            expected_coverage: Some(coverage),
            ..
        } => sections.push(("Expected coverage".to_string(), coverage.clone())),
        QuestionKind::ShortAnswer { expected_answer } => {
            let answers = match expected_answer {
                ExpectedAnswer::One(answer) => vec![answer.clone()],
                ExpectedAnswer::Many(answers) => answers.clone(),
            };
            sections.push(("Expected answer(s)".to_string(), answers));
        }
        _ => {}
    }
    sections
}
