use crate::bank::QuestionBank;
use crate::error::AnswerError;
use crate::models::{Answer, Question, QuestionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Submitted,
}

/// In-memory exam state: position, one answer slot per question, and phase.
#[derive(Debug, Clone)]
pub struct ExamSession {
    bank: QuestionBank,
    current_index: usize,
    answers: Vec<Option<Answer>>,
    phase: Phase,
}

impl ExamSession {
    pub fn new(bank: QuestionBank) -> Self {
        let answers = vec![None; bank.len()];
        Self {
            bank,
            current_index: 0,
            answers,
            phase: Phase::InProgress,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn question_count(&self) -> usize {
        self.bank.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.bank.questions()[self.current_index]
    }

    pub fn current_answer(&self) -> Option<&Answer> {
        self.answers[self.current_index].as_ref()
    }

    pub fn answers(&self) -> &[Option<Answer>] {
        &self.answers
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == Phase::Submitted
    }

    pub fn is_first(&self) -> bool {
        self.current_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.question_count()
    }

    /// Returns whether the index moved.
    pub fn next(&mut self) -> bool {
        if self.is_submitted() || self.is_last() {
            return false;
        }
        self.current_index += 1;
        true
    }

    /// Returns whether the index moved.
    pub fn previous(&mut self) -> bool {
        if self.is_submitted() || self.is_first() {
            return false;
        }
        self.current_index -= 1;
        true
    }

    /// Overwrite the answer at the current position. The value is stored
    /// as given; renderers interpret its shape per question type.
    pub fn set_answer(&mut self, answer: Answer) -> Result<(), AnswerError> {
        if self.is_submitted() {
            return Err(AnswerError::Submitted);
        }
        self.answers[self.current_index] = Some(answer);
        Ok(())
    }

    /// Like `set_answer`, but rejects values whose shape does not fit the
    /// current question.
    pub fn set_answer_checked(&mut self, answer: Answer) -> Result<(), AnswerError> {
        if self.is_submitted() {
            return Err(AnswerError::Submitted);
        }
        check_answer(self.current_question(), &answer)?;
        self.set_answer(answer)
    }

    pub fn clear_answer(&mut self) -> Result<(), AnswerError> {
        if self.is_submitted() {
            return Err(AnswerError::Submitted);
        }
        self.answers[self.current_index] = None;
        Ok(())
    }

    /// Returns whether the phase changed.
    pub fn submit(&mut self) -> bool {
        if self.is_submitted() {
            return false;
        }
        self.phase = Phase::Submitted;
        true
    }

    /// Back to the first question with every slot absent. Only valid after submit.
    pub fn restart(&mut self) -> bool {
        if !self.is_submitted() {
            return false;
        }
        self.answers = vec![None; self.question_count()];
        self.current_index = 0;
        self.phase = Phase::InProgress;
        true
    }

    /// Fraction in (0, 1].
    pub fn progress(&self) -> f64 {
        (self.current_index + 1) as f64 / self.question_count() as f64
    }

    pub fn answered_count(&self) -> usize {
        self.answers
            .iter()
            .filter(|slot| slot.as_ref().is_some_and(Answer::is_present))
            .count()
    }
}

pub fn check_answer(question: &Question, answer: &Answer) -> Result<(), AnswerError> {
    let Some(expected) = question.kind.answer_shape() else {
        return Err(AnswerError::Unanswerable {
            question: question.id,
        });
    };
    if answer.shape() != expected {
        return Err(AnswerError::ShapeMismatch {
            question: question.id,
            expected,
            found: answer.shape(),
        });
    }
    if let (QuestionKind::MultipleChoice { options, .. }, Answer::Choice(index)) =
        (&question.kind, answer)
        && *index >= options.len()
    {
        return Err(AnswerError::OptionOutOfRange {
            question: question.id,
            index: *index,
            options: options.len(),
        });
    }
    Ok(())
}

/// Stored positional strings padded or truncated to `len`.
/// Anything other than `Lines` reads as all-empty.
pub fn positional_answers(answer: Option<&Answer>, len: usize) -> Vec<String> {
    let mut lines = match answer {
        Some(Answer::Lines(lines)) => lines.clone(),
        _ => Vec::new(),
    };
    lines.resize(len, String::new());
    lines
}
