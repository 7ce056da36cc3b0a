//! Per-type input rendering: turns a question and its stored answer into
//! read-only context plus a list of focusable controls, and turns edits on
//! those controls back into a full answer value.

use crate::exam::positional_answers;
use crate::models::{Answer, Entity, Question, QuestionKind};
use crate::utils::word_count;

#[derive(Debug, Clone, PartialEq)]
pub enum ContextBlock {
    Constraints(Vec<String>),
    Passage(String),
    AnnotateText(String),
    Labels(Vec<String>),
    Case {
        user_prompt: String,
        model_response: String,
    },
    WordLimit {
        max: u32,
        min: Option<u32>,
        current: usize,
    },
    CodingInfo {
        language: String,
        function_name: Option<String>,
    },
    StarterCode(String),
    Tests(Vec<String>),
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Option {
        index: usize,
        text: String,
        selected: bool,
    },
    Text {
        label: String,
        value: String,
        multiline: bool,
        placeholder: &'static str,
    },
    Surface {
        row: usize,
        value: String,
    },
    Label {
        row: usize,
        value: String,
        choices: Vec<String>,
    },
}

impl Control {
    /// Editable text behind this control, if it takes typed input.
    pub fn text(&self) -> Option<&str> {
        match self {
            Control::Text { value, .. } | Control::Surface { value, .. } => Some(value),
            Control::Option { .. } | Control::Label { .. } => None,
        }
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self, Control::Text { multiline: true, .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Form {
    pub context: Vec<ContextBlock>,
    pub controls: Vec<Control>,
}

pub fn build(question: &Question, answer: Option<&Answer>) -> Form {
    match &question.kind {
        QuestionKind::MultipleChoice { options, .. } => {
            let selected = match answer {
                Some(Answer::Choice(i)) => Some(*i),
                _ => None,
            };
            let controls = options
                .iter()
                .enumerate()
                .map(|(index, text)| Control::Option {
                    index,
                    text: text.clone(),
                    selected: selected == Some(index),
                })
                .collect();
            Form {
                context: Vec::new(),
                controls,
            }
        }
        QuestionKind::InstructionFollowing {
            constraints,
            subtasks,
            ..
        } => {
            let values = positional_answers(answer, subtasks.len());
            let controls = subtasks
                .iter()
                .zip(values)
                .map(|(subtask, value)| Control::Text {
                    label: format!("{}. {}", subtask.id, subtask.instruction),
                    value,
                    multiline: false,
                    placeholder: "Your answer",
                })
                .collect();
            let context = constraints
                .iter()
                .map(|c| ContextBlock::Constraints(c.clone()))
                .collect();
            Form { context, controls }
        }
        QuestionKind::ReadingComprehension {
            passage, questions, ..
        } => {
            let values = positional_answers(answer, questions.len());
            let controls = questions
                .iter()
                .zip(values)
                .enumerate()
                .map(|(i, (sub, value))| Control::Text {
                    label: format!("{}. {}", i + 1, sub.prompt),
                    value,
                    multiline: true,
                    placeholder: "Your answer (1-3 sentences)",
                })
                .collect();
            Form {
                context: vec![ContextBlock::Passage(passage.clone())],
                controls,
            }
        }
        QuestionKind::NerTagging {
            text, label_set, ..
        } => {
            let controls = entity_rows(answer)
                .iter()
                .enumerate()
                .flat_map(|(row, entity)| {
                    [
                        Control::Surface {
                            row,
                            value: entity.surface.clone(),
                        },
                        Control::Label {
                            row,
                            value: entity.label.clone(),
                            choices: label_set.clone(),
                        },
                    ]
                })
                .collect();
            Form {
                context: vec![
                    ContextBlock::AnnotateText(text.clone()),
                    ContextBlock::Labels(label_set.clone()),
                ],
                controls,
            }
        }
        QuestionKind::Evaluation { case, .. } => Form {
            context: vec![ContextBlock::Case {
                user_prompt: case.user_prompt.clone(),
                model_response: case.model_response.clone(),
            }],
            controls: vec![free_text(
                answer,
                "Your Evaluation (2-3 sentences)",
                "Evaluate for accuracy, helpfulness, and safety...",
            )],
        },
        QuestionKind::Writing { word_limit, .. } => Form {
            context: vec![ContextBlock::WordLimit {
                max: word_limit.max,
                min: word_limit.min,
                current: word_count(text_of(answer)),
            }],
            controls: vec![free_text(answer, "Your Response", "Write your response here...")],
        },
        QuestionKind::Coding {
            language,
            starter_code,
            function_name,
            tests,
        } => {
            let mut context = vec![ContextBlock::CodingInfo {
                language: language.as_str().to_string(),
                function_name: function_name.clone(),
            }];
            if let Some(code) = starter_code {
                context.push(ContextBlock::StarterCode(code.clone()));
            }
            context.push(ContextBlock::Tests(
                tests
                    .iter()
                    .map(|t| {
                        format!(
                            "{}: {} Input: {} : Output: {}",
                            t.id,
                            t.description.as_deref().unwrap_or(""),
                            serde_json::Value::from(t.input.clone()),
                            t.expected_output
                        )
                    })
                    .collect(),
            ));
            Form {
                context,
                controls: vec![free_text(answer, "Your Code", "Write your code here...")],
            }
        }
        QuestionKind::ShortAnswer { .. } => Form {
            context: Vec::new(),
            controls: vec![free_text(answer, "Your Answer", "Enter your answer...")],
        },
        QuestionKind::Unknown => Form {
            context: vec![ContextBlock::Unknown("Unknown question type".to_string())],
            controls: Vec::new(),
        },
    }
}

fn text_of(answer: Option<&Answer>) -> &str {
    match answer {
        Some(Answer::Text(text)) => text,
        _ => "",
    }
}

fn free_text(answer: Option<&Answer>, label: &str, placeholder: &'static str) -> Control {
    Control::Text {
        label: label.to_string(),
        value: text_of(answer).to_string(),
        multiline: true,
        placeholder,
    }
}

fn entity_rows(answer: Option<&Answer>) -> Vec<Entity> {
    match answer {
        Some(Answer::Entities(entities)) => entities.clone(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Select(usize),
    /// Replace the text of the `control`-th text field.
    SetText { control: usize, value: String },
    SetSurface { row: usize, value: String },
    CycleLabel { row: usize, forward: bool },
    AppendRow,
    RemoveRow(usize),
}

/// The full answer value after `edit`, or `None` if the edit does not apply
/// to this question type.
pub fn apply(question: &Question, answer: Option<&Answer>, edit: Edit) -> Option<Answer> {
    match (&question.kind, edit) {
        (QuestionKind::MultipleChoice { options, .. }, Edit::Select(index)) => {
            (index < options.len()).then_some(Answer::Choice(index))
        }
        (
            QuestionKind::InstructionFollowing { subtasks, .. },
            Edit::SetText { control, value },
        ) => set_positional(answer, subtasks.len(), control, value),
        (
            QuestionKind::ReadingComprehension { questions, .. },
            Edit::SetText { control, value },
        ) => set_positional(answer, questions.len(), control, value),
        (
            QuestionKind::Evaluation { .. }
            | QuestionKind::Writing { .. }
            | QuestionKind::Coding { .. }
            | QuestionKind::ShortAnswer { .. },
            Edit::SetText { control: 0, value },
        ) => Some(Answer::Text(value)),
        (QuestionKind::NerTagging { .. }, Edit::AppendRow) => {
            let mut rows = entity_rows(answer);
            rows.push(Entity::default());
            Some(Answer::Entities(rows))
        }
        (QuestionKind::NerTagging { .. }, Edit::RemoveRow(row)) => {
            let mut rows = entity_rows(answer);
            if row >= rows.len() {
                return None;
            }
            rows.remove(row);
            Some(Answer::Entities(rows))
        }
        (QuestionKind::NerTagging { .. }, Edit::SetSurface { row, value }) => {
            let mut rows = entity_rows(answer);
            rows.get_mut(row)?.surface = value;
            Some(Answer::Entities(rows))
        }
        (QuestionKind::NerTagging { label_set, .. }, Edit::CycleLabel { row, forward }) => {
            let mut rows = entity_rows(answer);
            let entity = rows.get_mut(row)?;
            entity.label = cycle_label(label_set, &entity.label, forward);
            Some(Answer::Entities(rows))
        }
        _ => None,
    }
}

fn set_positional(
    answer: Option<&Answer>,
    len: usize,
    control: usize,
    value: String,
) -> Option<Answer> {
    if control >= len {
        return None;
    }
    let mut lines = positional_answers(answer, len);
    lines[control] = value;
    Some(Answer::Lines(lines))
}

/// Steps through `""` followed by the label vocabulary, wrapping around.
/// A label outside the vocabulary is treated as unselected.
fn cycle_label(label_set: &[String], current: &str, forward: bool) -> String {
    let slots = label_set.len() + 1;
    let position = label_set
        .iter()
        .position(|l| l == current)
        .map_or(0, |i| i + 1);
    let next = if forward {
        (position + 1) % slots
    } else {
        (position + slots - 1) % slots
    };
    if next == 0 {
        String::new()
    } else {
        label_set[next - 1].clone()
    }
}
