use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    pub category: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_points: Option<u32>,
    /// Present in the data, never enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_sec: Option<u32>,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum QuestionKind {
    MultipleChoice {
        options: Vec<String>,
        correct: CorrectOption,
    },
    InstructionFollowing {
        #[serde(default)]
        constraints: Option<Vec<String>>,
        subtasks: Vec<Subtask>,
        #[serde(default)]
        rubric: Option<Rubric>,
    },
    ReadingComprehension {
        passage: String,
        questions: Vec<SubQuestion>,
        #[serde(default)]
        rubric: Option<Rubric>,
    },
    NerTagging {
        text: String,
        label_set: Vec<String>,
        expected_entities: Vec<Entity>,
    },
    Evaluation {
        case: EvaluationCase,
        expected_key_findings: Vec<String>,
        #[serde(default)]
        better_answer_hints: Option<Vec<String>>,
        #[serde(default)]
        rubric: Option<Rubric>,
    },
    Writing {
        word_limit: WordLimit,
        #[serde(default)]
        expected_coverage: Option<Vec<String>>,
        #[serde(default)]
        rubric: Option<Rubric>,
    },
    Coding {
        language: Language,
        #[serde(default)]
        starter_code: Option<String>,
        #[serde(default)]
        function_name: Option<String>,
        tests: Vec<TestCase>,
    },
    ShortAnswer {
        expected_answer: ExpectedAnswer,
    },
    /// Any tag this build does not know about. Rendered as a placeholder.
    #[serde(other)]
    Unknown,
}

impl QuestionKind {
    /// The raw type tag, e.g. `multiple_choice`.
    pub fn tag(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice { .. } => "multiple_choice",
            QuestionKind::InstructionFollowing { .. } => "instruction_following",
            QuestionKind::ReadingComprehension { .. } => "reading_comprehension",
            QuestionKind::NerTagging { .. } => "ner_tagging",
            QuestionKind::Evaluation { .. } => "evaluation",
            QuestionKind::Writing { .. } => "writing",
            QuestionKind::Coding { .. } => "coding",
            QuestionKind::ShortAnswer { .. } => "short_answer",
            QuestionKind::Unknown => "unknown",
        }
    }

    /// Tag with underscores replaced by spaces, for badges.
    pub fn label(&self) -> String {
        self.tag().replace('_', " ")
    }

    /// Which answer shape this variant stores, `None` for unknown types.
    pub fn answer_shape(&self) -> Option<AnswerShape> {
        match self {
            QuestionKind::MultipleChoice { .. } => Some(AnswerShape::Choice),
            QuestionKind::InstructionFollowing { .. }
            | QuestionKind::ReadingComprehension { .. } => Some(AnswerShape::Lines),
            QuestionKind::NerTagging { .. } => Some(AnswerShape::Entities),
            QuestionKind::Evaluation { .. }
            | QuestionKind::Writing { .. }
            | QuestionKind::Coding { .. }
            | QuestionKind::ShortAnswer { .. } => Some(AnswerShape::Text),
            QuestionKind::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CorrectOption {
    Single(usize),
    Multiple(Vec<usize>),
}

impl CorrectOption {
    pub fn contains(&self, index: usize) -> bool {
        match self {
            CorrectOption::Single(i) => *i == index,
            CorrectOption::Multiple(set) => set.contains(&index),
        }
    }

    pub fn indices(&self) -> Vec<usize> {
        match self {
            CorrectOption::Single(i) => vec![*i],
            CorrectOption::Multiple(set) => set.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub instruction: String,
    #[serde(default)]
    pub expected: Option<String>,
    #[serde(default)]
    pub points: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubQuestion {
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub expected_key_points: Option<Vec<String>>,
    #[serde(default)]
    pub points: Option<u32>,
}

/// Scoring criteria carried with some questions. Nothing evaluates it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rubric {
    pub criteria: Vec<RubricCriterion>,
    pub passing_score: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RubricCriterion {
    pub name: String,
    pub points: u32,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Entity {
    pub surface: String,
    pub label: String,
}

impl Entity {
    pub fn new(surface: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationCase {
    pub user_prompt: String,
    pub model_response: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct WordLimit {
    pub max: u32,
    #[serde(default)]
    pub min: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
    Typescript,
    Java,
    #[serde(rename = "c++")]
    Cpp,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Typescript => "typescript",
            Language::Java => "java",
            Language::Cpp => "c++",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: String,
    pub input: Vec<Value>,
    pub expected_output: Value,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ExpectedAnswer {
    One(String),
    Many(Vec<String>),
}

/// A stored answer. The absent marker is `None` in the session's slot,
/// so `Choice(0)` is a real answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Choice(usize),
    Text(String),
    Lines(Vec<String>),
    Entities(Vec<Entity>),
}

impl Answer {
    pub fn shape(&self) -> AnswerShape {
        match self {
            Answer::Choice(_) => AnswerShape::Choice,
            Answer::Text(_) => AnswerShape::Text,
            Answer::Lines(_) => AnswerShape::Lines,
            Answer::Entities(_) => AnswerShape::Entities,
        }
    }

    /// Whether this value counts towards the answered total.
    pub fn is_present(&self) -> bool {
        match self {
            Answer::Choice(_) => true,
            Answer::Text(text) => !text.trim().is_empty(),
            Answer::Lines(lines) => lines.iter().any(|line| !line.trim().is_empty()),
            Answer::Entities(entities) => !entities.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerShape {
    Choice,
    Text,
    Lines,
    Entities,
}

impl std::fmt::Display for AnswerShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AnswerShape::Choice => "option index",
            AnswerShape::Text => "free text",
            AnswerShape::Lines => "positional text list",
            AnswerShape::Entities => "entity list",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Exam,
    SubmitConfirm,
    QuitConfirm,
    Review,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_zero_is_present() {
        assert!(Answer::Choice(0).is_present());
    }

    #[test]
    fn test_blank_text_not_present() {
        assert!(!Answer::Text("   \n".to_string()).is_present());
        assert!(Answer::Text(" a ".to_string()).is_present());
    }

    #[test]
    fn test_lines_need_one_non_blank_entry() {
        assert!(!Answer::Lines(vec![]).is_present());
        assert!(!Answer::Lines(vec!["".to_string(), "  ".to_string()]).is_present());
        assert!(Answer::Lines(vec!["".to_string(), "no".to_string()]).is_present());
    }

    #[test]
    fn test_entities_count_regardless_of_content() {
        assert!(!Answer::Entities(vec![]).is_present());
        assert!(Answer::Entities(vec![Entity::default()]).is_present());
    }

    #[test]
    fn test_deserialize_multiple_choice() {
        let json = r#"{"id":1,"category":"C","type":"multiple_choice","prompt":"P",
            "options":["a","b"],"correct":[0,1]}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.kind.tag(), "multiple_choice");
        match q.kind {
            QuestionKind::MultipleChoice { options, correct } => {
                assert_eq!(options.len(), 2);
                assert!(correct.contains(0));
                assert!(correct.contains(1));
            }
            other => panic!("unexpected variant {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_unknown_type_falls_back() {
        let json = r#"{"id":9,"category":"C","type":"drawing","prompt":"P","canvas":{"w":3}}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.kind, QuestionKind::Unknown);
        assert_eq!(q.kind.answer_shape(), None);
    }

    #[test]
    fn test_deserialize_coding_language() {
        let json = r#"{"id":2,"category":"C","type":"coding","prompt":"P","language":"c++",
            "tests":[{"id":"t1","input":[1,[2]],"expectedOutput":true}]}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        match q.kind {
            QuestionKind::Coding { language, tests, starter_code, .. } => {
                assert_eq!(language, Language::Cpp);
                assert_eq!(tests[0].expected_output, Value::Bool(true));
                assert!(starter_code.is_none());
            }
            other => panic!("unexpected variant {:?}", other),
        }
    }

    #[test]
    fn test_type_label_replaces_underscores() {
        let kind = QuestionKind::ShortAnswer {
            expected_answer: ExpectedAnswer::One("x".to_string()),
        };
        assert_eq!(kind.label(), "short answer");
    }
}
