//! Questions and their variants.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::meta::QuestionMetaData;
use super::points::Points;
use crate::resource::ResourceRef;
use crate::text::TextContent;

/// Question variant keyword, as used in exam files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, EnumIter)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Exactly one correct answer.
    MultipleChoice,
    /// One or more correct answers.
    MultipleResponse,
    /// Free-text answer.
    Open,
    /// Informational text without an answer.
    TextOnly,
}

impl QuestionType {
    /// Canonical field order of this variant in exam files.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::MultipleChoice | Self::MultipleResponse => &[
                "id", "title", "points", "text", "answers", "feedback", "meta_data",
            ],
            Self::Open => &[
                "id", "title", "points", "text", "options", "feedback", "meta_data",
            ],
            Self::TextOnly => &["id", "title", "text", "feedback", "meta_data"],
        }
    }

    /// Returns true for variants carrying answer options.
    pub fn has_answers(&self) -> bool {
        matches!(self, Self::MultipleChoice | Self::MultipleResponse)
    }
}

/// A single question of an exam.
#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within the exam when not empty.
    pub id: String,
    pub title: Option<TextContent>,
    pub text: TextContent,
    pub feedback: Feedback,
    pub meta_data: QuestionMetaData,
    /// Variant-specific fields.
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// Variant-specific part of a [`Question`].
#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    #[serde(rename = "multiple_choice")]
    SingleCorrectChoice {
        points: Option<Points>,
        answers: Vec<AnswerOption>,
    },
    #[serde(rename = "multiple_response")]
    MultiCorrectChoice {
        points: Option<Points>,
        answers: Vec<AnswerOption>,
    },
    #[serde(rename = "open")]
    OpenResponse {
        points: Option<Points>,
        options: OpenOptions,
    },
    TextOnly,
}

impl QuestionKind {
    /// Returns an empty kind of the given type.
    pub fn empty(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::MultipleChoice => Self::SingleCorrectChoice {
                points: None,
                answers: Vec::new(),
            },
            QuestionType::MultipleResponse => Self::MultiCorrectChoice {
                points: None,
                answers: Vec::new(),
            },
            QuestionType::Open => Self::OpenResponse {
                points: None,
                options: OpenOptions::default(),
            },
            QuestionType::TextOnly => Self::TextOnly,
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::SingleCorrectChoice { .. } => QuestionType::MultipleChoice,
            Self::MultiCorrectChoice { .. } => QuestionType::MultipleResponse,
            Self::OpenResponse { .. } => QuestionType::Open,
            Self::TextOnly => QuestionType::TextOnly,
        }
    }
}

impl Question {
    /// Creates a question with the given identifier and text.
    pub fn new(id: impl Into<String>, text: impl Into<TextContent>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            title: None,
            text: text.into(),
            feedback: Feedback::default(),
            meta_data: QuestionMetaData::default(),
            kind,
        }
    }

    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    pub fn is_single_correct_choice(&self) -> bool {
        matches!(self.kind, QuestionKind::SingleCorrectChoice { .. })
    }

    pub fn is_multi_correct_choice(&self) -> bool {
        matches!(self.kind, QuestionKind::MultiCorrectChoice { .. })
    }

    pub fn is_open_response(&self) -> bool {
        matches!(self.kind, QuestionKind::OpenResponse { .. })
    }

    pub fn is_text_only(&self) -> bool {
        matches!(self.kind, QuestionKind::TextOnly)
    }

    /// Points awarded for this question, if declared.
    pub fn points(&self) -> Option<Points> {
        match &self.kind {
            QuestionKind::SingleCorrectChoice { points, .. }
            | QuestionKind::MultiCorrectChoice { points, .. }
            | QuestionKind::OpenResponse { points, .. } => *points,
            QuestionKind::TextOnly => None,
        }
    }

    /// Answer options of choice questions; empty for other variants.
    pub fn answers(&self) -> &[AnswerOption] {
        match &self.kind {
            QuestionKind::SingleCorrectChoice { answers, .. }
            | QuestionKind::MultiCorrectChoice { answers, .. } => answers,
            _ => &[],
        }
    }

    /// Response options of open questions.
    pub fn options(&self) -> Option<&OpenOptions> {
        match &self.kind {
            QuestionKind::OpenResponse { options, .. } => Some(options),
            _ => None,
        }
    }

    /// Number of answers marked as correct.
    pub fn nmr_correct_answers(&self) -> usize {
        self.answers().iter().filter(|answer| answer.correct).count()
    }

    /// Lists the resources referenced by every text of this question.
    pub fn list_resources(&self) -> Vec<ResourceRef> {
        let mut resources = Vec::new();
        if let Some(title) = &self.title {
            resources.extend(title.list_resources());
        }
        resources.extend(self.text.list_resources());
        for answer in self.answers() {
            resources.extend(answer.list_resources());
        }
        resources.extend(self.feedback.list_resources());
        resources
    }
}

/// One answer option of a choice question.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
pub struct AnswerOption {
    pub text: TextContent,
    pub correct: bool,
    /// Shown to a student who picks this answer.
    pub hint: Option<TextContent>,
}

impl AnswerOption {
    pub fn new(text: impl Into<TextContent>, correct: bool) -> Self {
        Self {
            text: text.into(),
            correct,
            hint: None,
        }
    }

    pub fn list_resources(&self) -> Vec<ResourceRef> {
        let mut resources = self.text.list_resources();
        if let Some(hint) = &self.hint {
            resources.extend(hint.list_resources());
        }
        resources
    }
}

/// Constraints on the answer of an open question.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
pub struct OpenOptions {
    pub max_words: Option<u32>,
    pub min_words: Option<u32>,
    /// Number of lines to reserve for the answer on paper.
    pub expected_lines: Option<u32>,
}

/// Feedback shown after answering.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
pub struct Feedback {
    pub general: Option<TextContent>,
    pub on_correct: Option<TextContent>,
    pub on_incorrect: Option<TextContent>,
}

impl Feedback {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn list_resources(&self) -> Vec<ResourceRef> {
        [&self.general, &self.on_correct, &self.on_incorrect]
            .into_iter()
            .flatten()
            .flat_map(TextContent::list_resources)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn choice(correct: &[bool]) -> Question {
        let answers = correct
            .iter()
            .enumerate()
            .map(|(index, correct)| AnswerOption::new(format!("answer {index}"), *correct))
            .collect();
        let kind = QuestionKind::MultiCorrectChoice {
            points: Some(Points::Integer(2)),
            answers,
        };
        Question::new("q1", "Pick", kind)
    }

    #[test]
    fn test_question_type_keywords() {
        assert_eq!(QuestionType::from_str("multiple_response").unwrap(), QuestionType::MultipleResponse);
        assert_eq!(QuestionType::TextOnly.as_ref(), "text_only");
        assert!(QuestionType::from_str("essay").is_err());
        assert_eq!(
            QuestionKind::empty(QuestionType::Open).question_type(),
            QuestionType::Open
        );
    }

    #[test]
    fn test_variant_fields() {
        assert!(QuestionType::Open.fields().contains(&"options"));
        assert!(!QuestionType::Open.fields().contains(&"answers"));
        assert!(!QuestionType::TextOnly.fields().contains(&"points"));
    }

    #[test]
    fn test_nmr_correct_answers() {
        let question = choice(&[true, false, true]);
        assert_eq!(question.nmr_correct_answers(), 2);
        assert!(question.is_multi_correct_choice());
        assert_eq!(question.points(), Some(Points::Integer(2)));

        let question = Question::new("t", "Read this", QuestionKind::TextOnly);
        assert_eq!(question.nmr_correct_answers(), 0);
        assert_eq!(question.points(), None);
    }

    #[test]
    fn test_question_resources() {
        let mut question = choice(&[true]);
        question.text = TextContent::html(r#"<img src="pics/q.png">"#);
        question.feedback.on_correct = Some(TextContent::markdown("![ok](pics/ok.png)"));

        let paths: Vec<_> = question.list_resources().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["pics/q.png", "pics/ok.png"]);
    }

    #[test]
    fn test_serialization_tags_variant() {
        let question = Question::new("intro", "Welcome", QuestionKind::TextOnly);
        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["type"], "text_only");
        assert_eq!(value["id"], "intro");
    }
}
