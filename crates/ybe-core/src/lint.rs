//! Semantic linting of exam documents.
//!
//! [`lint`] validates a document regardless of how it was built. It walks the
//! model recursively, reporting problems as data instead of failing, and runs
//! the same rules the reader enforces while loading.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::TRACING_TARGET_LINT;
use crate::model::rules;
use crate::model::{
    AnalyticsUsage, AnswerOption, ExamDocument, ExamInfo, Feedback, GeneralMetaData, OpenOptions,
    Question, QuestionMetaData, SkillType, UsedInExam,
};
use crate::text::TextContent;

/// Severity of a [`SemanticProblem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(AsRefStr, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The document would be rejected by the reader.
    Error,
    /// The document is valid but likely not what was intended.
    Warning,
}

/// A problem found by [`lint`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
pub struct SemanticProblem {
    pub severity: Severity,
    /// Location in the document, e.g. `questions[2].answers[0]`.
    pub location: String,
    pub message: String,
}

impl SemanticProblem {
    fn new(severity: Severity, location: &str, message: impl Into<String>) -> Self {
        Self {
            severity,
            location: location.to_owned(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for SemanticProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_empty() {
            write!(f, "{}: {}", self.severity, self.message)
        } else {
            write!(f, "{}: {}: {}", self.severity, self.location, self.message)
        }
    }
}

/// A borrowed node of the exam model.
#[derive(Clone, Copy)]
enum ModelNode<'a> {
    Document(&'a ExamDocument),
    Info(&'a ExamInfo),
    Question(&'a Question),
    Answer(&'a AnswerOption),
    Options(&'a OpenOptions),
    Feedback(&'a Feedback),
    MetaData(&'a QuestionMetaData),
    General(&'a GeneralMetaData),
    UsedInExam(&'a UsedInExam),
}

impl<'a> ModelNode<'a> {
    /// Nested model nodes with their path segment.
    fn children(self) -> Vec<(String, ModelNode<'a>)> {
        match self {
            Self::Document(document) => {
                let mut children = vec![("info".to_owned(), Self::Info(&document.info))];
                children.extend(
                    document
                        .questions
                        .iter()
                        .enumerate()
                        .map(|(index, question)| (format!("questions[{index}]"), Self::Question(question))),
                );
                children
            }
            Self::Question(question) => {
                let mut children: Vec<_> = question
                    .answers()
                    .iter()
                    .enumerate()
                    .map(|(index, answer)| (format!("answers[{index}]"), Self::Answer(answer)))
                    .collect();
                if let Some(options) = question.options() {
                    children.push(("options".to_owned(), Self::Options(options)));
                }
                children.push(("feedback".to_owned(), Self::Feedback(&question.feedback)));
                children.push(("meta_data".to_owned(), Self::MetaData(&question.meta_data)));
                children
            }
            Self::MetaData(meta_data) => {
                let mut children = vec![("general".to_owned(), Self::General(&meta_data.general))];
                children.extend(meta_data.analytics.iter().enumerate().map(
                    |(index, usage)| match usage {
                        AnalyticsUsage::UsedInExam(exam) => {
                            (format!("analytics[{index}]"), Self::UsedInExam(exam))
                        }
                    },
                ));
                children
            }
            Self::Info(_)
            | Self::Answer(_)
            | Self::Options(_)
            | Self::Feedback(_)
            | Self::General(_)
            | Self::UsedInExam(_) => Vec::new(),
        }
    }

    /// Problems local to this node.
    fn check(self, location: &str, problems: &mut Vec<SemanticProblem>) {
        let mut error = |message: String| {
            problems.push(SemanticProblem::new(Severity::Error, location, message));
        };

        match self {
            Self::Document(document) => {
                let ids = document.questions.iter().map(|question| question.id.as_str());
                let duplicates = rules::duplicate_ids(ids);
                if !duplicates.is_empty() {
                    error(rules::duplicate_ids_message(&duplicates));
                }
            }
            Self::Question(question) => {
                let question_type = question.question_type();
                if question_type.has_answers() {
                    let nmr_correct = question.nmr_correct_answers();
                    if let Some(message) = rules::correct_count_problem(question_type, nmr_correct) {
                        error(message);
                    }
                }
                warn_if_blank(&question.text, location, "question text is empty", problems);
                if let Some(title) = &question.title {
                    warn_if_blank(title, location, "question title is empty", problems);
                }
            }
            Self::Answer(answer) => {
                warn_if_blank(&answer.text, location, "answer text is empty", problems);
                if let Some(hint) = &answer.hint {
                    warn_if_blank(hint, location, "hint is empty", problems);
                }
            }
            Self::Info(info) => {
                if info.title.is_blank() && !info.description.is_blank() {
                    problems.push(SemanticProblem::new(
                        Severity::Warning,
                        location,
                        "exam has a description but no title",
                    ));
                }
                for (index, author) in info.authors.iter().enumerate() {
                    if author.trim().is_empty() {
                        let message = format!("authors[{index}] is empty");
                        problems.push(SemanticProblem::new(Severity::Warning, location, message));
                    }
                }
            }
            Self::Feedback(feedback) => {
                let fields = [
                    ("general", &feedback.general),
                    ("on_correct", &feedback.on_correct),
                    ("on_incorrect", &feedback.on_incorrect),
                ];
                for (field, text) in fields {
                    if text.as_ref().is_some_and(TextContent::is_blank) {
                        let message = format!("feedback '{field}' is empty");
                        problems.push(SemanticProblem::new(Severity::Warning, location, message));
                    }
                }
            }
            Self::Options(options) => {
                if let Some(message) = rules::word_range_problem(options.min_words, options.max_words) {
                    error(message);
                }
            }
            Self::General(general) => {
                if let Some(message) = general
                    .difficulty
                    .and_then(|difficulty| rules::difficulty_problem(i64::from(difficulty)))
                {
                    error(message);
                }
                if let Some(skill_type) = &general.skill_type
                    && general.recognized_skill_type().is_none()
                {
                    problems.push(SemanticProblem::new(
                        Severity::Warning,
                        location,
                        format!(
                            "skill_type '{skill_type}' is not one of: {}",
                            SkillType::vocabulary()
                        ),
                    ));
                }
            }
            Self::UsedInExam(exam) => {
                if let Some(message) = rules::analytics_problem(exam.participants, exam.nmr_correct) {
                    problems.push(SemanticProblem::new(Severity::Warning, location, message));
                }
            }
            Self::MetaData(_) => {}
        }
    }
}

fn warn_if_blank(
    text: &TextContent,
    location: &str,
    message: &str,
    problems: &mut Vec<SemanticProblem>,
) {
    if text.is_blank() {
        problems.push(SemanticProblem::new(Severity::Warning, location, message));
    }
}

fn walk(node: ModelNode<'_>, location: &str, problems: &mut Vec<SemanticProblem>) {
    node.check(location, problems);

    for (segment, child) in node.children() {
        let child_location = if location.is_empty() {
            segment
        } else {
            format!("{location}.{segment}")
        };
        walk(child, &child_location, problems);
    }
}

/// Reports the semantic problems of `document`, in document order.
pub fn lint(document: &ExamDocument) -> Vec<SemanticProblem> {
    let mut problems = Vec::new();
    walk(ModelNode::Document(document), "", &mut problems);

    tracing::debug!(
        target: TRACING_TARGET_LINT,
        questions = document.questions.len(),
        problems = problems.len(),
        "Linted exam document"
    );

    problems
}
