//! Exam document model.
//!
//! An [`ExamDocument`] holds descriptive [`ExamInfo`] and an ordered list of
//! [`Question`]s. Question variants share their base fields and keep the
//! variant-specific ones in [`QuestionKind`].

mod info;
mod meta;
mod points;
mod question;
pub mod rules;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use self::info::ExamInfo;
pub use self::meta::{AnalyticsUsage, GeneralMetaData, QuestionMetaData, SkillType, UsedInExam};
pub use self::points::Points;
pub use self::question::{
    AnswerOption, Feedback, OpenOptions, Question, QuestionKind, QuestionType,
};
use crate::TRACING_TARGET_RESOURCE;
use crate::error::{Error, Result};
use crate::resource::{ResolveResource, ResourceContext, ResourceRef};

/// A complete exam.
#[derive(Debug, Default, Clone, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct ExamDocument {
    pub info: ExamInfo,
    pub questions: Vec<Question>,
    /// Where referenced resources are stored, if known.
    #[serde(skip)]
    pub resource_context: Option<ResourceContext>,
}

impl ExamDocument {
    /// Creates an empty exam.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the context resources are resolved against.
    pub fn with_resource_context(mut self, context: ResourceContext) -> Self {
        self.resource_context = Some(context);
        self
    }

    /// Returns the question with the given identifier.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// Sums the points of every question that declares them.
    pub fn get_points_possible(&self) -> Points {
        self.questions.iter().filter_map(Question::points).sum()
    }

    /// Lists the resources referenced anywhere in the exam, in document order.
    pub fn list_resources(&self) -> Vec<ResourceRef> {
        let mut resources = self.info.list_resources();
        for question in &self.questions {
            resources.extend(question.list_resources());
        }
        resources
    }

    /// Copies every referenced resource into `destination`.
    ///
    /// Resources referenced more than once are copied once. Returns the written
    /// paths in document order.
    ///
    /// # Errors
    ///
    /// Fails with [`MissingContext`](crate::ErrorKind::MissingContext) when no
    /// resource context is attached, and with the resolution error of the first
    /// resource that cannot be copied.
    pub fn copy_resources(&self, destination: &Path) -> Result<Vec<PathBuf>> {
        let context = self.resource_context.as_ref().ok_or_else(|| {
            Error::missing_context().with_message("exam has no resource context to copy from")
        })?;

        let mut seen = HashSet::new();
        let mut copied = Vec::new();
        for resource in self.list_resources() {
            if !seen.insert(resource.path.clone()) {
                continue;
            }
            copied.push(context.resolve_and_copy(&resource, destination)?);
        }

        tracing::debug!(
            target: TRACING_TARGET_RESOURCE,
            count = copied.len(),
            destination = %destination.display(),
            "Copied exam resources"
        );

        Ok(copied)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::error::ErrorKind;
    use crate::text::TextContent;

    fn document() -> ExamDocument {
        let mut choice = Question::new(
            "q1",
            TextContent::html(r#"<img src="pics/a.png"><img src="https://ex.com/b.png">"#),
            QuestionKind::SingleCorrectChoice {
                points: Some(Points::Integer(1)),
                answers: vec![AnswerOption::new("yes", true), AnswerOption::new("no", false)],
            },
        );
        choice.feedback.general = Some(TextContent::markdown("![again](pics/a.png)"));

        let open = Question::new(
            "q2",
            "Explain",
            QuestionKind::OpenResponse {
                points: Some(Points::Decimal(2.5)),
                options: OpenOptions::default(),
            },
        );

        ExamDocument {
            info: ExamInfo::with_title("Quiz"),
            questions: vec![choice, open, Question::new("q3", "Bye", QuestionKind::TextOnly)],
            resource_context: None,
        }
    }

    #[test]
    fn test_points_possible() {
        assert_eq!(document().get_points_possible(), Points::Decimal(3.5));
        assert_eq!(ExamDocument::new().get_points_possible(), Points::Integer(0));
    }

    #[test]
    fn test_list_resources() {
        let paths: Vec<_> = document().list_resources().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["pics/a.png", "pics/a.png"]);
    }

    #[test]
    fn test_copy_requires_context() {
        let temp = tempfile::TempDir::new().unwrap();
        let error = document().copy_resources(temp.path()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MissingContext);
    }

    #[test]
    fn test_copy_deduplicates() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().join("exam");
        fs::create_dir_all(root.join("pics")).unwrap();
        fs::write(root.join("pics/a.png"), b"a").unwrap();

        let document = document().with_resource_context(ResourceContext::directory(&root));
        let destination = temp.path().join("out");
        let copied = document.copy_resources(&destination).unwrap();

        assert_eq!(copied, vec![destination.join("pics/a.png")]);
    }

    #[test]
    fn test_lookup_by_id() {
        let document = document();
        assert!(document.question("q2").is_some_and(Question::is_open_response));
        assert!(document.question("missing").is_none());
    }

    #[test]
    fn test_serialization_skips_context() {
        let document = document().with_resource_context(ResourceContext::directory("/tmp"));
        let value = serde_json::to_value(&document).unwrap();
        assert!(value.get("resource_context").is_none());
        assert_eq!(value["questions"][1]["points"], 2.5);
    }
}
