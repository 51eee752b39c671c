//! Load errors and the nested fault report.

use std::fmt::{self, Write as _};

use derive_more::{Deref, IntoIterator};
use thiserror::Error;

/// Type alias for load results.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Reasons an exam could not be loaded.
///
/// All variants but [`LoadError::Invalid`] abort loading at once. `Invalid`
/// carries every fault found while reading the questions.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file or archive could not be read.
    #[error("could not read exam: {0}")]
    Io(#[from] ybe_core::Error),

    /// The text is not well-formed.
    #[error("invalid exam syntax: {0}")]
    Syntax(#[from] serde_yaml::Error),

    /// The top-level `schema_version` key is absent.
    #[error("missing required key 'schema_version'")]
    MissingVersion,

    /// The `schema_version` value is not a semantic version.
    #[error("invalid schema_version '{version}'")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    /// The document does not have the shape of an exam.
    #[error("invalid exam structure: {0}")]
    Structure(String),

    /// One or more fields failed validation.
    #[error("exam contains errors:\n{0}")]
    Invalid(FaultReport),
}

impl From<std::io::Error> for LoadError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(ybe_core::Error::from(error))
    }
}

impl LoadError {
    /// Returns the collected faults of an [`Invalid`](Self::Invalid) error.
    pub fn faults(&self) -> Option<&FaultReport> {
        match self {
            Self::Invalid(report) => Some(report),
            _ => None,
        }
    }
}

/// Part of a document a [`Fault`] refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultScope {
    /// The document as a whole.
    Document,
    /// The `info` section.
    Info,
    /// A question, by position and raw identifier.
    Question { index: usize, id: Option<String> },
    /// An answer option, by position within its question.
    Answer { index: usize },
    /// An analytics entry, by position.
    Analytics { index: usize },
    /// A named field.
    Field(String),
}

impl fmt::Display for FaultScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => write!(f, "document"),
            Self::Info => write!(f, "info"),
            Self::Question {
                index,
                id: Some(id),
            } if !id.is_empty() => write!(f, "question {index} (id: {id})"),
            Self::Question { index, .. } => write!(f, "question {index}"),
            Self::Answer { index } => write!(f, "answer {index}"),
            Self::Analytics { index } => write!(f, "analytics entry {index}"),
            Self::Field(name) => write!(f, "field '{name}'"),
        }
    }
}

/// A validation problem found while loading.
///
/// A fault either describes a problem itself or groups the faults found below
/// its scope, or both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub scope: FaultScope,
    pub message: String,
    pub causes: Vec<Fault>,
}

impl Fault {
    /// Creates a fault without causes.
    pub fn new(scope: FaultScope, message: impl Into<String>) -> Self {
        Self {
            scope,
            message: message.into(),
            causes: Vec::new(),
        }
    }

    /// Creates a fault on a named field.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(FaultScope::Field(name.into()), message)
    }

    /// Creates a fault grouping `causes`.
    pub fn aggregate(scope: FaultScope, causes: Vec<Fault>) -> Self {
        Self {
            scope,
            message: String::new(),
            causes,
        }
    }

    /// Returns true if this fault or any of its causes mentions `text`.
    pub fn mentions(&self, text: &str) -> bool {
        self.message.contains(text) || self.causes.iter().any(|cause| cause.mentions(text))
    }

    fn render(&self, depth: usize, out: &mut String) -> fmt::Result {
        let indent = "    ".repeat(depth);
        if self.message.is_empty() {
            writeln!(out, "{indent}- {}:", self.scope)?;
        } else {
            writeln!(out, "{indent}- {}: {}", self.scope, self.message)?;
        }

        for cause in &self.causes {
            cause.render(depth + 1, out)?;
        }
        Ok(())
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(0, &mut out)?;
        f.write_str(out.trim_end())
    }
}

/// Every fault found while loading one document.
///
/// Displays as a bulleted report, nested four spaces per level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, IntoIterator)]
pub struct FaultReport(Vec<Fault>);

impl FaultReport {
    pub fn new(faults: Vec<Fault>) -> Self {
        Self(faults)
    }

    /// Returns true if any fault mentions `text`.
    pub fn mentions(&self, text: &str) -> bool {
        self.0.iter().any(|fault| fault.mentions(text))
    }
}

impl fmt::Display for FaultReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for fault in &self.0 {
            fault.render(0, &mut out)?;
        }
        f.write_str(out.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_report() {
        let question = Fault::aggregate(
            FaultScope::Question {
                index: 1,
                id: Some("q2".to_owned()),
            },
            vec![
                Fault::field("text", "multiple text blocks found: [text, text_html]"),
                Fault::aggregate(
                    FaultScope::Answer { index: 0 },
                    vec![Fault::field("correct", "expected a boolean, found string")],
                ),
            ],
        );
        let report = FaultReport::new(vec![
            question,
            Fault::new(FaultScope::Document, "multiple questions with the same id: q1"),
        ]);

        let expected = "\
- question 1 (id: q2):
    - field 'text': multiple text blocks found: [text, text_html]
    - answer 0:
        - field 'correct': expected a boolean, found string
- document: multiple questions with the same id: q1";
        assert_eq!(report.to_string(), expected);
        assert!(report.mentions("text_html"));
        assert!(!report.mentions("text_markdown"));
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_question_scope_without_id() {
        let scope = FaultScope::Question { index: 3, id: None };
        assert_eq!(scope.to_string(), "question 3");

        let scope = FaultScope::Question {
            index: 3,
            id: Some(String::new()),
        };
        assert_eq!(scope.to_string(), "question 3");
    }

    #[test]
    fn test_load_error_display() {
        let error = LoadError::Invalid(FaultReport::new(vec![Fault::field(
            "points",
            "expected a number, found 'many'",
        )]));
        assert_eq!(
            error.to_string(),
            "exam contains errors:\n- field 'points': expected a number, found 'many'"
        );
        assert!(error.faults().is_some());
        assert!(LoadError::MissingVersion.faults().is_none());
    }
}
