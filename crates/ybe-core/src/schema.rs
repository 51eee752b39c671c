//! Declared fields and defaults of the model types.
//!
//! Every node type of the exam model lists its fields in canonical order and
//! the default each field takes in minimal form. The writer drops a field whose
//! rendered value equals that default; the reader uses the same tables to spot
//! unknown keys.

use crate::model::{
    AnswerOption, ExamDocument, ExamInfo, Feedback, GeneralMetaData, OpenOptions, Question,
    QuestionMetaData, UsedInExam,
};
use crate::tree::Node;

/// Default of a declared field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDefault {
    /// The field has no default and is always written.
    Required,
    /// The field is omitted in minimal form when it renders to this node.
    Value(Node),
}

impl FieldDefault {
    fn null() -> Self {
        Self::Value(Node::Null)
    }

    fn empty_sequence() -> Self {
        Self::Value(Node::empty_sequence())
    }

    fn empty_mapping() -> Self {
        Self::Value(Node::empty_mapping())
    }

    /// Returns true if `node` can be omitted in minimal form.
    pub fn is_default(&self, node: &Node) -> bool {
        match self {
            Self::Required => false,
            Self::Value(default) => default == node,
        }
    }
}

/// Declared schema of a model node type.
pub trait Schema {
    /// Field names in canonical order.
    const FIELDS: &'static [&'static str];

    /// Returns the declared default of `field`, or `None` for unknown fields.
    fn default_value(field: &str) -> Option<FieldDefault>;

    /// Returns true if `field` is declared.
    fn has_field(field: &str) -> bool {
        Self::FIELDS.contains(&field)
    }
}

impl Schema for ExamDocument {
    const FIELDS: &'static [&'static str] = &["schema_version", "info", "questions"];

    fn default_value(field: &str) -> Option<FieldDefault> {
        match field {
            "schema_version" => Some(FieldDefault::Required),
            "info" => Some(FieldDefault::empty_mapping()),
            "questions" => Some(FieldDefault::empty_sequence()),
            _ => None,
        }
    }
}

impl Schema for ExamInfo {
    const FIELDS: &'static [&'static str] =
        &["title", "description", "document_version", "authors", "date"];

    fn default_value(field: &str) -> Option<FieldDefault> {
        match field {
            "title" | "description" | "document_version" | "date" => Some(FieldDefault::null()),
            "authors" => Some(FieldDefault::empty_sequence()),
            _ => None,
        }
    }
}

impl Schema for Question {
    /// Union of the fields of every variant; see
    /// [`QuestionType::fields`](crate::model::QuestionType::fields).
    const FIELDS: &'static [&'static str] = &[
        "id", "title", "points", "text", "answers", "options", "feedback", "meta_data",
    ];

    fn default_value(field: &str) -> Option<FieldDefault> {
        match field {
            "text" => Some(FieldDefault::Required),
            "id" | "title" | "points" => Some(FieldDefault::null()),
            "answers" => Some(FieldDefault::empty_sequence()),
            "options" | "feedback" | "meta_data" => Some(FieldDefault::empty_mapping()),
            _ => None,
        }
    }
}

impl Schema for AnswerOption {
    const FIELDS: &'static [&'static str] = &["text", "correct", "hint"];

    fn default_value(field: &str) -> Option<FieldDefault> {
        match field {
            "text" => Some(FieldDefault::Required),
            "correct" => Some(FieldDefault::Value(Node::Bool(false))),
            "hint" => Some(FieldDefault::null()),
            _ => None,
        }
    }
}

impl Schema for OpenOptions {
    const FIELDS: &'static [&'static str] = &["max_words", "min_words", "expected_lines"];

    fn default_value(field: &str) -> Option<FieldDefault> {
        Self::has_field(field).then(FieldDefault::null)
    }
}

impl Schema for Feedback {
    const FIELDS: &'static [&'static str] = &["general", "on_correct", "on_incorrect"];

    fn default_value(field: &str) -> Option<FieldDefault> {
        Self::has_field(field).then(FieldDefault::null)
    }
}

impl Schema for QuestionMetaData {
    const FIELDS: &'static [&'static str] = &["general", "analytics"];

    fn default_value(field: &str) -> Option<FieldDefault> {
        match field {
            "general" => Some(FieldDefault::empty_mapping()),
            "analytics" => Some(FieldDefault::empty_sequence()),
            _ => None,
        }
    }
}

impl Schema for GeneralMetaData {
    const FIELDS: &'static [&'static str] = &[
        "description",
        "keywords",
        "language",
        "creation_date",
        "authors",
        "module",
        "chapters",
        "skill_type",
        "difficulty",
    ];

    fn default_value(field: &str) -> Option<FieldDefault> {
        match field {
            "keywords" | "authors" | "chapters" => Some(FieldDefault::empty_sequence()),
            "description" | "language" | "creation_date" | "module" | "skill_type"
            | "difficulty" => Some(FieldDefault::null()),
            _ => None,
        }
    }
}

impl Schema for UsedInExam {
    const FIELDS: &'static [&'static str] = &["name", "participants", "nmr_correct"];

    fn default_value(field: &str) -> Option<FieldDefault> {
        Self::has_field(field).then(FieldDefault::null)
    }
}
