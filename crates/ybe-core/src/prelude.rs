//! Convenient re-exports for common use.

pub use crate::error::{BoxedError, Error, ErrorKind, Result};
pub use crate::lint::{SemanticProblem, Severity, lint};
pub use crate::model::{
    AnalyticsUsage, AnswerOption, ExamDocument, ExamInfo, Feedback, GeneralMetaData, OpenOptions,
    Points, Question, QuestionKind, QuestionMetaData, QuestionType, SkillType, UsedInExam,
};
pub use crate::resource::{ResolveResource, ResourceContext, ResourceRef};
pub use crate::schema::{FieldDefault, Schema};
pub use crate::text::{TextContent, TextFormat, TextRenderer};
pub use crate::tree::{Mapping, Node, Sequence};
