//! Writing exam documents as canonical text.
//!
//! The writer turns the model into a generic tree with fields in canonical
//! order, encodes the tree, and spaces out the sections. Writing a document
//! read from minimal output reproduces that output byte for byte.

mod fields;

use ybe_core::model::{
    AnalyticsUsage, AnswerOption, ExamDocument, ExamInfo, Feedback, GeneralMetaData, OpenOptions,
    Question, QuestionKind, QuestionMetaData, UsedInExam,
};
use ybe_core::tree::{Mapping, Node, Sequence};

use self::fields::Fields;
use crate::config::WriterConfig;
use crate::{SCHEMA_VERSION, TRACING_TARGET_WRITER, codec};

/// Writes exam documents.
#[derive(Debug, Default, Clone)]
pub struct ExamWriter {
    config: WriterConfig,
}

impl ExamWriter {
    /// Creates a writer with the given configuration.
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Writes `document` as exam text.
    pub fn write_string(&self, document: &ExamDocument) -> String {
        let text = codec::encode(&self.to_node(document));
        let text = if self.config.section_spacing {
            codec::space_sections(&text)
        } else {
            text
        };

        tracing::debug!(
            target: TRACING_TARGET_WRITER,
            questions = document.questions.len(),
            minimal = self.config.minimal,
            bytes = text.len(),
            "Wrote exam document"
        );

        text
    }

    /// Converts `document` into a generic tree.
    pub fn to_node(&self, document: &ExamDocument) -> Node {
        let questions = document
            .questions
            .iter()
            .map(|question| self.question(question))
            .collect();

        Fields::<ExamDocument>::new(self.config.minimal)
            .field("schema_version", Node::string(SCHEMA_VERSION))
            .field("info", self.info(&document.info))
            .field("questions", Node::Sequence(Sequence::block(questions)))
            .finish()
    }

    fn info(&self, info: &ExamInfo) -> Node {
        Fields::<ExamInfo>::new(self.config.minimal)
            .field("title", fields::text_or_null(&info.title))
            .field("description", fields::text_or_null(&info.description))
            .field(
                "document_version",
                fields::optional_string(info.document_version.as_deref()),
            )
            .field("authors", fields::string_list(&info.authors))
            .field("date", fields::date(info.date))
            .finish()
    }

    /// Wraps the question fields under its type keyword.
    fn question(&self, question: &Question) -> Node {
        let question_type = question.question_type();
        let mut body = Fields::<Question>::new(self.config.minimal);

        for field in question_type.fields() {
            body = match *field {
                "id" => body.field("id", fields::string(&question.id)),
                "title" => body.field("title", fields::text_value(question.title.as_ref())),
                "points" => body.field("points", fields::points(question.points())),
                "text" => body.keyed(
                    "text",
                    question.text.format().key(),
                    fields::text_block(&question.text),
                ),
                "answers" => body.field("answers", self.answers(question.answers())),
                "options" => match &question.kind {
                    QuestionKind::OpenResponse { options, .. } => {
                        body.field("options", self.options(options))
                    }
                    _ => body,
                },
                "feedback" => body.field("feedback", self.feedback(&question.feedback)),
                "meta_data" => body.field("meta_data", self.meta_data(&question.meta_data)),
                _ => body,
            };
        }

        let mut wrapper = Mapping::new();
        wrapper.insert(question_type.as_ref(), body.finish());
        Node::Mapping(wrapper)
    }

    fn answers(&self, answers: &[AnswerOption]) -> Node {
        let items = answers
            .iter()
            .map(|answer| {
                let body = Fields::<AnswerOption>::new(self.config.minimal)
                    .keyed("text", answer.text.format().key(), fields::text_block(&answer.text))
                    .field("correct", Node::Bool(answer.correct))
                    .field("hint", fields::text_value(answer.hint.as_ref()))
                    .finish();

                let mut wrapper = Mapping::new();
                wrapper.insert("answer", body);
                Node::Mapping(wrapper)
            })
            .collect();

        Node::Sequence(Sequence::block(items))
    }

    fn options(&self, options: &OpenOptions) -> Node {
        Fields::<OpenOptions>::new(self.config.minimal)
            .field("max_words", fields::count(options.max_words))
            .field("min_words", fields::count(options.min_words))
            .field("expected_lines", fields::count(options.expected_lines))
            .finish()
    }

    fn feedback(&self, feedback: &Feedback) -> Node {
        Fields::<Feedback>::new(self.config.minimal)
            .field("general", fields::text_value(feedback.general.as_ref()))
            .field("on_correct", fields::text_value(feedback.on_correct.as_ref()))
            .field("on_incorrect", fields::text_value(feedback.on_incorrect.as_ref()))
            .finish()
    }

    fn meta_data(&self, meta_data: &QuestionMetaData) -> Node {
        let analytics = meta_data
            .analytics
            .iter()
            .map(|usage| match usage {
                AnalyticsUsage::UsedInExam(exam) => {
                    let mut wrapper = Mapping::new();
                    wrapper.insert(usage.keyword(), self.used_in_exam(exam));
                    Node::Mapping(wrapper)
                }
            })
            .collect();

        Fields::<QuestionMetaData>::new(self.config.minimal)
            .field("general", self.general(&meta_data.general))
            .field("analytics", Node::Sequence(Sequence::block(analytics)))
            .finish()
    }

    fn general(&self, general: &GeneralMetaData) -> Node {
        Fields::<GeneralMetaData>::new(self.config.minimal)
            .field(
                "description",
                fields::optional_string(general.description.as_deref()),
            )
            .field("keywords", fields::string_list(&general.keywords))
            .field("language", fields::optional_string(general.language.as_deref()))
            .field("creation_date", fields::date(general.creation_date))
            .field("authors", fields::string_list(&general.authors))
            .field("module", fields::optional_string(general.module.as_deref()))
            .field("chapters", fields::string_list(&general.chapters))
            .field("skill_type", fields::optional_string(general.skill_type.as_deref()))
            .field(
                "difficulty",
                general
                    .difficulty
                    .map_or(Node::Null, |difficulty| Node::Integer(i64::from(difficulty))),
            )
            .finish()
    }

    fn used_in_exam(&self, exam: &UsedInExam) -> Node {
        Fields::<UsedInExam>::new(self.config.minimal)
            .field("name", fields::string(&exam.name))
            .field("participants", fields::count(exam.participants))
            .field("nmr_correct", fields::count(exam.nmr_correct))
            .finish()
    }
}
