use strum::IntoEnumIterator;
use ybe_core::model::{
    AnswerOption, Feedback, OpenOptions, Question, QuestionKind, QuestionMetaData, QuestionType,
    rules,
};
use ybe_core::schema::Schema;
use ybe_core::text::{TextContent, TextFormat};
use ybe_core::tree::{Mapping, Node};

use super::scalar::{self, Coerced};
use super::{Loader, take};
use crate::TRACING_TARGET_READER;
use crate::error::{Fault, FaultScope};

/// Returns the identifier of a raw question item, if it has one.
pub(super) fn raw_id(item: &Node) -> Option<String> {
    let (_, body) = item.as_mapping()?.first()?;
    body.as_mapping()?.get("id")?.scalar_to_string()
}

fn question_types() -> String {
    QuestionType::iter()
        .map(|question_type| question_type.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Splits a `{<question type>: <fields>}` item.
fn split_question(item: &Node) -> Coerced<(QuestionType, &Mapping)> {
    let entries = match item.as_mapping() {
        Some(mapping) if mapping.len() == 1 => mapping,
        _ => {
            return Err(format!(
                "expected a mapping with a single question type key, found {}",
                item
            ));
        }
    };

    let (keyword, body) = &entries[0];
    let question_type = keyword.parse::<QuestionType>().map_err(|_| {
        format!(
            "unknown question type '{keyword}', expected one of: {}",
            question_types()
        )
    })?;

    let body = body.as_mapping().ok_or_else(|| {
        format!(
            "expected a mapping of question fields, found {}",
            body.type_name()
        )
    })?;

    Ok((question_type, body))
}

fn is_text_key(key: &str) -> bool {
    TextFormat::keys().any(|text_key| text_key == key)
}

fn is_question_key(question_type: QuestionType, key: &str) -> bool {
    is_text_key(key) || question_type.fields().contains(&key)
}

/// Answer keys, including the legacy per-answer `points`.
fn is_answer_key(key: &str) -> bool {
    is_text_key(key) || key == "points" || AnswerOption::has_field(key)
}

impl Loader<'_> {
    /// Reads one question item, or a fault covering everything wrong with it.
    pub(super) fn question(&self, index: usize, item: &Node) -> Result<Question, Fault> {
        let scope = FaultScope::Question {
            index,
            id: raw_id(item),
        };
        let (question_type, body) =
            split_question(item).map_err(|message| Fault::new(scope.clone(), message))?;

        let mut faults = Vec::new();
        self.unknown_keys(body, |key| is_question_key(question_type, key), &mut faults);

        let id = take(&mut faults, "id", scalar::optional_string(body.get("id")));
        let title = take(&mut faults, "title", scalar::text_value(body.get("title")));
        let text = take(&mut faults, "text", scalar::text_block(body));
        let feedback = self.feedback(body.get("feedback")).unwrap_or_else(|fault| {
            faults.push(fault);
            Feedback::default()
        });
        let meta_data = self.meta_data(body.get("meta_data")).unwrap_or_else(|fault| {
            faults.push(fault);
            QuestionMetaData::default()
        });

        let kind = match question_type {
            QuestionType::MultipleChoice | QuestionType::MultipleResponse => {
                let points = take(&mut faults, "points", scalar::points(body.get("points")));
                let answers = self.answers(body.get("answers"), &mut faults);

                if let Some(answers) = &answers {
                    let nmr_correct = answers.iter().filter(|answer| answer.correct).count();
                    if let Some(message) = rules::correct_count_problem(question_type, nmr_correct) {
                        faults.push(Fault::field("answers", message));
                    }
                }

                let answers = answers.unwrap_or_default();
                if question_type == QuestionType::MultipleChoice {
                    QuestionKind::SingleCorrectChoice { points, answers }
                } else {
                    QuestionKind::MultiCorrectChoice { points, answers }
                }
            }
            QuestionType::Open => {
                let points = take(&mut faults, "points", scalar::points(body.get("points")));
                let options = self.options(body.get("options")).unwrap_or_else(|fault| {
                    faults.push(fault);
                    OpenOptions::default()
                });
                QuestionKind::OpenResponse { points, options }
            }
            QuestionType::TextOnly => QuestionKind::TextOnly,
        };

        if !faults.is_empty() {
            return Err(Fault::aggregate(scope, faults));
        }

        Ok(Question {
            id: id.unwrap_or_default(),
            title,
            text,
            feedback,
            meta_data,
            kind,
        })
    }

    /// Reads the answer options, recording one fault per faulty answer.
    ///
    /// Returns `None` if any answer could not be read.
    fn answers(&self, node: Option<&Node>, faults: &mut Vec<Fault>) -> Option<Vec<AnswerOption>> {
        let items = match node {
            None | Some(Node::Null) => return Some(Vec::new()),
            Some(Node::Sequence(sequence)) => sequence.items(),
            Some(other) => {
                faults.push(Fault::field(
                    "answers",
                    format!("expected a sequence, found {}", other.type_name()),
                ));
                return None;
            }
        };

        let mut answers = Vec::with_capacity(items.len());
        let mut failed = false;
        for (index, item) in items.iter().enumerate() {
            match self.answer(index, item) {
                Ok(answer) => answers.push(answer),
                Err(fault) => {
                    faults.push(fault);
                    failed = true;
                }
            }
        }

        (!failed).then_some(answers)
    }

    fn answer(&self, index: usize, item: &Node) -> Result<AnswerOption, Fault> {
        let scope = FaultScope::Answer { index };
        let body = item
            .as_mapping()
            .filter(|mapping| mapping.len() == 1)
            .and_then(|mapping| mapping.get("answer"))
            .and_then(Node::as_mapping)
            .ok_or_else(|| {
                Fault::new(
                    scope.clone(),
                    format!("expected a mapping with the single key 'answer', found {item}"),
                )
            })?;

        let mut faults = Vec::new();
        self.unknown_keys(body, is_answer_key, &mut faults);

        if body.contains_key("points") {
            tracing::warn!(
                target: TRACING_TARGET_READER,
                answer = index,
                "Ignoring per-answer points, correct flags decide the score"
            );
        }

        let text = take(&mut faults, "text", scalar::text_block(body));
        let correct = take(&mut faults, "correct", scalar::boolean(body.get("correct")));
        let hint: Option<TextContent> = take(&mut faults, "hint", scalar::text_value(body.get("hint")));

        if !faults.is_empty() {
            return Err(Fault::aggregate(scope, faults));
        }

        Ok(AnswerOption {
            text,
            correct,
            hint,
        })
    }

    fn options(&self, node: Option<&Node>) -> Result<OpenOptions, Fault> {
        let scope = FaultScope::Field("options".to_owned());
        let Some(mapping) = sub_mapping(node).map_err(|message| Fault::new(scope.clone(), message))?
        else {
            return Ok(OpenOptions::default());
        };

        let mut faults: Vec<_> = mapping
            .keys()
            .filter(|key| !OpenOptions::has_field(key))
            .map(|key| Fault::field(key, "unknown option"))
            .collect();

        let options = OpenOptions {
            max_words: take(&mut faults, "max_words", scalar::count(mapping.get("max_words"))),
            min_words: take(&mut faults, "min_words", scalar::count(mapping.get("min_words"))),
            expected_lines: take(
                &mut faults,
                "expected_lines",
                scalar::count(mapping.get("expected_lines")),
            ),
        };

        if let Some(message) = rules::word_range_problem(options.min_words, options.max_words) {
            faults.push(Fault::field("min_words", message));
        }

        if !faults.is_empty() {
            return Err(Fault::aggregate(scope, faults));
        }
        Ok(options)
    }
}

/// Reads an optional nested mapping.
pub(super) fn sub_mapping(node: Option<&Node>) -> Coerced<Option<&Mapping>> {
    match node {
        None | Some(Node::Null) => Ok(None),
        Some(Node::Mapping(mapping)) => Ok(Some(mapping)),
        Some(other) => Err(format!("expected a mapping, found {}", other.type_name())),
    }
}
