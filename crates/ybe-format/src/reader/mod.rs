//! Reading exam documents from the generic tree.
//!
//! The reader collects faults instead of stopping at the first one: every
//! question is attempted, and within a question every field is read, so that a
//! single pass reports all problems of a document.

mod question;
mod scalar;
mod sections;

use semver::Version;
use ybe_core::model::{ExamDocument, ExamInfo, rules};
use ybe_core::schema::Schema;
use ybe_core::tree::{Mapping, Node};

use self::question::raw_id;
use crate::config::ReaderConfig;
use crate::error::{Fault, FaultReport, FaultScope, LoadError, LoadResult};
use crate::{SCHEMA_VERSION, TRACING_TARGET_READER, codec};

/// Reads exam documents.
#[derive(Debug, Default, Clone)]
pub struct ExamReader {
    config: ReaderConfig,
}

impl ExamReader {
    /// Creates a reader with the given configuration.
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Decodes and reads exam text.
    ///
    /// Blank text, and text holding only an empty mapping or sequence, reads
    /// as an empty document.
    pub fn read_str(&self, text: &str) -> LoadResult<ExamDocument> {
        let node = codec::decode(text)?;
        self.read_node(&node)
    }

    /// Reads an exam from an already decoded tree.
    ///
    /// # Errors
    ///
    /// Structural problems (a missing or malformed `schema_version`, a
    /// top level that is not a mapping) are returned at once. All other
    /// problems are collected into [`LoadError::Invalid`].
    pub fn read_node(&self, node: &Node) -> LoadResult<ExamDocument> {
        let mapping = match node {
            Node::Null => return Ok(ExamDocument::new()),
            Node::Mapping(mapping) if mapping.is_empty() => return Ok(ExamDocument::new()),
            Node::Sequence(sequence) if sequence.is_empty() => return Ok(ExamDocument::new()),
            Node::Mapping(mapping) => mapping,
            other => {
                return Err(LoadError::Structure(format!(
                    "expected a mapping at the top level, found {}",
                    other.type_name()
                )));
            }
        };

        let version = check_version(mapping)?;
        let loader = Loader::new(&self.config);
        let mut faults = Vec::new();

        loader.unknown_keys(mapping, ExamDocument::has_field, &mut faults);

        let info = match mapping.get("info") {
            None | Some(Node::Null) => ExamInfo::default(),
            Some(Node::Mapping(info)) => loader.info(info).unwrap_or_else(|fault| {
                faults.push(fault);
                ExamInfo::default()
            }),
            Some(other) => {
                faults.push(Fault::new(
                    FaultScope::Info,
                    format!("expected a mapping, found {}", other.type_name()),
                ));
                ExamInfo::default()
            }
        };

        let items = match mapping.get("questions") {
            None | Some(Node::Null) => &[][..],
            Some(Node::Sequence(sequence)) => sequence.items(),
            Some(other) => {
                faults.push(Fault::field(
                    "questions",
                    format!("expected a sequence, found {}", other.type_name()),
                ));
                &[][..]
            }
        };

        let mut questions = Vec::with_capacity(items.len());
        let mut ids = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            ids.push(raw_id(item));
            match loader.question(index, item) {
                Ok(question) => questions.push(question),
                Err(fault) => faults.push(fault),
            }
        }

        let duplicates = rules::duplicate_ids(ids.iter().flatten().map(String::as_str));
        if !duplicates.is_empty() {
            faults.push(Fault::new(
                FaultScope::Document,
                rules::duplicate_ids_message(&duplicates),
            ));
        }

        if !faults.is_empty() {
            tracing::debug!(
                target: TRACING_TARGET_READER,
                faults = faults.len(),
                "Rejected exam document"
            );
            return Err(LoadError::Invalid(FaultReport::new(faults)));
        }

        tracing::debug!(
            target: TRACING_TARGET_READER,
            schema_version = %version,
            questions = questions.len(),
            "Read exam document"
        );

        Ok(ExamDocument {
            info,
            questions,
            resource_context: None,
        })
    }
}

fn check_version(mapping: &Mapping) -> LoadResult<Version> {
    let raw = match mapping.get("schema_version") {
        None | Some(Node::Null) => return Err(LoadError::MissingVersion),
        Some(node) => node.scalar_to_string().ok_or_else(|| {
            LoadError::Structure(format!(
                "schema_version must be a string, found {}",
                node.type_name()
            ))
        })?,
    };

    let version = Version::parse(raw.trim())
        .map_err(|source| LoadError::InvalidVersion { version: raw, source })?;

    if let Ok(supported) = Version::parse(SCHEMA_VERSION)
        && version.major > supported.major
    {
        tracing::warn!(
            target: TRACING_TARGET_READER,
            schema_version = %version,
            supported = %supported,
            "Exam uses a newer schema version than supported"
        );
    }

    Ok(version)
}

/// Field loading shared by the section readers.
pub(crate) struct Loader<'a> {
    config: &'a ReaderConfig,
}

impl<'a> Loader<'a> {
    fn new(config: &'a ReaderConfig) -> Self {
        Self { config }
    }

    /// Reports keys rejected by `is_known`: as faults in strict mode, as
    /// warnings otherwise.
    fn unknown_keys(
        &self,
        mapping: &Mapping,
        is_known: impl Fn(&str) -> bool,
        faults: &mut Vec<Fault>,
    ) {
        for key in mapping.keys().filter(|key| !is_known(*key)) {
            if self.config.strict {
                faults.push(Fault::field(key, "unknown key"));
            } else {
                tracing::warn!(target: TRACING_TARGET_READER, key, "Ignoring unknown key");
            }
        }
    }
}

/// Unwraps a coerced field value, recording its fault.
fn take<T: Default>(faults: &mut Vec<Fault>, field: &str, value: scalar::Coerced<T>) -> T {
    value.unwrap_or_else(|message| {
        faults.push(Fault::field(field, message));
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use ybe_core::model::{Points, QuestionType};
    use ybe_core::text::TextContent;

    use super::*;
    use crate::config::SkillTypePolicy;

    fn read(text: &str) -> LoadResult<ExamDocument> {
        ExamReader::default().read_str(text)
    }

    fn report(text: &str) -> FaultReport {
        match read(text) {
            Err(LoadError::Invalid(report)) => report,
            other => panic!("expected faults, got {other:?}"),
        }
    }

    const CHOICE: &str = "\
schema_version: 0.3.0
questions:
-   multiple_choice:
        id: q1
        points: 1
        text: Capital of France?
        answers:
        -   answer:
                text: Paris
                correct: true
        -   answer:
                text: Lyon
";

    #[test]
    fn test_empty_input() {
        assert_eq!(read("").unwrap(), ExamDocument::new());
        assert_eq!(read("\n   \n").unwrap(), ExamDocument::new());
        assert_eq!(read("# nothing yet\n").unwrap(), ExamDocument::new());
        assert_eq!(read("{}\n").unwrap(), ExamDocument::new());
        assert_eq!(read("[]\n").unwrap(), ExamDocument::new());
    }

    #[test]
    fn test_missing_version() {
        let error = read("info:\n    title: Quiz\n").unwrap_err();
        assert!(matches!(error, LoadError::MissingVersion));

        let error = read("schema_version: latest\n").unwrap_err();
        assert!(matches!(error, LoadError::InvalidVersion { .. }));

        let error = read("- a\n- b\n").unwrap_err();
        assert!(matches!(error, LoadError::Structure(_)));
    }

    #[test]
    fn test_single_correct_choice() {
        let document = read(CHOICE).unwrap();
        let question = &document.questions[0];

        assert!(question.is_single_correct_choice());
        assert_eq!(question.nmr_correct_answers(), 1);
        assert_eq!(question.points(), Some(Points::Integer(1)));
        assert_eq!(question.answers()[1].text, TextContent::plain("Lyon"));
        assert!(!question.answers()[1].correct);
    }

    #[test]
    fn test_single_correct_violations() {
        let none = CHOICE.replace("                correct: true\n", "");
        let none_report = report(&none);
        assert!(none_report.mentions("exactly 1 answer marked as correct, 0 marked"));

        let two = CHOICE.replace("text: Lyon", "text: Lyon\n                correct: true");
        let two_report = report(&two);
        assert!(two_report.mentions("2 marked"));
        assert_eq!(
            two_report[0].scope,
            FaultScope::Question {
                index: 0,
                id: Some("q1".to_owned())
            }
        );
    }

    #[test]
    fn test_multi_correct_invariant() {
        let text = CHOICE.replace("multiple_choice", "multiple_response");
        let document = read(&text).unwrap();
        assert_eq!(document.questions[0].question_type(), QuestionType::MultipleResponse);

        let none = text.replace("                correct: true\n", "");
        assert!(report(&none).mentions("at least 1 answer marked as correct"));
    }

    #[test]
    fn test_duplicate_ids() {
        let text = "\
schema_version: 0.3.0
questions:
-   text_only:
        id: q1
        text: One
-   text_only:
        id: q1
        text: Two
-   text_only:
        text: Three
-   text_only:
        text: Four
";
        let report = report(text);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].scope, FaultScope::Document);
        assert!(report[0].message.contains("q1"));
    }

    #[test]
    fn test_text_block_exclusivity() {
        let both = "\
schema_version: 0.3.0
questions:
-   text_only:
        text: plain
        text_html: <b>html</b>
";
        let message = report(both).to_string();
        assert!(message.contains("text") && message.contains("text_html"), "{message}");
        assert!(message.contains("multiple text blocks found"));

        let none = "\
schema_version: 0.3.0
questions:
-   text_only:
        id: empty
";
        assert!(report(none).mentions("no text block defined"));
    }

    #[test]
    fn test_faults_are_collected_across_questions() {
        let text = "\
schema_version: 0.3.0
questions:
-   open:
        id: essay
        points: lots
        text: Discuss.
        options:
            max_words: -5
-   essay:
        text: What?
-   text_only:
        text: Fine.
";
        let report = report(text);
        assert_eq!(report.len(), 2);

        let rendered = report.to_string();
        let expected = "\
- question 0 (id: essay):
    - field 'points': expected a number, found 'lots'
    - field 'options':
        - field 'max_words': expected a non-negative integer, found -5
- question 1: unknown question type 'essay', expected one of: multiple_choice, multiple_response, open, text_only";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_metadata_coercion() {
        let text = "\
schema_version: 0.3.0
questions:
-   text_only:
        text: Hello
        meta_data:
            general:
                keywords: algebra
                chapters: [one, two]
                difficulty: 4
                creation_date: 2021-09-01
            analytics:
            -   exam:
                    name: midterm
                    participants: 30
                    nmr_correct: 12
";
        let document = read(text).unwrap();
        let meta = &document.questions[0].meta_data;
        assert_eq!(meta.general.keywords, vec!["algebra"]);
        assert_eq!(meta.general.chapters, vec!["one", "two"]);
        assert_eq!(meta.general.difficulty, Some(4));
        assert_eq!(meta.general.creation_date, Some(jiff::civil::date(2021, 9, 1)));
        assert_eq!(meta.analytics.len(), 1);

        let out_of_range = text.replace("difficulty: 4", "difficulty: 11");
        assert!(report(&out_of_range).mentions("difficulty must be between 0 and 10"));
    }

    #[test]
    fn test_skill_type_policy() {
        let text = "\
schema_version: 0.3.0
questions:
-   text_only:
        text: Hello
        meta_data:
            general:
                skill_type: guessing
";
        let document = read(text).unwrap();
        assert_eq!(
            document.questions[0].meta_data.general.skill_type.as_deref(),
            Some("guessing")
        );

        let config = ReaderConfig::builder()
            .with_skill_type_policy(SkillTypePolicy::Reject)
            .build()
            .unwrap();
        let error = ExamReader::new(config).read_str(text).unwrap_err();
        assert!(error.faults().is_some_and(|report| report.mentions("guessing")));
    }

    #[test]
    fn test_strict_unknown_keys() {
        let text = "\
schema_version: 0.3.0
extra: 1
questions:
-   text_only:
        text: Hello
        colour: red
";
        assert_eq!(read(text).unwrap().questions.len(), 1);

        let error = ExamReader::new(ReaderConfig::strict()).read_str(text).unwrap_err();
        let report = error.faults().unwrap();
        assert_eq!(report.len(), 2);
        assert!(report.mentions("unknown key"));
        assert_eq!(report[0].scope, FaultScope::Field("extra".to_owned()));
    }

    #[test]
    fn test_legacy_answer_points_are_ignored() {
        let text = CHOICE.replace(
            "                text: Paris\n",
            "                text: Paris\n                points: 1\n",
        );
        let strict = ExamReader::new(ReaderConfig::strict()).read_str(&text).unwrap();
        assert_eq!(strict.questions[0].nmr_correct_answers(), 1);
    }
}
