use ybe_core::model::{
    AnalyticsUsage, ExamInfo, Feedback, GeneralMetaData, QuestionMetaData, SkillType, UsedInExam,
    rules,
};
use ybe_core::schema::Schema;
use ybe_core::tree::{Mapping, Node};

use super::question::sub_mapping;
use super::{Loader, scalar, take};
use crate::TRACING_TARGET_READER;
use crate::config::SkillTypePolicy;
use crate::error::{Fault, FaultScope};

const USED_IN_EXAM: &str = "exam";

impl Loader<'_> {
    pub(super) fn info(&self, mapping: &Mapping) -> Result<ExamInfo, Fault> {
        let mut faults = Vec::new();
        self.unknown_keys(mapping, ExamInfo::has_field, &mut faults);

        let info = ExamInfo {
            title: take(&mut faults, "title", scalar::text_value(mapping.get("title")))
                .unwrap_or_default(),
            description: take(
                &mut faults,
                "description",
                scalar::text_value(mapping.get("description")),
            )
            .unwrap_or_default(),
            document_version: take(
                &mut faults,
                "document_version",
                scalar::optional_string(mapping.get("document_version")),
            ),
            authors: take(&mut faults, "authors", scalar::string_list(mapping.get("authors"))),
            date: take(&mut faults, "date", scalar::date(mapping.get("date"))),
        };

        if !faults.is_empty() {
            return Err(Fault::aggregate(FaultScope::Info, faults));
        }
        Ok(info)
    }

    pub(super) fn feedback(&self, node: Option<&Node>) -> Result<Feedback, Fault> {
        let scope = FaultScope::Field("feedback".to_owned());
        let Some(mapping) = sub_mapping(node).map_err(|message| Fault::new(scope.clone(), message))?
        else {
            return Ok(Feedback::default());
        };

        let mut faults = Vec::new();
        self.unknown_keys(mapping, Feedback::has_field, &mut faults);

        let feedback = Feedback {
            general: take(&mut faults, "general", scalar::text_value(mapping.get("general"))),
            on_correct: take(
                &mut faults,
                "on_correct",
                scalar::text_value(mapping.get("on_correct")),
            ),
            on_incorrect: take(
                &mut faults,
                "on_incorrect",
                scalar::text_value(mapping.get("on_incorrect")),
            ),
        };

        if !faults.is_empty() {
            return Err(Fault::aggregate(scope, faults));
        }
        Ok(feedback)
    }

    pub(super) fn meta_data(&self, node: Option<&Node>) -> Result<QuestionMetaData, Fault> {
        let scope = FaultScope::Field("meta_data".to_owned());
        let Some(mapping) = sub_mapping(node).map_err(|message| Fault::new(scope.clone(), message))?
        else {
            return Ok(QuestionMetaData::default());
        };

        let mut faults = Vec::new();
        self.unknown_keys(mapping, QuestionMetaData::has_field, &mut faults);

        let general = self.general(mapping.get("general")).unwrap_or_else(|fault| {
            faults.push(fault);
            GeneralMetaData::default()
        });
        let analytics = self.analytics(mapping.get("analytics"), &mut faults);

        if !faults.is_empty() {
            return Err(Fault::aggregate(scope, faults));
        }
        Ok(QuestionMetaData { general, analytics })
    }

    fn general(&self, node: Option<&Node>) -> Result<GeneralMetaData, Fault> {
        let scope = FaultScope::Field("general".to_owned());
        let Some(mapping) = sub_mapping(node).map_err(|message| Fault::new(scope.clone(), message))?
        else {
            return Ok(GeneralMetaData::default());
        };

        let mut faults = Vec::new();
        self.unknown_keys(mapping, GeneralMetaData::has_field, &mut faults);

        let difficulty = take(&mut faults, "difficulty", scalar::integer(mapping.get("difficulty")))
            .and_then(|difficulty| match rules::difficulty_problem(difficulty) {
                Some(message) => {
                    faults.push(Fault::field("difficulty", message));
                    None
                }
                None => u8::try_from(difficulty).ok(),
            });

        let general = GeneralMetaData {
            description: take(
                &mut faults,
                "description",
                scalar::optional_string(mapping.get("description")),
            ),
            keywords: take(&mut faults, "keywords", scalar::string_list(mapping.get("keywords"))),
            language: take(
                &mut faults,
                "language",
                scalar::optional_string(mapping.get("language")),
            ),
            creation_date: take(
                &mut faults,
                "creation_date",
                scalar::date(mapping.get("creation_date")),
            ),
            authors: take(&mut faults, "authors", scalar::string_list(mapping.get("authors"))),
            module: take(&mut faults, "module", scalar::optional_string(mapping.get("module"))),
            chapters: take(&mut faults, "chapters", scalar::string_list(mapping.get("chapters"))),
            skill_type: take(
                &mut faults,
                "skill_type",
                scalar::optional_string(mapping.get("skill_type")),
            ),
            difficulty,
        };

        if let Some(skill_type) = &general.skill_type
            && general.recognized_skill_type().is_none()
        {
            match self.config.skill_type_policy {
                SkillTypePolicy::Ignore => {}
                SkillTypePolicy::Warn => tracing::warn!(
                    target: TRACING_TARGET_READER,
                    skill_type = %skill_type,
                    "Skill type is not in the recommended vocabulary"
                ),
                SkillTypePolicy::Reject => faults.push(Fault::field(
                    "skill_type",
                    format!("'{skill_type}' is not one of: {}", SkillType::vocabulary()),
                )),
            }
        }

        if !faults.is_empty() {
            return Err(Fault::aggregate(scope, faults));
        }
        Ok(general)
    }

    /// Reads the analytics entries, recording one fault per faulty entry.
    fn analytics(&self, node: Option<&Node>, faults: &mut Vec<Fault>) -> Vec<AnalyticsUsage> {
        let items = match node {
            None | Some(Node::Null) => return Vec::new(),
            Some(Node::Sequence(sequence)) => sequence.items(),
            Some(other) => {
                faults.push(Fault::field(
                    "analytics",
                    format!("expected a sequence, found {}", other.type_name()),
                ));
                return Vec::new();
            }
        };

        let mut analytics = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match self.used_in_exam(index, item) {
                Ok(exam) => analytics.push(AnalyticsUsage::UsedInExam(exam)),
                Err(fault) => faults.push(fault),
            }
        }
        analytics
    }

    fn used_in_exam(&self, index: usize, item: &Node) -> Result<UsedInExam, Fault> {
        let scope = FaultScope::Analytics { index };
        let entry = match item.as_mapping() {
            Some(mapping) if mapping.len() == 1 => &mapping[0],
            _ => {
                return Err(Fault::new(
                    scope,
                    format!("expected a mapping with a single key '{USED_IN_EXAM}', found {item}"),
                ));
            }
        };

        let (keyword, body) = entry;
        if keyword != USED_IN_EXAM {
            return Err(Fault::new(
                scope,
                format!("unknown analytics entry '{keyword}', expected '{USED_IN_EXAM}'"),
            ));
        }

        let mapping = match sub_mapping(Some(body)) {
            Ok(Some(mapping)) => mapping,
            Ok(None) => return Ok(UsedInExam::default()),
            Err(message) => return Err(Fault::new(scope, message)),
        };

        let mut faults = Vec::new();
        self.unknown_keys(mapping, UsedInExam::has_field, &mut faults);

        let exam = UsedInExam {
            name: take(&mut faults, "name", scalar::optional_string(mapping.get("name")))
                .unwrap_or_default(),
            participants: take(
                &mut faults,
                "participants",
                scalar::count(mapping.get("participants")),
            ),
            nmr_correct: take(
                &mut faults,
                "nmr_correct",
                scalar::count(mapping.get("nmr_correct")),
            ),
        };

        if !faults.is_empty() {
            return Err(Fault::aggregate(scope, faults));
        }
        Ok(exam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode;
    use crate::config::ReaderConfig;

    fn loader_test<T>(text: &str, read: impl FnOnce(&Loader<'_>, &Node) -> T) -> T {
        let config = ReaderConfig::default();
        let loader = Loader::new(&config);
        read(&loader, &decode(text).unwrap())
    }

    #[test]
    fn test_info() {
        let info = loader_test(
            "title: Quiz\ndescription:\n    text_markdown: '*Final*'\nauthors: Ada\ndate: 2020-04-07\n",
            |loader, node| loader.info(node.as_mapping().unwrap()).unwrap(),
        );
        assert_eq!(info.title.as_str(), "Quiz");
        assert!(!info.description.is_plain());
        assert_eq!(info.authors, vec!["Ada"]);
        assert_eq!(info.date, Some(jiff::civil::date(2020, 4, 7)));
    }

    #[test]
    fn test_feedback_fault() {
        let fault = loader_test("general: [a, b]\n", |loader, node| {
            loader.feedback(Some(node)).unwrap_err()
        });
        assert_eq!(fault.scope, FaultScope::Field("feedback".to_owned()));
        assert_eq!(fault.causes[0].scope, FaultScope::Field("general".to_owned()));
    }

    #[test]
    fn test_analytics_entries() {
        let (analytics, faults) = loader_test(
            "-   exam:\n        name: final\n        participants: 20\n-   survey:\n        name: x\n",
            |loader, node| {
                let mut faults = Vec::new();
                let analytics = loader.analytics(Some(node), &mut faults);
                (analytics, faults)
            },
        );

        assert_eq!(
            analytics,
            vec![AnalyticsUsage::UsedInExam(UsedInExam {
                name: "final".to_owned(),
                participants: Some(20),
                nmr_correct: None,
            })]
        );
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].scope, FaultScope::Analytics { index: 1 });
        assert!(faults[0].message.contains("survey"));
    }
}
