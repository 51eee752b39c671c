//! Question metadata.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Metadata attached to a question.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
pub struct QuestionMetaData {
    pub general: GeneralMetaData,
    pub analytics: Vec<AnalyticsUsage>,
}

impl QuestionMetaData {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Classification of a question.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
pub struct GeneralMetaData {
    pub description: Option<String>,
    pub keywords: Vec<String>,
    /// Language of the question, e.g. `en`.
    pub language: Option<String>,
    pub creation_date: Option<Date>,
    pub authors: Vec<String>,
    pub module: Option<String>,
    pub chapters: Vec<String>,
    /// Cognitive skill the question trains, ideally one of [`SkillType`].
    pub skill_type: Option<String>,
    /// Difficulty from 0 (trivial) to 10.
    pub difficulty: Option<u8>,
}

impl GeneralMetaData {
    /// Returns the skill type if it belongs to the recommended vocabulary.
    pub fn recognized_skill_type(&self) -> Option<SkillType> {
        self.skill_type.as_deref()?.parse().ok()
    }
}

/// Recommended vocabulary for [`GeneralMetaData::skill_type`], after Bloom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, EnumIter)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SkillType {
    Knowledge,
    Comprehension,
    Application,
    Analysis,
    Synthesis,
    Evaluation,
}

impl SkillType {
    /// Comma-separated list of the vocabulary, for messages.
    pub fn vocabulary() -> String {
        Self::iter()
            .map(|skill| skill.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Where a question has been used before.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalyticsUsage {
    /// Usage in an exam, with its results.
    UsedInExam(UsedInExam),
}

impl AnalyticsUsage {
    /// Key of this usage in exam files.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::UsedInExam(_) => "exam",
        }
    }
}

/// Results of a question in one exam.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
pub struct UsedInExam {
    /// Name of the exam.
    pub name: String,
    /// Number of students who took the exam.
    pub participants: Option<u32>,
    /// Number of students who answered correctly.
    pub nmr_correct: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_type_vocabulary() {
        let general = GeneralMetaData {
            skill_type: Some("Analysis".to_owned()),
            ..GeneralMetaData::default()
        };
        assert_eq!(general.recognized_skill_type(), Some(SkillType::Analysis));

        let general = GeneralMetaData {
            skill_type: Some("guessing".to_owned()),
            ..GeneralMetaData::default()
        };
        assert_eq!(general.recognized_skill_type(), None);

        assert_eq!(
            SkillType::vocabulary(),
            "knowledge, comprehension, application, analysis, synthesis, evaluation"
        );
    }
}
