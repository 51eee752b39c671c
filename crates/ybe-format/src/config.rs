//! Reader and writer configuration.
//!
//! Configuration is passed explicitly to every call. To override a setting for
//! one call, build a modified copy and pass that down.

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// How the reader treats a `skill_type` outside the recommended vocabulary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SkillTypePolicy {
    /// Accept any value silently.
    Ignore,
    /// Accept any value and log a warning.
    #[default]
    Warn,
    /// Report a field fault.
    Reject,
}

/// Configuration of [`ExamReader`](crate::ExamReader).
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[cfg_attr(feature = "config", derive(Args))]
#[builder(
    name = "ReaderConfigBuilder",
    pattern = "owned",
    setter(into, prefix = "with")
)]
#[serde(default)]
pub struct ReaderConfig {
    /// Handling of skill types outside the recommended vocabulary.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "skill-type-policy",
            env = "YBE_SKILL_TYPE_POLICY",
            value_enum,
            default_value_t = SkillTypePolicy::Warn
        )
    )]
    #[builder(default)]
    pub skill_type_policy: SkillTypePolicy,

    /// Reports unknown keys as faults instead of logging them.
    #[cfg_attr(feature = "config", arg(long = "strict", env = "YBE_STRICT"))]
    #[builder(default)]
    pub strict: bool,
}

impl ReaderConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ReaderConfigBuilder {
        ReaderConfigBuilder::default()
    }

    /// Returns a copy that rejects unknown keys and unrecognized skill types.
    pub fn strict() -> Self {
        Self {
            skill_type_policy: SkillTypePolicy::Reject,
            strict: true,
        }
    }
}

/// Configuration of [`ExamWriter`](crate::ExamWriter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[cfg_attr(feature = "config", derive(Args))]
#[builder(
    name = "WriterConfigBuilder",
    pattern = "owned",
    setter(into, prefix = "with")
)]
#[serde(default)]
pub struct WriterConfig {
    /// Omits fields equal to their schema default.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "minimal",
            env = "YBE_MINIMAL",
            default_value_t = true,
            action = clap::ArgAction::Set
        )
    )]
    #[builder(default = "true")]
    pub minimal: bool,

    /// Separates the sections and questions with blank lines.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "section-spacing",
            env = "YBE_SECTION_SPACING",
            default_value_t = true,
            action = clap::ArgAction::Set
        )
    )]
    #[builder(default = "true")]
    pub section_spacing: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            minimal: true,
            section_spacing: true,
        }
    }
}

impl WriterConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> WriterConfigBuilder {
        WriterConfigBuilder::default()
    }

    /// Returns the configuration writing every field.
    pub fn full() -> Self {
        Self {
            minimal: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_defaults() {
        let config = ReaderConfig::builder().build().unwrap();
        assert_eq!(config, ReaderConfig::default());
        assert_eq!(config.skill_type_policy, SkillTypePolicy::Warn);
        assert!(!config.strict);
    }

    #[test]
    fn test_writer_defaults() {
        let config = WriterConfig::builder().build().unwrap();
        assert_eq!(config, WriterConfig::default());
        assert!(config.minimal);
        assert!(config.section_spacing);

        let config = WriterConfig::builder().with_minimal(false).build().unwrap();
        assert_eq!(config, WriterConfig::full());
    }

    #[test]
    fn test_policy_strings() {
        assert_eq!(SkillTypePolicy::Reject.as_ref(), "reject");
        assert_eq!("ignore".parse::<SkillTypePolicy>().unwrap(), SkillTypePolicy::Ignore);
    }
}
