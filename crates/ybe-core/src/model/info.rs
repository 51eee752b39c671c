use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::resource::ResourceRef;
use crate::text::TextContent;

/// Descriptive information about an exam.
#[derive(Debug, Default, Clone, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct ExamInfo {
    pub title: TextContent,
    pub description: TextContent,
    pub document_version: Option<String>,
    pub authors: Vec<String>,
    pub date: Option<Date>,
}

impl ExamInfo {
    /// Creates info with only a title set.
    pub fn with_title(title: impl Into<TextContent>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Returns true if no field differs from its default.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn list_resources(&self) -> Vec<ResourceRef> {
        let mut resources = self.title.list_resources();
        resources.extend(self.description.list_resources());
        resources
    }
}
