use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A file an exam depends on, such as an image embedded in a question.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
pub struct ResourceRef {
    /// Path as written in the text, usually relative to the exam file.
    pub path: String,
    /// Alternative text of the image, if any.
    pub alt: Option<String>,
}

impl ResourceRef {
    /// Creates a reference without alternative text.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alt: None,
        }
    }

    /// Sets the alternative text.
    pub fn with_alt(mut self, alt: Option<String>) -> Self {
        self.alt = alt;
        self
    }

    /// Returns the referenced path.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.path)
    }

    pub fn is_absolute(&self) -> bool {
        self.as_path().is_absolute()
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}
