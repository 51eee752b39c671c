//! Common error type definitions.

use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
///
/// Used as the source of a structured [`Error`], wrapping I/O, archive or
/// process errors while keeping the Send and Sync bounds.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of errors that can occur in ybe-core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Input validation failed.
    InvalidInput,
    /// A referenced file or archive entry does not exist.
    NotFound,
    /// Resources were requested from a document without a resource context.
    MissingContext,
    /// The backing archive could not be read.
    Archive,
    /// A rich-text format conversion failed.
    Conversion,
    /// Any other I/O failure.
    Io,
}

/// A structured error type for ybe-core operations.
#[derive(Debug, Error)]
#[error("{kind:?}{}", message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Creates a new invalid input error.
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates a new not found error.
    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    /// Creates a new missing resource context error.
    pub fn missing_context() -> Self {
        Self::new(ErrorKind::MissingContext)
    }

    /// Creates a new archive error.
    pub fn archive() -> Self {
        Self::new(ErrorKind::Archive)
    }

    /// Creates a new conversion error.
    pub fn conversion() -> Self {
        Self::new(ErrorKind::Conversion)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        let kind = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            _ => ErrorKind::Io,
        };

        Self::new(kind).with_source(error)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(error: zip::result::ZipError) -> Self {
        match error {
            zip::result::ZipError::FileNotFound => Self::not_found().with_source(error),
            zip::result::ZipError::Io(io) => Self::from(io),
            other => Self::archive().with_source(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Error::not_found().with_message("pics/a.png");
        assert_eq!(error.to_string(), "NotFound: pics/a.png");
        assert_eq!(error.kind_str(), "not_found");

        let error = Error::conversion();
        assert_eq!(error.to_string(), "Conversion");
    }

    #[test]
    fn test_io_error_mapping() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(Error::from(missing).kind(), ErrorKind::NotFound);

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(Error::from(denied).kind(), ErrorKind::Io);
    }

    #[test]
    fn test_zip_error_mapping() {
        let error = Error::from(zip::result::ZipError::FileNotFound);
        assert_eq!(error.kind(), ErrorKind::NotFound);

        let error = Error::from(zip::result::ZipError::InvalidArchive("bad header".into()));
        assert_eq!(error.kind(), ErrorKind::Archive);
    }
}
