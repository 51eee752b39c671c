#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for reading exam documents.
pub const TRACING_TARGET_READER: &str = "ybe_format::reader";

/// Tracing target for writing exam documents.
pub const TRACING_TARGET_WRITER: &str = "ybe_format::writer";

/// Tracing target for file and archive access.
pub const TRACING_TARGET_IO: &str = "ybe_format::io";

/// Version of the exam schema written by this crate.
///
/// Documents with a newer major version are still read, with a warning.
pub const SCHEMA_VERSION: &str = "0.3.0";

pub mod codec;
pub mod config;
mod error;
pub mod io;
mod reader;
mod writer;

pub use config::{ReaderConfig, SkillTypePolicy, WriterConfig};
pub use error::{Fault, FaultReport, FaultScope, LoadError, LoadResult};
pub use reader::ExamReader;
pub use writer::ExamWriter;
